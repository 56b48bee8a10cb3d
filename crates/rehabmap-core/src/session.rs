//! Session state and its reducer.
//!
//! All mutation goes through [`reduce`], which never touches its input. The
//! returned [`Transition`] reports which persisted entries changed so the
//! caller can write them out after the state has moved on. [`Session`] ties the
//! two together over a [`StateStore`].

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::geo::GeoPoint;
use crate::history::SearchHistory;
use crate::store::{self, StateStore, HISTORY_KEY, VISIBILITY_KEY};
use crate::visibility::{Visibility, VisibilityMap};

/// The resolved location of a search, replaced wholesale by each new search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPoint {
    pub point: GeoPoint,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchStatus {
    #[default]
    Idle,
    /// A geocode lookup is in flight; only a resolution with this generation
    /// is accepted.
    Pending { generation: u64, query: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub visibility: VisibilityMap,
    pub history: SearchHistory,
    pub search_point: Option<SearchPoint>,
    pub status: SearchStatus,
    last_generation: u64,
}

impl SessionState {
    /// Builds a fresh session around previously persisted entries.
    #[must_use]
    pub fn restored(visibility: VisibilityMap, history: SearchHistory) -> Self {
        Self {
            visibility,
            history: history.bounded(),
            ..Self::default()
        }
    }

    /// Generation of the in-flight search, if any.
    #[must_use]
    pub fn pending_generation(&self) -> Option<u64> {
        match self.status {
            SearchStatus::Pending { generation, .. } => Some(generation),
            SearchStatus::Idle => None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.status, SearchStatus::Pending { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Advance one company through `normal -> highlighted -> hidden`.
    CycleVisibility { company: String },
    /// Return every company to `normal`.
    ResetVisibility,
    /// A search was submitted; a geocode lookup is about to start.
    SearchSubmitted { query: String },
    /// The geocode lookup for `generation` finished. `None` means no match or
    /// a failed lookup; no marker is placed.
    SearchResolved {
        generation: u64,
        point: Option<SearchPoint>,
    },
    ClearSearch,
}

/// Which persisted entries a transition touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    pub visibility: bool,
    pub history: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: SessionState,
    pub changes: Changes,
}

/// Applies `action` to `state`, returning the next state.
#[must_use]
pub fn reduce(state: &SessionState, action: SessionAction) -> Transition {
    let mut next = state.clone();
    let mut changes = Changes::default();

    match action {
        SessionAction::CycleVisibility { company } => {
            let updated = next.visibility.cycle(&company);
            tracing::debug!(company = %company, state = %updated, "visibility cycled");
            changes.visibility = true;
        }
        SessionAction::ResetVisibility => {
            changes.visibility = !next.visibility.is_empty();
            next.visibility.reset();
        }
        SessionAction::SearchSubmitted { query } => {
            changes.history = next.history.record(&query);
            next.last_generation += 1;
            next.status = SearchStatus::Pending {
                generation: next.last_generation,
                query,
            };
        }
        SessionAction::SearchResolved { generation, point } => {
            if next.pending_generation() == Some(generation) {
                next.search_point = point;
                next.status = SearchStatus::Idle;
            } else {
                tracing::debug!(
                    generation,
                    pending = ?next.pending_generation(),
                    "dropping stale search result"
                );
            }
        }
        SessionAction::ClearSearch => {
            next.search_point = None;
            next.status = SearchStatus::Idle;
        }
    }

    Transition {
        state: next,
        changes,
    }
}

/// A session bound to durable storage.
pub struct Session<S: StateStore> {
    state: SessionState,
    store: S,
}

impl<S: StateStore> Session<S> {
    /// Restores persisted entries from `store`, falling back to empty defaults.
    pub fn open(store: S) -> Self {
        let visibility: VisibilityMap = store::load_entry(&store, VISIBILITY_KEY);
        let history: SearchHistory = store::load_entry(&store, HISTORY_KEY);
        Self {
            state: SessionState::restored(visibility, history),
            store,
        }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Reduces `action`, then persists whichever entries changed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a changed entry cannot be written. The
    /// in-memory state has already advanced when this happens.
    pub fn dispatch(&mut self, action: SessionAction) -> Result<&SessionState, StoreError> {
        let Transition { state, changes } = reduce(&self.state, action);
        self.state = state;

        if changes.visibility {
            store::save_entry(&self.store, VISIBILITY_KEY, &self.state.visibility)?;
        }
        if changes.history {
            store::save_entry(&self.store, HISTORY_KEY, &self.state.history)?;
        }

        Ok(&self.state)
    }

    /// Convenience wrapper over [`SessionAction::CycleVisibility`].
    ///
    /// # Errors
    ///
    /// See [`Session::dispatch`].
    pub fn cycle_visibility(&mut self, company: &str) -> Result<Visibility, StoreError> {
        let state = self.dispatch(SessionAction::CycleVisibility {
            company: company.to_string(),
        })?;
        Ok(state.visibility.get(company))
    }

    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStateStore;

    fn point(lat: f64, lng: f64) -> SearchPoint {
        SearchPoint {
            point: GeoPoint { lat, lng },
            label: format!("{lat},{lng}"),
        }
    }

    #[test]
    fn reduce_leaves_input_untouched() {
        let state = SessionState::default();
        let t = reduce(
            &state,
            SessionAction::CycleVisibility {
                company: "Acme Rehab".to_string(),
            },
        );
        assert_eq!(state.visibility.get("Acme Rehab"), Visibility::Normal);
        assert_eq!(t.state.visibility.get("Acme Rehab"), Visibility::Highlighted);
        assert!(t.changes.visibility);
        assert!(!t.changes.history);
    }

    #[test]
    fn acme_rehab_cycles_back_to_normal() {
        let mut state = SessionState::default();
        let cycle = || SessionAction::CycleVisibility {
            company: "Acme Rehab".to_string(),
        };

        state = reduce(&state, cycle()).state;
        assert_eq!(state.visibility.get("Acme Rehab"), Visibility::Highlighted);
        state = reduce(&state, cycle()).state;
        assert_eq!(state.visibility.get("Acme Rehab"), Visibility::Hidden);
        state = reduce(&state, cycle()).state;
        assert_eq!(state.visibility.get("Acme Rehab"), Visibility::Normal);
    }

    #[test]
    fn reset_on_empty_map_changes_nothing() {
        let t = reduce(&SessionState::default(), SessionAction::ResetVisibility);
        assert!(!t.changes.visibility);
    }

    #[test]
    fn search_resolves_to_point() {
        let state = reduce(
            &SessionState::default(),
            SessionAction::SearchSubmitted {
                query: "Parramatta".to_string(),
            },
        )
        .state;
        assert!(state.is_loading());
        assert_eq!(state.history.queries(), ["Parramatta"]);

        let generation = state.pending_generation().unwrap();
        let state = reduce(
            &state,
            SessionAction::SearchResolved {
                generation,
                point: Some(point(-33.81, 151.0)),
            },
        )
        .state;
        assert!(!state.is_loading());
        assert_eq!(state.search_point, Some(point(-33.81, 151.0)));
    }

    #[test]
    fn stale_result_is_dropped() {
        let mut state = SessionState::default();
        state = reduce(
            &state,
            SessionAction::SearchSubmitted {
                query: "first".to_string(),
            },
        )
        .state;
        let first = state.pending_generation().unwrap();
        state = reduce(
            &state,
            SessionAction::SearchSubmitted {
                query: "second".to_string(),
            },
        )
        .state;
        let second = state.pending_generation().unwrap();
        assert_ne!(first, second);

        // The first lookup resolves late and must not overwrite the newer search.
        state = reduce(
            &state,
            SessionAction::SearchResolved {
                generation: first,
                point: Some(point(1.0, 1.0)),
            },
        )
        .state;
        assert!(state.search_point.is_none());
        assert_eq!(state.pending_generation(), Some(second));

        state = reduce(
            &state,
            SessionAction::SearchResolved {
                generation: second,
                point: Some(point(2.0, 2.0)),
            },
        )
        .state;
        assert_eq!(state.search_point, Some(point(2.0, 2.0)));
    }

    #[test]
    fn failed_search_places_no_marker() {
        let mut state = SessionState::default();
        state.search_point = Some(point(1.0, 1.0));
        state = reduce(
            &state,
            SessionAction::SearchSubmitted {
                query: "nowhere".to_string(),
            },
        )
        .state;
        let generation = state.pending_generation().unwrap();
        state = reduce(
            &state,
            SessionAction::SearchResolved {
                generation,
                point: None,
            },
        )
        .state;
        assert!(state.search_point.is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn session_persists_visibility_after_each_cycle() {
        let mut session = Session::open(MemoryStateStore::default());
        assert_eq!(
            session.cycle_visibility("Acme Rehab").unwrap(),
            Visibility::Highlighted
        );

        let store = session.into_store();
        assert_eq!(
            store.raw(VISIBILITY_KEY).as_deref(),
            Some(r#"{"Acme Rehab":"highlighted"}"#)
        );
        assert!(store.raw(HISTORY_KEY).is_none(), "history was never touched");
    }

    #[test]
    fn reset_persists_empty_mapping() {
        let mut session = Session::open(MemoryStateStore::default());
        session.cycle_visibility("A").unwrap();
        session.cycle_visibility("B").unwrap();
        session.dispatch(SessionAction::ResetVisibility).unwrap();

        let store = session.into_store();
        assert_eq!(store.raw(VISIBILITY_KEY).as_deref(), Some("{}"));
    }

    #[test]
    fn session_restores_previous_state() {
        let mut session = Session::open(MemoryStateStore::default());
        session.cycle_visibility("Acme Rehab").unwrap();
        session.cycle_visibility("Acme Rehab").unwrap();
        session
            .dispatch(SessionAction::SearchSubmitted {
                query: "Wollongong".to_string(),
            })
            .unwrap();

        let reopened = Session::open(session.into_store());
        assert!(reopened.state().visibility.is_hidden("Acme Rehab"));
        assert_eq!(reopened.state().history.queries(), ["Wollongong"]);
        assert!(reopened.state().search_point.is_none());
        assert!(!reopened.state().is_loading());
    }
}
