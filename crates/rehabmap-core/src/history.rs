use serde::{Deserialize, Serialize};

/// Maximum number of remembered search queries.
pub const MAX_SEARCH_HISTORY: usize = 5;

/// Recent free-text search queries, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchHistory {
    queries: Vec<String>,
}

impl SearchHistory {
    /// Moves `query` to the front, dropping the oldest entry past the bound.
    ///
    /// Blank queries are ignored. Returns `true` when the history changed.
    pub fn record(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }
        if self.queries.first().is_some_and(|q| q == query) {
            return false;
        }

        self.queries.retain(|q| q != query);
        self.queries.insert(0, query.to_string());
        self.queries.truncate(MAX_SEARCH_HISTORY);
        true
    }

    #[must_use]
    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Applies the length bound to a list loaded from storage.
    #[must_use]
    pub fn bounded(mut self) -> Self {
        self.queries.truncate(MAX_SEARCH_HISTORY);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_recent_first() {
        let mut h = SearchHistory::default();
        h.record("Parramatta");
        h.record("Newcastle");
        assert_eq!(h.queries(), ["Newcastle", "Parramatta"]);
    }

    #[test]
    fn bounded_to_five_entries() {
        let mut h = SearchHistory::default();
        for q in ["a", "b", "c", "d", "e", "f", "g"] {
            h.record(q);
        }
        assert_eq!(h.queries(), ["g", "f", "e", "d", "c"]);
    }

    #[test]
    fn repeated_query_moves_to_front() {
        let mut h = SearchHistory::default();
        h.record("Parramatta");
        h.record("Newcastle");
        assert!(h.record("Parramatta"));
        assert_eq!(h.queries(), ["Parramatta", "Newcastle"]);
    }

    #[test]
    fn repeating_latest_query_is_not_a_change() {
        let mut h = SearchHistory::default();
        h.record("Parramatta");
        assert!(!h.record("  Parramatta "));
        assert_eq!(h.queries().len(), 1);
    }

    #[test]
    fn blank_query_is_ignored() {
        let mut h = SearchHistory::default();
        assert!(!h.record("   "));
        assert!(h.is_empty());
    }

    #[test]
    fn bounded_trims_oversized_stored_list() {
        let h: SearchHistory =
            serde_json::from_str(r#"["1","2","3","4","5","6","7"]"#).unwrap();
        assert_eq!(h.bounded().queries().len(), MAX_SEARCH_HISTORY);
    }
}
