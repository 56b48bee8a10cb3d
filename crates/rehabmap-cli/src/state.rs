//! Commands that read the dataset and the persisted map session.

use anyhow::Context;
use rehabmap_core::{
    build_map_view, load_providers, AppConfig, Dataset, FileStateStore, Session, SessionAction,
};

use crate::render;
use crate::OutputFormat;

pub(crate) fn open_session(config: &AppConfig) -> Session<FileStateStore> {
    Session::open(FileStateStore::new(&config.state_dir))
}

pub(crate) fn load_dataset(config: &AppConfig) -> anyhow::Result<Dataset> {
    let dataset = load_providers(&config.data_path).with_context(|| {
        format!(
            "failed to load provider dataset; run `rehabmap scrape` to create {}",
            config.data_path.display()
        )
    })?;
    if dataset.providers.is_empty() {
        eprintln!(
            "warning: no mappable providers in {} ({} rows lacked coordinates)",
            config.data_path.display(),
            dataset.excluded
        );
    }
    Ok(dataset)
}

/// Print every marker for the current visibility state.
pub(crate) fn run_markers(config: &AppConfig, format: OutputFormat) -> anyhow::Result<()> {
    let dataset = load_dataset(config)?;
    let session = open_session(config);
    let view = build_map_view(&dataset.providers, session.state(), config.nearby_limit);

    match format {
        OutputFormat::Table => {
            render::print_markers(&view);
            let marked: Vec<String> = session
                .state()
                .visibility
                .marked()
                .map(|(company, visibility)| format!("{company} ({visibility})"))
                .collect();
            if !marked.is_empty() {
                println!("marked: {}", marked.join(", "));
            }
        }
        OutputFormat::Geojson => render::print_geojson(&view)?,
    }
    Ok(())
}

/// Cycle `company` and report its new state.
///
/// # Errors
///
/// Returns an error if the company is not in the dataset or the new state
/// cannot be saved.
pub(crate) fn run_cycle(config: &AppConfig, company: &str) -> anyhow::Result<()> {
    let dataset = load_dataset(config)?;
    let known = dataset
        .providers
        .iter()
        .any(|p| p.company_name() == company);
    if !known {
        anyhow::bail!("company '{company}' not found in {}", config.data_path.display());
    }

    let mut session = open_session(config);
    let visibility = session
        .cycle_visibility(company)
        .context("failed to save provider visibility")?;
    println!("{company}: {visibility}");
    Ok(())
}

pub(crate) fn run_reset(config: &AppConfig) -> anyhow::Result<()> {
    let mut session = open_session(config);
    session
        .dispatch(SessionAction::ResetVisibility)
        .context("failed to save provider visibility")?;
    println!("all providers reset to normal");
    Ok(())
}

pub(crate) fn run_history(config: &AppConfig) -> anyhow::Result<()> {
    let session = open_session(config);
    let history = &session.state().history;
    if history.is_empty() {
        println!("no searches yet; run `rehabmap search <ADDRESS>`");
        return Ok(());
    }
    for (i, query) in history.queries().iter().enumerate() {
        println!("{:>2}. {query}", i + 1);
    }
    Ok(())
}
