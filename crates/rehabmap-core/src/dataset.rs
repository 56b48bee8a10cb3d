//! Reading and writing the provider dataset CSV.

use std::io;
use std::path::Path;

use crate::error::DatasetError;
use crate::providers::{MappedProvider, ProviderRecord};

/// Columns a dataset must carry. `Display Name` is optional.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "Company Name",
    "Business Address",
    "Suburb",
    "State",
    "Postcode",
    "Region",
    "Phone",
    "Provider ID",
    "Link",
    "Latitude",
    "Longitude",
];

/// Providers ready for mapping, plus a count of rows left out.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub providers: Vec<MappedProvider>,
    /// Rows dropped for missing/non-numeric coordinates or malformed fields.
    pub excluded: usize,
}

/// Load the provider dataset from a CSV file.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be opened, the header row is
/// unreadable, or a required column is absent. Individual bad rows are
/// excluded rather than failing the load.
pub fn load_providers(path: &Path) -> Result<Dataset, DatasetError> {
    let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let dataset = read_providers(io::BufReader::new(file), &path.display().to_string())?;

    tracing::info!(
        path = %path.display(),
        mapped = dataset.providers.len(),
        excluded = dataset.excluded,
        "provider dataset loaded"
    );
    Ok(dataset)
}

/// Parse a provider dataset from any reader. `source` names it in errors.
///
/// # Errors
///
/// See [`load_providers`].
pub fn read_providers<R: io::Read>(reader: R, source: &str) -> Result<Dataset, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| DatasetError::Csv {
            path: source.to_string(),
            source: e,
        })?
        .clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.trim() == *column) {
            return Err(DatasetError::MissingColumn {
                path: source.to_string(),
                column: (*column).to_string(),
            });
        }
    }

    let mut dataset = Dataset::default();
    for (index, row) in csv_reader.deserialize::<ProviderRecord>().enumerate() {
        // Data rows start on line 2.
        let line = index + 2;
        let record = match row {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(source, line, error = %e, "skipping malformed provider row");
                dataset.excluded += 1;
                continue;
            }
        };

        match MappedProvider::from_record(record) {
            Some(provider) => dataset.providers.push(provider),
            None => {
                tracing::debug!(source, line, "skipping provider without usable coordinates");
                dataset.excluded += 1;
            }
        }
    }

    Ok(dataset)
}

/// Write provider records to a CSV file, creating parent directories.
///
/// Records without coordinates are written with empty coordinate fields.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be created or written.
pub fn write_providers(path: &Path, records: &[ProviderRecord]) -> Result<(), DatasetError> {
    let io_err = |source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    };
    let csv_err = |source| DatasetError::Csv {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for record in records {
        writer.serialize(record).map_err(csv_err)?;
    }
    writer.flush().map_err(io_err)?;

    tracing::info!(path = %path.display(), count = records.len(), "provider dataset written");
    Ok(())
}
