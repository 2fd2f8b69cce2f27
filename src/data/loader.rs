//! CSV Data Loader Module
//! Loads the login activity CSV with Polars and normalizes it for aggregation.

use super::preview::PreviewTable;
use super::schema::{normalize_column_name, DatasetSchema, OptionalField, TIMESTAMP_COLUMN};
use super::timestamp::parse_timestamp;
use chrono::NaiveDateTime;
use polars::prelude::*;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CSV: &str = "login_activity.csv";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("{} not found. Please place it in the working directory.", .0.display())]
    DatasetNotFound(PathBuf),
    #[error("{} has no login_status column", .0.display())]
    MissingStatusColumn(PathBuf),
    #[error("Column '{0}' appears more than once after normalization")]
    DuplicateColumn(String),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// A loaded, normalized login dataset. Read-only once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    schema: DatasetSchema,
    coerced_timestamps: usize,
}

/// Load a CSV file and normalize it.
///
/// Every cell is read as text. Headers are trimmed and lowercased, and a
/// `timestamp` column, when present, is parsed cell by cell with
/// unparseable values coerced to null.
pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let metadata = match std::fs::metadata(path) {
        Ok(m) if m.is_file() => m,
        Ok(_) => return Err(LoadError::DatasetNotFound(path.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(LoadError::DatasetNotFound(path.to_path_buf()))
        }
        Err(source) => {
            return Err(LoadError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    // No bytes means no header, so no status column either
    if metadata.len() == 0 {
        return Err(LoadError::MissingStatusColumn(path.to_path_buf()));
    }

    let mut df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()?;

    let normalized: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| normalize_column_name(name.as_str()))
        .collect();

    let mut seen = HashSet::new();
    if let Some(dup) = normalized.iter().find(|name| !seen.insert(name.as_str())) {
        return Err(LoadError::DuplicateColumn(dup.clone()));
    }
    df.set_column_names(normalized.iter().map(String::as_str))?;

    // Quoted empty fields ("") come through as empty strings, plain ones as null
    let df = df
        .lazy()
        .with_columns(
            normalized
                .iter()
                .map(|name| {
                    when(col(name.as_str()).eq(lit("")))
                        .then(lit(NULL).cast(DataType::String))
                        .otherwise(col(name.as_str()))
                        .alias(name.as_str())
                })
                .collect::<Vec<_>>(),
        )
        .collect()?;

    let schema = DatasetSchema::detect(&normalized);
    debug!(columns = ?schema.columns(), optional = ?schema.optional_fields().collect::<Vec<_>>(), "Detected schema");
    if !schema.has_status() {
        return Err(LoadError::MissingStatusColumn(path.to_path_buf()));
    }

    let mut df = df;
    let mut coerced_timestamps = 0;
    if schema.has(OptionalField::Timestamp) {
        let parsed = parse_timestamp_column(&df, &mut coerced_timestamps)?;
        let column = DatetimeChunked::from_naive_datetime_options(
            TIMESTAMP_COLUMN.into(),
            parsed,
            TimeUnit::Microseconds,
        )
        .into_series();
        df.with_column(column)?;
    }

    if coerced_timestamps > 0 {
        warn!(
            coerced = coerced_timestamps,
            "Unparseable timestamps coerced to null"
        );
    }
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Loaded login dataset"
    );

    Ok(Dataset {
        frame: df,
        schema,
        coerced_timestamps,
    })
}

fn parse_timestamp_column(
    df: &DataFrame,
    coerced: &mut usize,
) -> Result<Vec<Option<NaiveDateTime>>, LoadError> {
    let raw = df.column(TIMESTAMP_COLUMN)?.as_materialized_series().str()?;
    let parsed = raw
        .into_iter()
        .map(|cell| {
            let text = cell.map(str::trim).filter(|s| !s.is_empty())?;
            let value = parse_timestamp(text);
            if value.is_none() {
                *coerced += 1;
            }
            value
        })
        .collect();
    Ok(parsed)
}

impl Dataset {
    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    /// The normalized frame; `timestamp`, when present, is a Datetime column.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Non-empty timestamp cells that failed to parse.
    pub fn coerced_timestamps(&self) -> usize {
        self.coerced_timestamps
    }

    /// Column name for an optional field, `None` when the schema lacks it.
    pub fn column_for(&self, field: OptionalField) -> Option<&'static str> {
        self.schema.has(field).then(|| field.column_name())
    }

    /// First `limit` rows for display.
    pub fn preview(&self, limit: usize) -> Result<PreviewTable, LoadError> {
        Ok(PreviewTable::from_frame(&self.frame, limit)?)
    }
}
