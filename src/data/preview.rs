//! Raw data preview: the first rows of the normalized dataset as display text.

use polars::prelude::*;
use serde::Serialize;

/// Number of rows shown in the raw data preview.
pub const PREVIEW_ROWS: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PreviewTable {
    pub columns: Vec<String>,
    /// Row-major cells; `None` marks a null cell.
    pub rows: Vec<Vec<Option<String>>>,
}

impl PreviewTable {
    /// Take the first `limit` rows of `df`, in original order.
    pub fn from_frame(df: &DataFrame, limit: usize) -> PolarsResult<Self> {
        let head = df.head(Some(limit));
        let columns = head
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut rows: Vec<Vec<Option<String>>> =
            vec![Vec::with_capacity(head.width()); head.height()];
        for column in head.get_columns() {
            let series = column.as_materialized_series();
            for (i, row) in rows.iter_mut().enumerate() {
                row.push(Self::cell_text(series.get(i)?));
            }
        }

        Ok(Self { columns, rows })
    }

    fn cell_text(value: AnyValue) -> Option<String> {
        match value {
            AnyValue::Null => None,
            AnyValue::String(s) => Some(s.to_string()),
            other => Some(other.to_string().trim_matches('"').to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
