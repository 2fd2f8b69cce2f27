//! Schema Detection Module
//! Decides which of the recognized login columns a dataset carries.

use std::collections::BTreeSet;

pub const STATUS_COLUMN: &str = "login_status";
pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const DEVICE_COLUMN: &str = "device";
pub const LOCATION_COLUMN: &str = "location";

/// Trim and lowercase a raw CSV header.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Columns whose presence gates an aggregate and its chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionalField {
    Timestamp,
    Device,
    Location,
}

impl OptionalField {
    pub const ALL: [OptionalField; 3] = [
        OptionalField::Timestamp,
        OptionalField::Device,
        OptionalField::Location,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            OptionalField::Timestamp => TIMESTAMP_COLUMN,
            OptionalField::Device => DEVICE_COLUMN,
            OptionalField::Location => LOCATION_COLUMN,
        }
    }
}

/// Normalized column list plus the recognized fields found in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSchema {
    columns: Vec<String>,
    has_status: bool,
    optional: BTreeSet<OptionalField>,
}

impl DatasetSchema {
    /// Detect recognized fields from column names.
    ///
    /// Names are normalized again here so callers may pass raw headers.
    pub fn detect<S: AsRef<str>>(columns: &[S]) -> Self {
        let columns: Vec<String> = columns
            .iter()
            .map(|c| normalize_column_name(c.as_ref()))
            .collect();

        let has_status = columns.iter().any(|c| c == STATUS_COLUMN);
        let optional = OptionalField::ALL
            .into_iter()
            .filter(|field| columns.iter().any(|c| c == field.column_name()))
            .collect();

        Self {
            columns,
            has_status,
            optional,
        }
    }

    pub fn has(&self, field: OptionalField) -> bool {
        self.optional.contains(&field)
    }

    pub fn has_status(&self) -> bool {
        self.has_status
    }

    pub fn optional_fields(&self) -> impl Iterator<Item = OptionalField> + '_ {
        self.optional.iter().copied()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_headers() {
        assert_eq!(normalize_column_name("  Login_Status "), "login_status");
        assert_eq!(normalize_column_name("DEVICE"), "device");
        assert_eq!(normalize_column_name("user id"), "user id");
    }

    #[test]
    fn detects_all_recognized_fields() {
        let schema = DatasetSchema::detect(&[" Timestamp", "LOGIN_STATUS", "device ", "Location"]);
        assert!(schema.has_status());
        assert!(schema.has(OptionalField::Timestamp));
        assert!(schema.has(OptionalField::Device));
        assert!(schema.has(OptionalField::Location));
        assert_eq!(
            schema.columns(),
            &["timestamp", "login_status", "device", "location"]
        );
    }

    #[test]
    fn absent_optional_columns_are_not_reported() {
        let schema = DatasetSchema::detect(&["login_status", "user"]);
        assert!(schema.has_status());
        assert_eq!(schema.optional_fields().count(), 0);
        assert!(!schema.has(OptionalField::Device));
    }

    #[test]
    fn status_column_detection() {
        let schema = DatasetSchema::detect(&["timestamp", "status"]);
        assert!(!schema.has_status());
        assert!(schema.has(OptionalField::Timestamp));
    }
}
