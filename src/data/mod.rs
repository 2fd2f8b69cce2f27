//! Data module - CSV loading, normalization and schema detection

mod loader;
mod preview;
mod schema;
mod timestamp;

pub use loader::{load_dataset, Dataset, LoadError, DEFAULT_CSV};
pub use preview::{PreviewTable, PREVIEW_ROWS};
pub use schema::{OptionalField, STATUS_COLUMN, TIMESTAMP_COLUMN};
