mod errors;
mod table;
mod transaction;

pub use errors::{LoadError, RecordError, SchemaError};
pub use table::{validate_schema, ColumnSet, Table, REQUIRED_COLUMNS};
pub use transaction::{convert_to_base, RawRecord, Transaction};
