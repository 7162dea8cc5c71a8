mod cache;
mod decode;
mod fallback;
mod record_loader;

pub use cache::{CachedTable, TableCache};
pub use decode::{decode_csv, normalize_rows, DecodedPartition, PartitionFormat};
pub use fallback::{load_with_fallback, DataOrigin, LoadOutcome};
pub use record_loader::{load, location_of, partition_value};
