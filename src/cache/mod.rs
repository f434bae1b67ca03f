//! Answer cache: the in-memory question → answer store and its CSV persistence.

pub mod persistence;
pub mod store;

pub use persistence::{write_csv, CachePersistence, CsvFile, CSV_HEADER};
pub use store::{CacheEntry, CacheStore};
