//! File metadata: sidecar address derivation, fetching and caching.

mod address;
mod cache;
mod loader;
mod model;

pub use address::{DEFAULT_META_EXTENSION, derive_metadata_address};
pub use cache::MetadataCache;
pub use loader::fetch_metadata;
pub use model::Metadata;

#[cfg(test)]
pub use model::Difficulty;
