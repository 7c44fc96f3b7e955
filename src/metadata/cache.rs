//! Session-lifetime metadata cache.

use std::sync::Arc;

use dashmap::DashMap;

use super::{DEFAULT_META_EXTENSION, Metadata, fetch_metadata};
use crate::resource::ResourceSource;

/// Memoized metadata lookups keyed by file address.
///
/// Negative results are cached too. Entries are never evicted: the key space
/// is bounded by the number of files in the catalog. Two concurrent misses
/// for the same key may both fetch; the later insert wins and both values
/// are equally valid.
pub struct MetadataCache {
    entries: DashMap<String, Option<Arc<Metadata>>>,
    extension: String,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::with_extension(DEFAULT_META_EXTENSION)
    }

    pub fn with_extension(extension: impl Into<String>) -> Self {
        Self {
            entries: DashMap::new(),
            extension: extension.into(),
        }
    }

    /// Return cached metadata for `file_address`, fetching on first use.
    pub fn get_or_fetch(
        &self,
        source: &dyn ResourceSource,
        file_address: &str,
    ) -> Option<Arc<Metadata>> {
        if let Some(hit) = self.entries.get(file_address) {
            return hit.value().clone();
        }

        let fetched = fetch_metadata(source, file_address, &self.extension).map(Arc::new);
        self.entries
            .insert(file_address.to_string(), fetched.clone());
        fetched
    }

    /// Check if a lookup for `file_address` has already settled.
    #[cfg(test)]
    pub fn contains(&self, file_address: &str) -> bool {
        self.entries.contains_key(file_address)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new()
    }
}
