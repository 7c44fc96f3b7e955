//! Content resources: fetching files by content address.
//!
//! Viewers and the metadata loader go through [`ResourceSource`] instead of
//! touching the filesystem, so tests can swap in an in-memory source.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::utils::path::{resolve_under_root, resolve_url_under_root};

/// Resource fetch failures
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("resource not found: `{0}`")]
    NotFound(String),

    #[error("IO error when reading `{0}`")]
    Io(String, #[source] std::io::Error),

    #[error("resource `{0}` is not valid UTF-8")]
    Encoding(String),
}

impl FetchError {
    /// Check if this is the ordinary "nothing there" case.
    #[inline]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Something that can return the bytes behind a content address.
pub trait ResourceSource: Send + Sync {
    fn fetch(&self, address: &str) -> Result<Vec<u8>, FetchError>;

    /// Fetch and decode as UTF-8 text.
    fn fetch_text(&self, address: &str) -> Result<String, FetchError> {
        let bytes = self.fetch(address)?;
        String::from_utf8(bytes).map_err(|_| FetchError::Encoding(address.to_string()))
    }
}

/// Static directory served as-is (the content root).
#[derive(Debug, Clone)]
pub struct StaticRoot {
    root: PathBuf,
}

impl StaticRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Map a content address to a file on disk, if one exists under the root.
    pub fn locate(&self, address: &str) -> Option<PathBuf> {
        resolve_under_root(address, &self.root)
    }

    /// Map a percent-encoded request path to a file under the root.
    pub fn locate_url(&self, url: &str) -> Option<PathBuf> {
        resolve_url_under_root(url, &self.root)
    }
}

impl ResourceSource for StaticRoot {
    fn fetch(&self, address: &str) -> Result<Vec<u8>, FetchError> {
        let path = self
            .locate(address)
            .ok_or_else(|| FetchError::NotFound(address.to_string()))?;
        fs::read(&path).map_err(|err| FetchError::Io(address.to_string(), err))
    }
}

#[cfg(test)]
pub mod testing {
    //! In-memory source with fetch counting.

    use super::{FetchError, ResourceSource};
    use rustc_hash::FxHashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    pub struct MemorySource {
        files: FxHashMap<String, Vec<u8>>,
        fetches: AtomicUsize,
    }

    impl MemorySource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, address: &str, content: impl Into<Vec<u8>>) -> Self {
            self.files.insert(address.to_string(), content.into());
            self
        }

        pub fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl ResourceSource for MemorySource {
        fn fetch(&self, address: &str) -> Result<Vec<u8>, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.files
                .get(address)
                .cloned()
                .ok_or_else(|| FetchError::NotFound(address.to_string()))
        }
    }
}
