//! Metadata fetching with a soft-failure policy.
//!
//! A missing or broken sidecar is never an error: every failure path
//! resolves to `None` and is only reported through `debug!`.

use super::{Metadata, derive_metadata_address};
use crate::debug;
use crate::resource::ResourceSource;

/// Fetch and parse metadata for `file_address` using the given extension.
pub fn fetch_metadata(
    source: &dyn ResourceSource,
    file_address: &str,
    extension: &str,
) -> Option<Metadata> {
    let meta_address = derive_metadata_address(file_address, extension)?;

    let bytes = match source.fetch(&meta_address) {
        Ok(bytes) => bytes,
        Err(e) if e.is_not_found() => {
            debug!("meta"; "no metadata for {}", file_address);
            return None;
        }
        Err(e) => {
            debug!("meta"; "failed to fetch {}: {}", meta_address, e);
            return None;
        }
    };

    match Metadata::from_slice(&bytes) {
        Ok(meta) => Some(meta),
        Err(e) => {
            debug!("meta"; "ignoring malformed {}: {}", meta_address, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::DEFAULT_META_EXTENSION;
    use crate::resource::testing::MemorySource;

    #[test]
    fn test_fetch_present() {
        let source = MemorySource::new().with(
            "/courses/intro/w0/l1.meta",
            r#"{"author": "Ada", "tags": ["x"]}"#,
        );
        let meta = fetch_metadata(&source, "/courses/intro/w0/l1.md", DEFAULT_META_EXTENSION).unwrap();
        assert_eq!(meta.author.as_deref(), Some("Ada"));
        assert_eq!(meta.tags, vec!["x"]);
    }

    #[test]
    fn test_fetch_missing_is_none() {
        let source = MemorySource::new();
        assert!(fetch_metadata(&source, "/courses/intro/w0/l1.md", DEFAULT_META_EXTENSION).is_none());
        assert_eq!(source.fetch_count(), 1);
    }

    #[test]
    fn test_fetch_malformed_is_none() {
        let source = MemorySource::new().with("/a.meta", "{ not json");
        assert!(fetch_metadata(&source, "/a.md", DEFAULT_META_EXTENSION).is_none());

        let source = MemorySource::new().with("/b.meta", "[1, 2]");
        assert!(fetch_metadata(&source, "/b.md", DEFAULT_META_EXTENSION).is_none());
    }

    #[test]
    fn test_fetch_external_skips_source() {
        let source = MemorySource::new();
        assert!(fetch_metadata(&source, "https://youtube.com/watch?v=XYZ", DEFAULT_META_EXTENSION).is_none());
        assert_eq!(source.fetch_count(), 0);
    }

    #[test]
    fn test_fetch_custom_extension() {
        let source = MemorySource::new().with("/a.json", r#"{"duration": "5 min"}"#);
        let meta = fetch_metadata(&source, "/a.md", "json").unwrap();
        assert_eq!(meta.duration.as_deref(), Some("5 min"));
    }
}
