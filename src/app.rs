//! Shared state for request handling.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::catalog::Catalog;
use crate::config::{SiteSectionConfig, SyllabusConfig};
use crate::metadata::MetadataCache;
use crate::resource::{ResourceSource, StaticRoot};
use crate::session::SessionStore;

/// Everything a request handler reads: the catalog, the content root, the
/// metadata cache and the live sessions.
pub struct App {
    pub site: SiteSectionConfig,
    pub catalog: Arc<Catalog>,
    /// Directory served for static resources.
    pub root: StaticRoot,
    /// Where viewers and the metadata loader fetch from.
    source: Box<dyn ResourceSource>,
    pub metadata: MetadataCache,
    pub sessions: SessionStore,
}

impl App {
    /// Load the catalog named by the config and serve from its content root.
    pub fn load(config: &SyllabusConfig) -> Result<Self> {
        let catalog_path = config.content.catalog_path();
        let catalog = Catalog::load(&catalog_path)
            .with_context(|| format!("failed to load catalog `{}`", catalog_path.display()))?;
        let root = StaticRoot::new(&config.content.root);

        Ok(Self::new(
            config.site.clone(),
            catalog,
            root.clone(),
            Box::new(root),
            MetadataCache::with_extension(&config.content.meta_extension),
        ))
    }

    pub fn new(
        site: SiteSectionConfig,
        catalog: Catalog,
        root: StaticRoot,
        source: Box<dyn ResourceSource>,
        metadata: MetadataCache,
    ) -> Self {
        Self {
            site,
            catalog: Arc::new(catalog),
            root,
            source,
            metadata,
            sessions: SessionStore::new(),
        }
    }

    #[inline]
    pub fn source(&self) -> &dyn ResourceSource {
        self.source.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_from_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("courses.json"),
            r#"{"courses": [{"id": "intro", "name": "Intro", "weeks": []}]}"#,
        )
        .unwrap();

        let mut config = SyllabusConfig::default();
        config.content.root = dir.path().to_path_buf();

        let app = App::load(&config).unwrap();
        assert!(app.catalog.course("intro").is_some());
        assert_eq!(app.root.path(), dir.path());
    }

    #[test]
    fn test_load_missing_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SyllabusConfig::default();
        config.content.root = dir.path().to_path_buf();

        let err = App::load(&config).err().unwrap();
        assert!(format!("{err:#}").contains("courses.json"));
    }
}
