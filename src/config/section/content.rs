//! `[content]` section configuration.
//!
//! Where course material lives on disk.
//!
//! ```toml
//! [content]
//! root = "public"             # Served directory (relative to syllabus.toml)
//! catalog = "courses.json"    # Catalog file (relative to root)
//! meta_extension = "meta"     # Sidecar metadata extension
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory served as the content root. Content addresses starting
    /// with `/` resolve against it.
    pub root: PathBuf,

    /// Catalog JSON file, relative to `root`.
    pub catalog: PathBuf,

    /// Extension of metadata sidecar files, without the dot.
    pub meta_extension: String,
}

pub struct ContentConfigFields {
    pub root: FieldPath,
    pub catalog: FieldPath,
    pub meta_extension: FieldPath,
}

impl ContentConfig {
    pub const FIELDS: ContentConfigFields = ContentConfigFields {
        root: FieldPath::new("content.root"),
        catalog: FieldPath::new("content.catalog"),
        meta_extension: FieldPath::new("content.meta_extension"),
    };

    /// Absolute path of the catalog file. Valid after path normalization.
    pub fn catalog_path(&self) -> PathBuf {
        self.root.join(&self.catalog)
    }

    /// Checks on raw values, before paths are made absolute.
    pub fn validate_raw(&self, diag: &mut ConfigDiagnostics) {
        if self.catalog.as_os_str().is_empty() {
            diag.error(Self::FIELDS.catalog, "catalog path is empty");
        } else if self.catalog.is_absolute() {
            diag.error_with_hint(
                Self::FIELDS.catalog,
                "catalog must be relative to the content root",
                "paths like \"courses.json\" are looked up inside the content root",
            );
        }

        let ext = self.meta_extension.as_str();
        if ext.is_empty() || ext.contains(['.', '/', '\\']) {
            diag.error_with_hint(
                Self::FIELDS.meta_extension,
                format!("invalid metadata extension `{ext}`"),
                "use a bare extension such as \"meta\"",
            );
        }
    }

    /// Checks against the filesystem, after normalization.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.root.is_dir() {
            diag.error_with_hint(
                Self::FIELDS.root,
                format!("content root `{}` is not a directory", self.root.display()),
                "pass --root or set [content].root",
            );
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            catalog: PathBuf::from("courses.json"),
            meta_extension: crate::metadata::DEFAULT_META_EXTENSION.into(),
        }
    }
}
