//! Configuration management for `syllabus.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── content    # [content]
//! │   ├── serve      # [serve]
//! │   └── site       # [site]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── handle     # Global config handle
//! └── mod.rs         # SyllabusConfig (this file)
//! ```
//!
//! The config file is optional: without one, every section uses its
//! defaults and the current directory is the project root.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{ContentConfig, ServeConfig, SiteSectionConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config};

use crate::{
    cli::{Cli, Commands},
    debug, log,
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Config file name looked up when `-C` is not given.
pub const DEFAULT_CONFIG_NAME: &str = "syllabus.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing syllabus.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyllabusConfig {
    /// CLI arguments reference (internal use only)
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file, which may not exist (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory: parent of the config file, or cwd (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Page chrome text
    #[serde(default)]
    pub site: SiteSectionConfig,

    /// Content root, catalog and metadata settings
    #[serde(default)]
    pub content: ContentConfig,

    /// HTTP server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl SyllabusConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. The project root is the
    /// config file's parent directory, or cwd when no file exists.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        // Verbosity first, so lookup and parsing can log at debug level
        crate::logger::set_verbose(cli.verbose);

        let (config_path, exists) = Self::resolve_config_path(cli)?;

        let mut config = if exists {
            Self::from_path(&config_path)?
        } else {
            debug!("config"; "no {} found, using defaults", cli.config.display());
            Self::default()
        };

        // Raw checks must run before paths become absolute
        let mut diag = ConfigDiagnostics::new();
        config.content.validate_raw(&mut diag);
        diag.into_result().map_err(ConfigError::Diagnostics)?;

        config.config_path = config_path;
        config.cli = Some(cli);
        config.finalize(cli)?;
        config.validate()?;

        Ok(config)
    }

    /// Resolve the config file path.
    ///
    /// A missing default-named file is fine; a missing file named with `-C`
    /// is an error.
    fn resolve_config_path(cli: &Cli) -> Result<(PathBuf, bool)> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        match find_config_file(&cli.config) {
            Some(path) => Ok((path, true)),
            None if cli.config.as_os_str() == DEFAULT_CONFIG_NAME => {
                Ok((cwd.join(&cli.config), false))
            }
            None => bail!("config file `{}` not found", cli.config.display()),
        }
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, cli: &Cli) -> Result<()> {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        self.set_root(&root);
        self.normalize_paths(cli)?;
        self.apply_command_options(cli);
        Ok(())
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.root = path.to_path_buf();
    }

    /// Get path relative to the content root, for display.
    pub fn content_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.content.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Serve { interface, port } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
            }
            Commands::Check { .. } | Commands::Query { .. } => {}
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Make the content root absolute and apply CLI path overrides.
    ///
    /// `--root` is relative to cwd; `[content].root` is relative to the
    /// project root. `~` is expanded in both.
    fn normalize_paths(&mut self, cli: &Cli) -> Result<()> {
        let root = crate::utils::path::normalize_path(&self.root);
        self.set_root(&root);
        self.config_path = crate::utils::path::normalize_path(&self.config_path);

        let content_root = match &cli.root {
            Some(path) => {
                let cwd = std::env::current_dir().context("Failed to get current working directory")?;
                Self::expand_path(path, &cwd)
            }
            None => Self::expand_path(&self.content.root, &root),
        };
        self.content.root = content_root;

        Self::update_option(&mut self.content.catalog, cli.catalog.as_ref());
        Ok(())
    }

    /// Expand `~` and join relative paths onto `base`.
    fn expand_path(path: &Path, base: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
        let path = PathBuf::from(expanded);
        let full_path = if path.is_relative() {
            base.join(&path)
        } else {
            path
        };
        crate::utils::path::normalize_path(&full_path)
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration after normalization.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.content.validate(&mut diag);
        self.serve.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config text.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SyllabusConfig {
    let (parsed, ignored) = SyllabusConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
