//! Path and URL utilities.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `resolve_under_root`, `resolve_url_under_root`)

pub mod fs;

pub use fs::{normalize_path, resolve_under_root, resolve_url_under_root};
