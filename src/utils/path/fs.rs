//! Path normalization utilities.
//!
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `resolve_under_root` - map a content address onto a file inside a root
//! - `resolve_url_under_root` - same, for a percent-encoded request path

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve a request URL to a regular file under `root`.
///
/// The query string and fragment are dropped and the path is
/// percent-decoded before lookup.
pub fn resolve_url_under_root(url: &str, root: &Path) -> Option<PathBuf> {
    resolve_under_root(&normalize_url(url), root)
}

/// Resolve a literal path to a regular file under `root`.
///
/// `?`, `#` and `%` are ordinary filename characters here. Returns `None`
/// when the target does not exist, is not a file, or escapes `root` (via
/// `..` or symlinks).
pub fn resolve_under_root(path: &str, root: &Path) -> Option<PathBuf> {
    let clean = path.trim_matches('/');

    // Reject paths with suspicious patterns early
    if clean.split('/').any(|segment| segment == "..") {
        return None;
    }

    let local = root.join(&clean);

    // Canonicalize to resolve symlinks and verify path is under root
    let canonical = local.canonicalize().ok()?;
    let root_canonical = root.canonicalize().ok()?;

    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    canonical.is_file().then_some(canonical)
}

/// Normalize URL: strip query string and fragment, then decode
fn normalize_url(url: &str) -> String {
    use percent_encoding::percent_decode_str;

    let path = url.split(['?', '#']).next().unwrap_or(url);
    percent_decode_str(path)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default()
}
