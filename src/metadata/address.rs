//! Sidecar address derivation.

use crate::catalog::is_external_address;

/// Default sidecar extension.
pub const DEFAULT_META_EXTENSION: &str = "meta";

/// Derive the sidecar address for a file address, given the sidecar
/// extension (no leading dot).
///
/// ```text
/// /courses/Week 1/01 Intro.md  -> /courses/Week 1/01 Intro.meta
/// /courses/Week 1/README       -> /courses/Week 1/README.meta
/// https://youtube.com/...      -> None
/// ```
///
/// Only the last path segment is searched for the extension separator, so a
/// dotted directory name is never truncated.
pub fn derive_metadata_address(file_address: &str, extension: &str) -> Option<String> {
    if is_external_address(file_address) {
        return None;
    }

    let name_start = file_address.rfind('/').map_or(0, |i| i + 1);
    let stem = match file_address[name_start..].rfind('.') {
        Some(dot) => &file_address[..name_start + dot],
        None => file_address,
    };

    Some(format!("{stem}.{extension}"))
}
