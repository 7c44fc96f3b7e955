//! Small text helpers shared by pages and the terminal report.

/// Return "s" suffix for plural counts
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format count with noun, handling pluralization
///
/// - `plural_count(0, "file")` -> `"0 files"`
/// - `plural_count(1, "week")` -> `"1 week"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}

/// Download filename for a file: its display name, with `.ext` appended
/// unless already present.
pub fn download_name(display_name: &str, ext: &str) -> String {
    let name = display_name.trim();
    let name = if name.is_empty() { "download" } else { name };
    let suffix = format!(".{ext}");
    if name.to_ascii_lowercase().ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{name}{suffix}")
    }
}
