//! Navigation addresses.
//!
//! - Parsing: browser URL → [`Route`] (segments decoded, trailing slash and
//!   query string tolerated)
//! - Building: `*_href` helpers encode segments on the way out

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use url::form_urlencoded;

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Address of a file viewer: raw `(course, week, file)` segments.
///
/// Week and file stay unparsed so the resolver can tell a malformed index
/// apart from an unknown course.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileTarget {
    pub course: String,
    pub week: String,
    pub file: String,
}

/// Optional viewer parameters from the query string.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewParams {
    pub page: Option<u32>,
    pub zoom: Option<f32>,
}

/// A parsed request path.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Home,
    Course { id: String },
    File { target: FileTarget, view: ViewParams },
    /// Flip one week in the sidebar, then redirect to `back`.
    Toggle { course: String, week: String, back: String },
    ApiCatalog,
    ApiSession,
    Stylesheet,
    /// Anything else: a static resource path (still encoded).
    Resource(String),
}

impl Route {
    /// Parse the request target of an HTTP request.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.split('#').next().unwrap_or(raw);
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, query),
            None => (raw, ""),
        };

        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
            .collect();
        let parts: Vec<&str> = segments.iter().map(String::as_str).collect();

        match parts.as_slice() {
            [] => Self::Home,
            ["course", id] => Self::Course { id: (*id).to_string() },
            ["course", course, week, file] => Self::File {
                target: FileTarget {
                    course: (*course).to_string(),
                    week: (*week).to_string(),
                    file: (*file).to_string(),
                },
                view: ViewParams::from_query(query),
            },
            ["_nav", "toggle"] => {
                Self::parse_toggle(query).unwrap_or_else(|| Self::Resource(path.to_string()))
            }
            ["api", "catalog"] => Self::ApiCatalog,
            ["api", "session"] => Self::ApiSession,
            ["_syllabus", "style.css"] => Self::Stylesheet,
            _ => Self::Resource(path.to_string()),
        }
    }

    fn parse_toggle(query: &str) -> Option<Self> {
        let mut course = None;
        let mut week = None;
        let mut back = None;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "course" => course = Some(value.into_owned()),
                "week" => week = Some(value.into_owned()),
                "back" => back = Some(value.into_owned()),
                _ => {}
            }
        }
        let course = course?;
        let week = week?;
        let back = back
            .filter(|b| is_local_path(b))
            .unwrap_or_else(|| course_href(&course));
        Some(Self::Toggle { course, week, back })
    }
}

impl ViewParams {
    /// Read `page` and `zoom`, ignoring values that do not parse.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "page" => params.page = value.trim().parse().ok(),
                "zoom" => {
                    params.zoom = value.trim().parse::<f32>().ok().filter(|z| z.is_finite());
                }
                _ => {}
            }
        }
        params
    }
}

/// Only same-origin absolute paths are accepted as redirect targets.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

#[inline]
fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

pub fn course_href(id: &str) -> String {
    format!("/course/{}", encode_segment(id))
}

pub fn file_href(course: &str, week: usize, file: usize) -> String {
    format!("/course/{}/{week}/{file}", encode_segment(course))
}

/// Viewer href with PDF page and zoom appended to `base`.
pub fn view_href(base: &str, page: u32, zoom: f32) -> String {
    format!("{base}?page={page}&zoom={zoom:.1}")
}

/// Href for a content address: absolute URLs pass through, local paths
/// are percent-encoded segment by segment under a leading `/`.
pub fn resource_href(address: &str) -> std::borrow::Cow<'_, str> {
    if crate::catalog::is_external_address(address) {
        return std::borrow::Cow::Borrowed(address);
    }
    let encoded: Vec<String> = address
        .trim_start_matches('/')
        .split('/')
        .map(encode_segment)
        .collect();
    std::borrow::Cow::Owned(format!("/{}", encoded.join("/")))
}

pub fn toggle_href(course: &str, week: &str, back: &str) -> String {
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("course", course)
        .append_pair("week", week)
        .append_pair("back", back)
        .finish();
    format!("/_nav/toggle?{query}")
}
