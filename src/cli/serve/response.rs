//! HTTP response handlers.

use crate::page::Page;
use crate::utils::mime::types::{HTML, JSON, PLAIN};
use anyhow::{Context, Result, anyhow};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::{fs, path::Path};
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Characters escaped in a `Location` header value.
const LOCATION: &AsciiSet = &CONTROLS.add(b' ').add(b'"');

/// Extra header sent with a page: the session cookie for new sessions.
pub type Cookie = Option<String>;

/// Respond with a static file from the content root.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = crate::utils::mime::from_path(path);

    if is_head_request(&request) {
        return send_head(request, 200, content_type);
    }

    // Range requests (PDF viewers and media seek)
    if let Some(range) = get_range_header(&request) {
        return respond_range(request, path, content_type, &range);
    }

    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    send_body(request, 200, content_type, body)
}

/// Handle a Range request by streaming the requested slice.
fn respond_range(
    request: Request,
    path: &Path,
    content_type: &'static str,
    range: &str,
) -> Result<()> {
    use std::io::{Read, Seek, SeekFrom};

    let file_size = fs::metadata(path)?.len();

    let Some(ranges) = range.trim().strip_prefix("bytes=") else {
        return respond_file_whole(request, path, content_type);
    };
    let (start, end) = match parse_range(ranges, file_size) {
        ByteRange::Satisfiable(start, end) => (start, end),
        ByteRange::Unsatisfiable => {
            let response = Response::empty(StatusCode(416))
                .with_header(header("Content-Range", &format!("bytes */{file_size}"))?);
            request.respond(response)?;
            return Ok(());
        }
        // A Range header we cannot parse is ignored
        ByteRange::Invalid => return respond_file_whole(request, path, content_type),
    };

    let length = end - start + 1;

    let mut file = fs::File::open(path)?;
    file.seek(SeekFrom::Start(start))?;
    let reader = file.take(length);

    let content_range = format!("bytes {start}-{end}/{file_size}");
    let response = Response::new(
        StatusCode(206),
        vec![
            header("Content-Type", content_type)?,
            header("Content-Range", &content_range)?,
            header("Accept-Ranges", "bytes")?,
        ],
        reader,
        usize::try_from(length).ok(),
        None,
    );

    request.respond(response)?;
    Ok(())
}

fn respond_file_whole(request: Request, path: &Path, content_type: &'static str) -> Result<()> {
    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    send_body(request, 200, content_type, body)
}

/// Outcome of parsing a `bytes=` range set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ByteRange {
    /// Inclusive bounds within the file.
    Satisfiable(u64, u64),
    /// Well-formed, but outside the file: `416`.
    Unsatisfiable,
    /// Not a byte range at all: serve the whole file.
    Invalid,
}

/// Parse a single `start-end` byte range into inclusive bounds.
///
/// Multiple ranges are not supported; only the first is used.
fn parse_range(spec: &str, file_size: u64) -> ByteRange {
    let Some(first) = spec.split(',').next().map(str::trim) else {
        return ByteRange::Invalid;
    };
    let Some((s, e)) = first.split_once('-') else {
        return ByteRange::Invalid;
    };
    let (s, e) = (s.trim(), e.trim());
    let parse = |v: &str| v.parse::<u64>().ok();

    let bounds = match (s.is_empty(), e.is_empty()) {
        // "0-499"
        (false, false) => match (parse(s), parse(e)) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            _ => return ByteRange::Invalid,
        },
        // "500-"
        (false, true) => match parse(s) {
            Some(start) => Some((start, u64::MAX)),
            None => return ByteRange::Invalid,
        },
        // "-500": last 500 bytes
        (true, false) => match parse(e) {
            Some(0) => None,
            Some(suffix) => Some((file_size.saturating_sub(suffix), u64::MAX)),
            None => return ByteRange::Invalid,
        },
        (true, true) => return ByteRange::Invalid,
    };

    match bounds {
        Some((start, end)) if file_size > 0 && start < file_size => {
            ByteRange::Satisfiable(start, end.min(file_size - 1))
        }
        _ => ByteRange::Unsatisfiable,
    }
}

/// Extract Range header from request.
fn get_range_header(request: &Request) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case("range"))
        .map(|h| h.value.to_string())
}

/// Respond with a rendered page. Pages depend on the session, so they are
/// never cached.
pub fn respond_page(request: Request, page: Page, cookie: Cookie) -> Result<()> {
    let body = if is_head_request(&request) {
        Vec::new()
    } else {
        page.html.into_bytes()
    };
    let mut response = Response::from_data(body)
        .with_status_code(StatusCode(page.status))
        .with_header(header("Content-Type", HTML)?)
        .with_header(header("Cache-Control", "no-store")?);
    if let Some(cookie) = cookie {
        response = response.with_header(header("Set-Cookie", &cookie)?);
    }
    request.respond(response)?;
    Ok(())
}

/// `303 See Other` to a local path.
pub fn respond_redirect(request: Request, location: &str, cookie: Cookie) -> Result<()> {
    let mut response = Response::empty(StatusCode(303))
        .with_header(header("Location", &location_value(location))?)
        .with_header(header("Cache-Control", "no-store")?);
    if let Some(cookie) = cookie {
        response = response.with_header(header("Set-Cookie", &cookie)?);
    }
    request.respond(response)?;
    Ok(())
}

/// Respond with a JSON document.
pub fn respond_json(request: Request, body: Vec<u8>, cookie: Cookie) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 200, JSON);
    }
    let mut response = Response::from_data(body)
        .with_header(header("Content-Type", JSON)?)
        .with_header(header("Cache-Control", "no-store")?);
    if let Some(cookie) = cookie {
        response = response.with_header(header("Set-Cookie", &cookie)?);
    }
    request.respond(response)?;
    Ok(())
}

/// Respond with an embedded asset.
pub fn respond_embedded(request: Request, content_type: &'static str, body: &'static str) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 200, content_type);
    }
    send_body(request, 200, content_type, body.as_bytes().to_vec())
}

/// Respond with 405 for anything but GET and HEAD.
pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    let response = Response::from_string("405 Method Not Allowed")
        .with_status_code(StatusCode(405))
        .with_header(header("Content-Type", PLAIN)?)
        .with_header(header("Allow", "GET, HEAD")?);
    request.respond(response)?;
    Ok(())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

pub fn is_read_request(request: &Request) -> bool {
    matches!(request.method(), Method::Get | Method::Head)
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &'static str) -> Result<()> {
    let response = Response::empty(StatusCode(status)).with_header(header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(())
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(())
}

/// Header values must be ASCII: percent-encode anything else.
fn location_value(path: &str) -> String {
    utf8_percent_encode(path, LOCATION).to_string()
}

fn header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow!("invalid `{key}` header value"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range_forms() {
        use ByteRange::Satisfiable;
        assert_eq!(parse_range("0-499", 1000), Satisfiable(0, 499));
        assert_eq!(parse_range("500-", 1000), Satisfiable(500, 999));
        assert_eq!(parse_range("-100", 1000), Satisfiable(900, 999));
        assert_eq!(parse_range("-5000", 1000), Satisfiable(0, 999));
        assert_eq!(parse_range("900-5000", 1000), Satisfiable(900, 999));
        assert_eq!(parse_range("0-0, 5-9", 1000), Satisfiable(0, 0));
    }

    #[test]
    fn test_parse_range_unsatisfiable() {
        assert_eq!(parse_range("1000-", 1000), ByteRange::Unsatisfiable);
        assert_eq!(parse_range("1000-2000", 1000), ByteRange::Unsatisfiable);
        assert_eq!(parse_range("-0", 1000), ByteRange::Unsatisfiable);
        assert_eq!(parse_range("0-10", 0), ByteRange::Unsatisfiable);
    }

    #[test]
    fn test_parse_range_malformed_is_ignored() {
        assert_eq!(parse_range("abc", 1000), ByteRange::Invalid);
        assert_eq!(parse_range("x-10", 1000), ByteRange::Invalid);
        assert_eq!(parse_range("5-2", 1000), ByteRange::Invalid);
        assert_eq!(parse_range("-", 1000), ByteRange::Invalid);
        assert_eq!(parse_range("", 1000), ByteRange::Invalid);
    }

    #[test]
    fn test_location_value_is_ascii() {
        assert_eq!(location_value("/course/intro"), "/course/intro");
        assert_eq!(location_value("/course/x y"), "/course/x%20y");
        assert_eq!(location_value("/course/é"), "/course/%C3%A9");
    }

    #[test]
    fn test_location_value_escapes_line_breaks() {
        let value = location_value("/a\r\nSet-Cookie: x");
        assert_eq!(value, "/a%0D%0ASet-Cookie:%20x");
        assert!(header("Location", &value).is_ok());
    }
}
