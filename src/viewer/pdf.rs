//! PDF viewer.
//!
//! The document is fetched once per view to check it is a PDF and to count
//! its pages; display is left to the browser's built-in viewer, opened at
//! the requested page and zoom through PDF open parameters.

use std::sync::LazyLock;

use regex::bytes::Regex;

use super::{Rendered, ViewRequest, download_link, error_panel, header};
use crate::core::{ViewParams, resource_href, view_href};
use crate::debug;
use crate::session::ContentState;
use crate::utils::html::escape_attr;
use crate::utils::text::download_name;

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 2.0;
pub const ZOOM_STEP: f32 = 0.2;

/// Page objects: `/Type /Page`, but not `/Type /Pages`.
static PAGE_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)/Type\s*/Page\b").expect("valid page pattern"));

/// Count page objects in a PDF body.
///
/// Returns `None` when no page object is visible (e.g. pages packed into
/// compressed object streams).
pub fn count_pdf_pages(bytes: &[u8]) -> Option<u32> {
    let count = PAGE_OBJECT.find_iter(bytes).count();
    (count > 0).then(|| u32::try_from(count).unwrap_or(u32::MAX))
}

/// Readers accept the `%PDF-` header anywhere in the leading bytes.
const HEADER_WINDOW: usize = 1024;

/// Whether `bytes` carries a PDF header within the first kilobyte.
fn has_pdf_header(bytes: &[u8]) -> bool {
    bytes[..bytes.len().min(HEADER_WINDOW)]
        .windows(5)
        .any(|window| window == b"%PDF-")
}

/// Page and zoom after clamping against the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfView {
    pub page: u32,
    /// Total pages, when known.
    pub pages: Option<u32>,
    pub zoom: f32,
}

impl PdfView {
    pub fn new(params: ViewParams, pages: Option<u32>) -> Self {
        let upper = pages.unwrap_or(u32::MAX).max(1);
        let page = params.page.unwrap_or(1).clamp(1, upper);
        let zoom = round_zoom(params.zoom.unwrap_or(1.0).clamp(MIN_ZOOM, MAX_ZOOM));
        Self { page, pages, zoom }
    }

    pub fn prev(&self) -> Option<u32> {
        (self.page > 1).then(|| self.page - 1)
    }

    pub fn next(&self) -> Option<u32> {
        match self.pages {
            Some(pages) if self.page >= pages => None,
            _ => self.page.checked_add(1),
        }
    }

    pub fn zoom_in(&self) -> Option<f32> {
        (self.zoom < MAX_ZOOM).then(|| round_zoom((self.zoom + ZOOM_STEP).min(MAX_ZOOM)))
    }

    pub fn zoom_out(&self) -> Option<f32> {
        (self.zoom > MIN_ZOOM).then(|| round_zoom((self.zoom - ZOOM_STEP).max(MIN_ZOOM)))
    }

    /// Zoom as a whole percentage.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // zoom is clamped to 0.5..=2.0
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }
}

#[inline]
fn round_zoom(zoom: f32) -> f32 {
    (zoom * 10.0).round() / 10.0
}

/// A control link, or a disabled placeholder when `target` is `None`.
fn control(label: &str, class: &str, target: Option<String>) -> String {
    match target {
        Some(href) => format!(
            r#"<a class="sy-control {class}" href="{}">{label}</a>"#,
            escape_attr(&href)
        ),
        None => format!(r#"<span class="sy-control {class} is-disabled" aria-disabled="true">{label}</span>"#),
    }
}

fn controls(view: &PdfView, base: &str) -> String {
    let pages = view
        .pages
        .map_or_else(|| "—".to_string(), |p| p.to_string());

    format!(
        r#"<div class="sy-pdf-controls"><div class="sy-pdf-pager">{}<span class="sy-pdf-page">{} / {}</span>{}</div><div class="sy-pdf-zoom">{}<span class="sy-pdf-scale">{}%</span>{}</div></div>"#,
        control("‹ Prev", "sy-prev", view.prev().map(|p| view_href(base, p, view.zoom))),
        view.page,
        pages,
        control("Next ›", "sy-next", view.next().map(|p| view_href(base, p, view.zoom))),
        control("−", "sy-zoom-out", view.zoom_out().map(|z| view_href(base, view.page, z))),
        view.zoom_percent(),
        control("+", "sy-zoom-in", view.zoom_in().map(|z| view_href(base, view.page, z))),
    )
}

pub(super) fn render(source: &dyn crate::resource::ResourceSource, request: &ViewRequest<'_>) -> Rendered {
    let download = download_link(request.address, &download_name(request.name, "pdf"));
    let mut html = header("▤", request.name, "PDF Document", &download);
    html.push_str(&super::render_metadata_panel(request.metadata));

    let bytes = match source.fetch(request.address) {
        Ok(bytes) if has_pdf_header(&bytes) => bytes,
        Ok(_) => {
            debug!("viewer"; "{} is not a PDF document", request.address);
            html.push_str(&error_panel("Failed to load PDF document"));
            return Rendered {
                html,
                content: ContentState::Failed {
                    message: format!("`{}` is not a PDF document", request.address),
                },
            };
        }
        Err(e) => {
            debug!("viewer"; "pdf fetch failed: {}", e);
            html.push_str(&error_panel("Failed to load PDF document"));
            return Rendered {
                html,
                content: ContentState::Failed {
                    message: e.to_string(),
                },
            };
        }
    };

    let view = PdfView::new(request.params, count_pdf_pages(&bytes));
    html.push_str(&controls(&view, request.href));
    html.push_str(&format!(
        r#"<div class="sy-frame sy-frame--pdf"><object data="{}" type="application/pdf" title="{}"><p>Your browser cannot display this PDF inline. Use the download link above.</p></object></div>"#,
        escape_attr(&format!(
            "{}#page={}&zoom={}",
            resource_href(request.address),
            view.page,
            view.zoom_percent()
        )),
        escape_attr(request.name),
    ));

    Rendered {
        html,
        content: ContentState::Ready,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::testing::MemorySource;

    /// Minimal PDF body with `n` page objects.
    fn fake_pdf(n: usize) -> Vec<u8> {
        let mut body = b"%PDF-1.4\n1 0 obj << /Type /Pages /Count 3 >> endobj\n".to_vec();
        for i in 0..n {
            body.extend_from_slice(format!("{} 0 obj << /Type/Page /Parent 1 0 R >> endobj\n", i + 2).as_bytes());
        }
        body
    }

    fn request(params: ViewParams) -> ViewRequest<'static> {
        ViewRequest {
            address: "/courses/intro/w0/slides.pdf",
            name: "Slides",
            tag: "pdf",
            metadata: None,
            href: "/course/intro/0/1",
            params,
        }
    }

    #[test]
    fn test_count_pages() {
        assert_eq!(count_pdf_pages(&fake_pdf(3)), Some(3));
        assert_eq!(count_pdf_pages(b"%PDF-1.7 compressed"), None);
    }

    #[test]
    fn test_pdf_header_window() {
        assert!(has_pdf_header(b"%PDF-1.4\n"));

        let mut prefixed = vec![0u8; 512];
        prefixed.extend_from_slice(&fake_pdf(1));
        assert!(has_pdf_header(&prefixed));

        let mut late = vec![b' '; HEADER_WINDOW];
        late.extend_from_slice(b"%PDF-1.4");
        assert!(!has_pdf_header(&late));
        assert!(!has_pdf_header(b"%PD"));
        assert!(!has_pdf_header(b""));
    }

    #[test]
    fn test_view_clamps() {
        let view = PdfView::new(
            ViewParams {
                page: Some(9),
                zoom: Some(5.0),
            },
            Some(3),
        );
        assert_eq!(view.page, 3);
        assert_eq!(view.zoom, MAX_ZOOM);
        assert_eq!(view.next(), None);
        assert_eq!(view.zoom_in(), None);

        let view = PdfView::new(
            ViewParams {
                page: Some(0),
                zoom: Some(0.1),
            },
            Some(3),
        );
        assert_eq!(view.page, 1);
        assert_eq!(view.zoom, MIN_ZOOM);
        assert_eq!(view.prev(), None);
        assert_eq!(view.zoom_out(), None);
    }

    #[test]
    fn test_view_steps() {
        let view = PdfView::new(ViewParams::default(), Some(4));
        assert_eq!((view.page, view.zoom), (1, 1.0));
        assert_eq!(view.next(), Some(2));
        assert_eq!(view.zoom_in(), Some(1.2));
        assert_eq!(view.zoom_out(), Some(0.8));

        let low = PdfView::new(ViewParams { page: None, zoom: Some(0.6) }, Some(4));
        assert_eq!(low.zoom_out(), Some(0.5));
    }

    #[test]
    fn test_view_unknown_page_count() {
        let view = PdfView::new(ViewParams { page: Some(40), zoom: None }, None);
        assert_eq!(view.page, 40);
        assert_eq!(view.next(), Some(41));
    }

    #[test]
    fn test_render_pdf() {
        let source = MemorySource::new().with("/courses/intro/w0/slides.pdf", fake_pdf(3));
        let rendered = render(
            &source,
            &request(ViewParams {
                page: Some(2),
                zoom: None,
            }),
        );

        assert_eq!(rendered.content, ContentState::Ready);
        assert!(rendered.html.contains("2 / 3"));
        assert!(rendered.html.contains(r#"data="/courses/intro/w0/slides.pdf#page=2&amp;zoom=100""#));
        assert!(rendered.html.contains(r#"href="/course/intro/0/1?page=1&amp;zoom=1.0""#));
        assert!(rendered.html.contains(r#"href="/course/intro/0/1?page=3&amp;zoom=1.0""#));
        assert!(rendered.html.contains(r#"download="Slides.pdf""#));
    }

    #[test]
    fn test_render_pdf_missing() {
        let source = MemorySource::new();
        let rendered = render(&source, &request(ViewParams::default()));
        assert!(matches!(rendered.content, ContentState::Failed { .. }));
        assert!(rendered.html.contains("Failed to load PDF document"));
    }

    #[test]
    fn test_render_pdf_with_leading_bytes() {
        let mut body = b"\xEF\xBB\xBF\r\n".to_vec();
        body.extend_from_slice(&fake_pdf(2));
        let source = MemorySource::new().with("/courses/intro/w0/slides.pdf", body);
        let rendered = render(&source, &request(ViewParams::default()));

        assert_eq!(rendered.content, ContentState::Ready);
        assert!(rendered.html.contains("1 / 2"));
    }

    #[test]
    fn test_render_pdf_not_a_pdf() {
        let source = MemorySource::new().with("/courses/intro/w0/slides.pdf", "<html>oops</html>");
        let rendered = render(&source, &request(ViewParams::default()));
        assert!(matches!(rendered.content, ContentState::Failed { .. }));
    }
}
