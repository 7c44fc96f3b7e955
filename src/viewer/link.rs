//! External link viewer.
//!
//! YouTube addresses become an embedded player; anything else is shown in a
//! sandboxed iframe. Nothing is fetched server-side.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::{Rendered, ViewRequest, header};
use crate::session::ContentState;
use crate::utils::html::{escape, escape_attr};

/// An 11-character video id.
static VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)^[A-Za-z0-9_-]{11}$").expect("valid video id pattern"));

/// Extract the video id from a YouTube address.
///
/// Recognised on `youtube.com` (and `www.`/`m.`), `youtube-nocookie.com`
/// and `youtu.be`: `watch?v=ID`, `youtu.be/ID`, `/embed/ID`, `/shorts/ID`,
/// `/live/ID`. The host must match exactly.
pub fn youtube_video_id(address: &str) -> Option<String> {
    let url = Url::parse(address).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?;
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .unwrap_or(host);
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    let id = match host {
        "youtu.be" => segments.next()?.to_string(),
        "youtube.com" | "youtube-nocookie.com" => match segments.next()? {
            "watch" => url.query_pairs().find(|(key, _)| key == "v")?.1.into_owned(),
            "embed" | "shorts" | "live" => segments.next()?.to_string(),
            _ => return None,
        },
        _ => return None,
    };

    VIDEO_ID.is_match(&id).then_some(id)
}

/// Embeddable player address for a YouTube address.
pub fn youtube_embed_url(address: &str) -> Option<String> {
    youtube_video_id(address).map(|id| format!("https://www.youtube.com/embed/{id}"))
}

/// Host part of an address, without a leading `www.`.
fn domain_of(address: &str) -> Option<String> {
    let url = Url::parse(address).ok()?;
    let host = url.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

pub(super) fn render(request: &ViewRequest<'_>) -> Rendered {
    let open = format!(
        r#"<a class="sy-button" href="{}" target="_blank" rel="noopener noreferrer">Open External ↗</a>"#,
        escape_attr(request.address)
    );
    let subtitle = domain_of(request.address).unwrap_or_else(|| "External Link".to_string());

    let mut html = header("↗", request.name, &subtitle, &open);
    html.push_str(&super::render_metadata_panel(request.metadata));

    match youtube_embed_url(request.address) {
        Some(embed) => {
            html.push_str(&format!(
                r#"<div class="sy-frame sy-frame--video"><iframe src="{}" title="{}" allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" allowfullscreen></iframe></div>"#,
                escape_attr(&embed),
                escape_attr(request.name),
            ));
        }
        None => {
            html.push_str(&format!(
                r#"<div class="sy-frame"><iframe src="{}" title="{}" sandbox="allow-scripts allow-same-origin allow-popups allow-forms"></iframe></div><p class="sy-muted">If the page does not load here, {} in a new tab.</p>"#,
                escape_attr(request.address),
                escape_attr(request.name),
                format_args!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer">open {}</a>"#,
                    escape_attr(request.address),
                    escape(&domain_of(request.address).unwrap_or_else(|| "it".to_string())),
                ),
            ));
        }
    }

    Rendered {
        html,
        content: ContentState::Embedded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ViewParams;

    fn request(address: &str) -> ViewRequest<'_> {
        ViewRequest {
            address,
            name: "Video",
            tag: "link",
            metadata: None,
            href: "/course/intro/0/0",
            params: ViewParams::default(),
        }
    }

    #[test]
    fn test_youtube_id_forms() {
        let id = "dQw4w9WgXcQ";
        for address in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?t=42",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/live/dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ",
        ] {
            assert_eq!(youtube_video_id(address).as_deref(), Some(id), "{address}");
        }
    }

    #[test]
    fn test_youtube_id_rejects_others() {
        assert_eq!(youtube_video_id("https://vimeo.com/123456789"), None);
        assert_eq!(youtube_video_id("https://www.youtube.com/channel/UCabc"), None);
        assert_eq!(youtube_video_id("https://youtube.com/watch?v=short"), None);
        assert_eq!(youtube_video_id("https://youtube.com/watch?v=abcdefghijkl"), None);
    }

    #[test]
    fn test_youtube_id_requires_youtube_host() {
        for address in [
            "https://notyoutube.com/watch?v=dQw4w9WgXcQ",
            "https://example.com/page?ref=youtu.be/dQw4w9WgXcQ",
            "https://example.com/youtube.com/embed/dQw4w9WgXcQ",
            "https://youtube.com.evil.example/watch?v=dQw4w9WgXcQ",
            "ftp://youtu.be/dQw4w9WgXcQ",
        ] {
            assert_eq!(youtube_video_id(address), None, "{address}");
        }

        let rendered = render(&request("https://notyoutube.com/watch?v=dQw4w9WgXcQ"));
        assert!(rendered.html.contains("sandbox="));
        assert!(!rendered.html.contains("youtube.com/embed"));
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            youtube_embed_url("https://youtu.be/abcdefghijk").as_deref(),
            Some("https://www.youtube.com/embed/abcdefghijk")
        );
    }

    #[test]
    fn test_render_youtube_player() {
        let rendered = render(&request("https://www.youtube.com/watch?v=abcdefghijk"));
        assert!(rendered.html.contains(r#"src="https://www.youtube.com/embed/abcdefghijk""#));
        assert!(rendered.html.contains("allowfullscreen"));
        assert!(!rendered.html.contains("sandbox"));
        assert!(rendered.html.contains("youtube.com"));
        assert_eq!(rendered.content, ContentState::Embedded);
    }

    #[test]
    fn test_render_generic_iframe() {
        let rendered = render(&request("https://docs.example.org/guide?a=1&b=2"));
        assert!(rendered.html.contains("sandbox="));
        assert!(rendered.html.contains(r#"src="https://docs.example.org/guide?a=1&amp;b=2""#));
        assert!(rendered.html.contains("docs.example.org"));
        assert!(rendered.html.contains("Open External"));
    }

    #[test]
    fn test_domain_of() {
        assert_eq!(domain_of("https://www.example.com/x").as_deref(), Some("example.com"));
        assert_eq!(domain_of("not a url"), None);
    }
}
