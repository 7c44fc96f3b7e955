//! Markdown viewer.
//!
//! Raw HTML in a document is shown as text, never passed through. Math is
//! emitted as `math-inline`/`math-display` spans that the page layout
//! typesets with KaTeX.

use pulldown_cmark::{Event, Options, Parser, html};

use super::{Rendered, ViewRequest, download_link, error_panel, header};
use crate::debug;
use crate::session::ContentState;
use crate::utils::text::download_name;

/// Options for markdown rendering
#[derive(Debug, Clone, Default)]
pub struct MarkdownOptions {
    /// Enable tables extension
    pub tables: bool,
    /// Enable footnotes extension
    pub footnotes: bool,
    /// Enable strikethrough extension
    pub strikethrough: bool,
    /// Enable task lists extension
    pub task_lists: bool,
    /// Emit `$...$` / `$$...$$` as math spans for KaTeX
    pub math: bool,
}

impl MarkdownOptions {
    /// Create options with all extensions enabled
    pub fn all() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            math: true,
        }
    }

    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        if self.math {
            opts.insert(Options::ENABLE_MATH);
        }
        opts
    }
}

/// Render markdown source to an HTML fragment.
pub fn markdown_to_html(source: &str, options: &MarkdownOptions) -> String {
    let parser = Parser::new_ext(source, options.to_pulldown_options()).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

pub(super) fn render(source: &dyn crate::resource::ResourceSource, request: &ViewRequest<'_>) -> Rendered {
    let download = download_link(request.address, &download_name(request.name, "md"));
    let mut html = header("¶", request.name, "Markdown Document", &download);
    html.push_str(&super::render_metadata_panel(request.metadata));

    let content = match source.fetch_text(request.address) {
        Ok(text) => {
            html.push_str(r#"<article class="sy-prose">"#);
            html.push_str(&markdown_to_html(&text, &MarkdownOptions::all()));
            html.push_str("</article>");
            ContentState::Ready
        }
        Err(e) => {
            debug!("viewer"; "markdown fetch failed: {}", e);
            html.push_str(&error_panel("Failed to load markdown content"));
            ContentState::Failed {
                message: e.to_string(),
            }
        }
    };

    Rendered { html, content }
}
