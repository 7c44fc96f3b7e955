//! Viewer dispatch: one renderer per file type.
//!
//! Every viewer has the same contract: given a content address, a display
//! name and optional metadata, produce an HTML fragment. Markdown and PDF
//! fetch their content and degrade to an in-viewer error panel when that
//! fails; links embed without fetching; unknown types get a static panel.

mod link;
mod markdown;
mod meta_panel;
mod pdf;

use meta_panel::render_metadata_panel;

use crate::catalog::{CourseFile, FileKind};
use crate::core::{ViewParams, resource_href};
use crate::metadata::Metadata;
use crate::resource::ResourceSource;
use crate::session::ContentState;
use crate::utils::html::{escape, escape_attr};

/// Which viewer handles a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerKind {
    Markdown,
    Pdf,
    Link,
    Unsupported,
}

impl ViewerKind {
    /// Pick the viewer from the file's type tag.
    pub fn select(file: &CourseFile) -> Self {
        match file.kind {
            FileKind::Markdown => Self::Markdown,
            FileKind::Pdf => Self::Pdf,
            FileKind::Link => Self::Link,
            FileKind::Other(_) => Self::Unsupported,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Pdf => "pdf",
            Self::Link => "link",
            Self::Unsupported => "unsupported",
        }
    }

    /// Whether rendering reads the content resource.
    pub const fn fetches_content(self) -> bool {
        matches!(self, Self::Markdown | Self::Pdf)
    }
}

/// Inputs shared by every viewer.
#[derive(Debug, Clone, Copy)]
pub struct ViewRequest<'a> {
    /// Content address of the file.
    pub address: &'a str,
    /// Display name.
    pub name: &'a str,
    /// Declared type tag, as written in the catalog.
    pub tag: &'a str,
    pub metadata: Option<&'a Metadata>,
    /// Href of the viewer page itself, without query.
    pub href: &'a str,
    pub params: ViewParams,
}

/// A rendered viewer fragment and how its content fetch went.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub html: String,
    pub content: ContentState,
}

/// Render a file with the given viewer.
pub fn render(kind: ViewerKind, source: &dyn ResourceSource, request: &ViewRequest<'_>) -> Rendered {
    match kind {
        ViewerKind::Markdown => markdown::render(source, request),
        ViewerKind::Pdf => pdf::render(source, request),
        ViewerKind::Link => link::render(request),
        ViewerKind::Unsupported => render_unsupported(request.tag),
    }
}

/// Static panel for files whose type has no viewer. Performs no fetch.
fn render_unsupported(tag: &str) -> Rendered {
    let html = format!(
        r#"<div class="sy-panel sy-panel--notice"><div class="sy-panel-icon">!</div><h2>Unsupported File Type</h2><p>This file type is not supported yet.</p><p class="sy-muted">Type: <code>{}</code></p></div>"#,
        escape(tag)
    );
    Rendered {
        html,
        content: ContentState::Unsupported {
            tag: tag.to_string(),
        },
    }
}

/// In-viewer failure panel. The page around it stays navigable.
fn error_panel(message: &str) -> String {
    format!(
        r#"<div class="sy-panel sy-panel--error" role="alert"><div class="sy-panel-icon">×</div><p>{}</p></div>"#,
        escape(message)
    )
}

/// Viewer header: icon, title, subtitle and an action link.
fn header(icon: &str, name: &str, subtitle: &str, action: &str) -> String {
    format!(
        r#"<header class="sy-viewer-header"><div class="sy-viewer-title"><span class="sy-viewer-icon">{icon}</span><div><h1>{}</h1><p class="sy-muted">{}</p></div></div>{action}</header>"#,
        escape(name),
        escape(subtitle),
    )
}

fn download_link(address: &str, filename: &str) -> String {
    format!(
        r#"<a class="sy-button" href="{}" download="{}">Download</a>"#,
        escape_attr(&resource_href(address)),
        escape_attr(filename),
    )
}
