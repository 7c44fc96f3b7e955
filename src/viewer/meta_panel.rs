//! Metadata panel shown above viewer content.

use std::fmt::Write;

use crate::metadata::Metadata;
use crate::utils::date::display_date;
use crate::utils::html::escape;

/// Render the panel, or nothing at all when there is no metadata.
pub fn render_metadata_panel(metadata: Option<&Metadata>) -> String {
    let Some(meta) = metadata else {
        return String::new();
    };
    if !meta.has_display_fields() {
        return String::new();
    }

    let mut html = String::from(r#"<section class="sy-meta">"#);

    if let Some(description) = &meta.description {
        let _ = write!(html, r#"<p class="sy-meta-description">{}</p>"#, escape(description));
    }

    let mut items = String::new();
    if let Some(author) = &meta.author {
        let _ = write!(items, r#"<span class="sy-meta-item sy-meta-author">{}</span>"#, escape(author));
    }
    if let Some(date) = &meta.date_published {
        let _ = write!(
            items,
            r#"<time class="sy-meta-item sy-meta-date" datetime="{}">{}</time>"#,
            escape(date),
            escape(&display_date(date))
        );
    }
    if let Some(duration) = &meta.duration {
        let _ = write!(items, r#"<span class="sy-meta-item sy-meta-duration">{}</span>"#, escape(duration));
    }
    if let Some(difficulty) = &meta.difficulty {
        let _ = write!(
            items,
            r#"<span class="sy-badge {}">{}</span>"#,
            difficulty.css_class(),
            escape(difficulty.as_str())
        );
    }
    if !items.is_empty() {
        let _ = write!(html, r#"<div class="sy-meta-row">{items}</div>"#);
    }

    if !meta.tags.is_empty() {
        html.push_str(r#"<div class="sy-meta-tags">"#);
        for tag in &meta.tags {
            let _ = write!(html, r#"<span class="sy-tag">#{}</span>"#, escape(tag));
        }
        html.push_str("</div>");
    }

    html.push_str("</section>");
    html
}
