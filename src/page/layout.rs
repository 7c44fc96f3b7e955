//! Page shell: sidebar plus main column.

use std::fmt::Write;

use crate::app::App;
use crate::embed::serve::{LAYOUT_HTML, LayoutVars};
use crate::nav::{Location, NavState, render_nav};
use crate::utils::html::escape;

/// Document title: `"{title} | {site title}"`, or the site title alone.
pub fn page_title(site_title: &str, title: Option<&str>) -> String {
    match title {
        Some(title) if !title.is_empty() => format!("{title} | {site_title}"),
        _ => site_title.to_string(),
    }
}

/// Inputs for one page.
pub(super) struct Frame<'a> {
    pub title: Option<&'a str>,
    pub here: Location<'a>,
    /// Where sidebar toggles return to.
    pub back: &'a str,
    pub main: String,
}

pub(super) fn render(app: &App, nav: &NavState, frame: Frame<'_>) -> String {
    let mut sidebar = String::with_capacity(4096);
    let _ = write!(
        sidebar,
        r#"<a class="sy-brand" href="/"><strong>{}</strong><span>{}</span></a>"#,
        escape(&app.site.title),
        escape(&app.site.tagline),
    );
    sidebar.push_str(&render_nav(&app.catalog, nav, &frame.here, frame.back));

    LAYOUT_HTML.render(&LayoutVars {
        title: escape(&page_title(&app.site.title, frame.title)).into_owned(),
        description: escape(&app.site.description).into_owned(),
        sidebar,
        main: frame.main,
    })
}
