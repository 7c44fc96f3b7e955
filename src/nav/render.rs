//! Sidebar HTML.

use std::fmt::Write;

use super::NavState;
use crate::catalog::{Catalog, Course, FileKind};
use crate::core::{course_href, file_href, toggle_href};
use crate::utils::html::{escape, escape_attr};

/// Where the browser currently is, as far as the sidebar cares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location<'a> {
    pub course: Option<&'a str>,
    pub week: Option<usize>,
    pub file: Option<usize>,
}

impl<'a> Location<'a> {
    pub const fn home() -> Self {
        Self {
            course: None,
            week: None,
            file: None,
        }
    }

    pub const fn course(id: &'a str) -> Self {
        Self {
            course: Some(id),
            week: None,
            file: None,
        }
    }

    pub const fn file(id: &'a str, week: usize, file: usize) -> Self {
        Self {
            course: Some(id),
            week: Some(week),
            file: Some(file),
        }
    }

    /// Whether the file at `(course, week, file)` is the one being viewed.
    pub fn is_active(&self, course: &str, week: usize, file: usize) -> bool {
        self.course == Some(course) && self.week == Some(week) && self.file == Some(file)
    }
}

/// Short glyph shown before a file name.
pub const fn kind_icon(kind: &FileKind) -> &'static str {
    match kind {
        FileKind::Markdown => "¶",
        FileKind::Pdf => "▤",
        FileKind::Link => "↗",
        FileKind::Other(_) => "•",
    }
}

/// Render the course list. Only the current course shows its weeks.
///
/// `back` is where toggle links return to (the current page).
pub fn render_nav(catalog: &Catalog, nav: &NavState, here: &Location<'_>, back: &str) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str(r#"<nav class="sy-nav">"#);

    for course in catalog.courses() {
        let current = here.course == Some(course.id.as_str());
        let _ = write!(
            html,
            r#"<div class="sy-nav-course"><a class="sy-nav-course-link{}" href="{}">{}</a>"#,
            if current { " is-current" } else { "" },
            escape_attr(&course_href(&course.id)),
            escape(&course.name),
        );
        if current {
            render_weeks(&mut html, course, nav, here, back);
        }
        html.push_str("</div>");
    }

    html.push_str("</nav>");
    html
}

fn render_weeks(html: &mut String, course: &Course, nav: &NavState, here: &Location<'_>, back: &str) {
    html.push_str(r#"<ul class="sy-nav-weeks">"#);

    for (week_index, week) in course.weeks.iter().enumerate() {
        let expanded = nav.is_expanded(&week.name);
        let _ = write!(
            html,
            r#"<li class="sy-nav-week"><a class="sy-nav-toggle" href="{}" aria-expanded="{}"><span class="sy-chevron">{}</span><span class="sy-nav-week-name">{}</span><span class="sy-count">{}</span></a>"#,
            escape_attr(&toggle_href(&course.id, &week.name, back)),
            expanded,
            if expanded { "▾" } else { "▸" },
            escape(&week.name),
            week.files.len(),
        );

        if expanded {
            html.push_str(r#"<ul class="sy-nav-files">"#);
            for (file_index, file) in week.files.iter().enumerate() {
                let active = here.is_active(&course.id, week_index, file_index);
                let _ = write!(
                    html,
                    r#"<li><a class="sy-nav-file{}" href="{}"{}><span class="sy-icon sy-icon--{}">{}</span><span class="sy-truncate">{}</span></a></li>"#,
                    if active { " is-active" } else { "" },
                    escape_attr(&file_href(&course.id, week_index, file_index)),
                    if active { r#" aria-current="page""# } else { "" },
                    escape_attr(file.kind.as_str()),
                    kind_icon(&file.kind),
                    escape(&file.name),
                );
            }
            html.push_str("</ul>");
        }

        html.push_str("</li>");
    }

    html.push_str("</ul>");
}
