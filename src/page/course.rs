//! Course overview: every week with its files.

use std::fmt::Write;

use super::{Page, layout, not_found};
use crate::app::App;
use crate::catalog::Course;
use crate::core::{course_href, file_href};
use crate::nav::{Location, kind_icon};
use crate::resolve::resolve_course;
use crate::session::SessionHandle;
use crate::utils::html::{escape, escape_attr};

pub fn render(app: &App, session: &SessionHandle, course_id: &str) -> Page {
    let course = match resolve_course(&app.catalog, course_id) {
        Ok(course) => course,
        Err(missing) => return not_found::render(app, session, &missing),
    };

    let main = overview(course);
    let href = course_href(&course.id);

    let mut session = session.lock();
    session.nav.seed(course, None);
    Page::ok(layout::render(
        app,
        &session.nav,
        layout::Frame {
            title: Some(&course.name),
            here: Location::course(&course.id),
            back: &href,
            main,
        },
    ))
}

fn overview(course: &Course) -> String {
    let mut html = String::with_capacity(2048);
    let _ = write!(html, r#"<section class="sy-hero"><h1>{}</h1>"#, escape(&course.name));
    if let Some(description) = &course.description {
        let _ = write!(html, "<p>{}</p>", escape(description));
    }
    html.push_str(r#"<p class="sy-muted">Select a week and file from the sidebar to view course materials.</p></section>"#);

    if course.weeks.is_empty() {
        html.push_str(r#"<p class="sy-muted">This course has no material yet.</p>"#);
        return html;
    }

    for (week_index, week) in course.weeks.iter().enumerate() {
        let _ = write!(
            html,
            r#"<section class="sy-week"><h2><span class="sy-count">{}</span> {}</h2><ul class="sy-file-list">"#,
            week_index + 1,
            escape(&week.name),
        );
        for (file_index, file) in week.files.iter().enumerate() {
            let _ = write!(
                html,
                r#"<li><a href="{}"><span class="sy-icon">{}</span><span>{}</span><span class="sy-file-kind">{}</span></a></li>"#,
                escape_attr(&file_href(&course.id, week_index, file_index)),
                kind_icon(&file.kind),
                escape(&file.name),
                escape(file.kind.as_str()),
            );
        }
        html.push_str("</ul></section>");
    }
    html
}
