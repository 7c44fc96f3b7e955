//! Home page: one card per course.

use std::fmt::Write;

use super::{Page, layout};
use crate::app::App;
use crate::core::course_href;
use crate::nav::Location;
use crate::session::SessionHandle;
use crate::utils::html::{escape, escape_attr};
use crate::utils::text::plural_count;

pub fn render(app: &App, session: &SessionHandle) -> Page {
    let mut main = String::with_capacity(2048);
    let _ = write!(
        main,
        r#"<section class="sy-hero"><h1>{}</h1><p class="sy-muted">{}</p>"#,
        escape(&app.site.title),
        escape(&app.site.tagline),
    );
    if !app.site.description.is_empty() {
        let _ = write!(main, "<p>{}</p>", escape(&app.site.description));
    }
    main.push_str("</section>");

    main.push_str(r#"<h2>Available Courses</h2>"#);
    if app.catalog.is_empty() {
        main.push_str(r#"<p class="sy-muted">No courses yet.</p>"#);
    } else {
        main.push_str(r#"<div class="sy-cards">"#);
        for course in app.catalog.courses() {
            let _ = write!(
                main,
                r#"<a class="sy-card" href="{}"><h2>{}</h2>"#,
                escape_attr(&course_href(&course.id)),
                escape(&course.name),
            );
            if let Some(description) = &course.description {
                let _ = write!(main, r#"<p class="sy-muted">{}</p>"#, escape(description));
            }
            let _ = write!(
                main,
                r#"<div class="sy-card-stats"><span>{}</span><span>{}</span></div></a>"#,
                plural_count(course.weeks.len(), "week"),
                plural_count(course.file_count(), "material"),
            );
        }
        main.push_str("</div>");
    }

    let session = session.lock();
    Page::ok(layout::render(
        app,
        &session.nav,
        layout::Frame {
            title: None,
            here: Location::home(),
            back: "/",
            main,
        },
    ))
}
