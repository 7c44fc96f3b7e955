//! 404 pages. The sidebar stays usable so the reader can navigate away.

use super::{Page, layout};
use crate::app::App;
use crate::core::course_href;
use crate::nav::Location;
use crate::resolve::NotFound;
use crate::session::SessionHandle;
use crate::utils::html::{escape, escape_attr};

/// Page for a course, week or file that the catalog does not have.
pub fn render(app: &App, session: &SessionHandle, missing: &NotFound) -> Page {
    let (course, route_week) = match missing {
        NotFound::Course { .. } => (None, None),
        NotFound::Week { course, .. } => (app.catalog.course(course), None),
        NotFound::File { course, week, .. } => (app.catalog.course(course), Some(*week)),
    };

    let (back_label, back_href) = match course {
        Some(course) => (course.name.as_str(), course_href(&course.id)),
        None => ("all courses", "/".to_string()),
    };
    let main = panel(missing.title(), &missing.to_string(), back_label, &back_href);

    let mut session = session.lock();
    if let Some(course) = course {
        session.nav.seed(course, route_week);
    }
    Page::not_found(layout::render(
        app,
        &session.nav,
        layout::Frame {
            title: Some(missing.title()),
            here: course.map_or(Location::home(), |c| Location::course(&c.id)),
            back: &back_href,
            main,
        },
    ))
}

/// Page for a path that is neither a route nor a static resource.
pub fn render_path(app: &App, session: &SessionHandle, path: &str) -> Page {
    let main = panel(
        "Page not found",
        &format!("nothing is served at `{path}`"),
        "all courses",
        "/",
    );

    let session = session.lock();
    Page::not_found(layout::render(
        app,
        &session.nav,
        layout::Frame {
            title: Some("Page not found"),
            here: Location::home(),
            back: "/",
            main,
        },
    ))
}

fn panel(title: &str, detail: &str, back_label: &str, back_href: &str) -> String {
    format!(
        r#"<div class="sy-panel sy-panel--missing"><div class="sy-panel-icon">?</div><h1>{}</h1><p class="sy-muted">{}</p><a class="sy-button" href="{}">Back to {}</a></div>"#,
        escape(title),
        escape(detail),
        escape_attr(back_href),
        escape(back_label),
    )
}
