//! File viewer page.
//!
//! The session's ticket is taken before metadata and content are fetched;
//! the settled view is only recorded if no newer view started meanwhile.
//! The session lock is not held during fetches.

use super::{Page, layout, not_found};
use crate::app::App;
use crate::core::{FileTarget, ViewParams, file_href};
use crate::nav::Location;
use crate::resolve::resolve;
use crate::session::{SessionHandle, SettledView};
use crate::viewer::{self, ViewRequest, ViewerKind};

pub fn render(app: &App, session: &SessionHandle, target: &FileTarget, params: ViewParams) -> Page {
    let found = match resolve(&app.catalog, &target.course, &target.week, &target.file) {
        Ok(found) => found,
        Err(missing) => return not_found::render(app, session, &missing),
    };
    let (course, file) = (found.course, found.file);

    let ticket = session.lock().begin(target.clone());

    let href = file_href(&course.id, found.week_index, found.file_index);
    let kind = ViewerKind::select(file);
    let metadata = app.metadata.get_or_fetch(app.source(), &file.path);
    let rendered = viewer::render(
        kind,
        app.source(),
        &ViewRequest {
            address: &file.path,
            name: &file.name,
            tag: file.kind.as_str(),
            metadata: metadata.as_deref(),
            href: &href,
            params,
        },
    );

    let mut session = session.lock();
    session.settle(
        &ticket,
        SettledView {
            generation: ticket.generation(),
            course: course.id.clone(),
            week: found.week_index,
            file: found.file_index,
            name: file.name.clone(),
            viewer: kind.as_str(),
            content: rendered.content,
            metadata: metadata.as_deref().cloned(),
        },
    );
    session.nav.seed(course, Some(found.week_index));

    Page::ok(layout::render(
        app,
        &session.nav,
        layout::Frame {
            title: Some(&file.name),
            here: Location::file(&course.id, found.week_index, found.file_index),
            back: &href,
            main: rendered.html,
        },
    ))
}
