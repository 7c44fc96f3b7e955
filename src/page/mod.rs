//! Server-rendered pages.
//!
//! | Page        | Route                          |
//! |-------------|--------------------------------|
//! | `home`      | `/`                            |
//! | `course`    | `/course/{id}`                 |
//! | `file`      | `/course/{id}/{week}/{file}`   |
//! | `not_found` | unresolved routes and paths    |

mod course;
mod file;
mod home;
mod layout;
mod not_found;


pub use course::render as course;
pub use file::render as file;
pub use home::render as home;
pub use not_found::{render as not_found, render_path as path_not_found};

use crate::session::SessionHandle;

/// A rendered HTML document and its HTTP status.
#[derive(Debug, Clone)]
pub struct Page {
    pub status: u16,
    pub html: String,
}

impl Page {
    pub const fn ok(html: String) -> Self {
        Self { status: 200, html }
    }

    pub const fn not_found(html: String) -> Self {
        Self { status: 404, html }
    }
}

/// Flip a week in the session's sidebar.
///
/// The expansion map is keyed by week display name, so same-named weeks of
/// different courses share one entry.
pub fn toggle_week(session: &SessionHandle, week: &str) {
    session.lock().nav.toggle(week);
}
