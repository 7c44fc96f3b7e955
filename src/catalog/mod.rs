//! Course catalog: the static course → week → file hierarchy.

mod model;
mod store;

pub use model::{Course, CourseFile, FileKind, Week, is_external_address};
pub use store::Catalog;
