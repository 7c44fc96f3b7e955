//! Shared helpers: escaping, MIME detection, dates, paths and text.

pub mod date;
pub mod html;
pub mod mime;
pub mod path;
pub mod text;
