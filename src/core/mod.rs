//! Core types shared by pages and the server: routes and serve state.

mod route;
mod state;

pub use route::{
    FileTarget, Route, ViewParams, course_href, file_href, resource_href, toggle_href, view_href,
};
pub use state::{is_shutdown, register_server, setup_shutdown_handler};
