//! Navigation sidebar: expansion state and rendering.

mod render;
mod tree;

pub use render::{Location, kind_icon, render_nav};
pub use tree::NavState;
