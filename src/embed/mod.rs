//! Embedded static resources for the course browser.
//!
//! - `template` - Template type for typed variable injection
//! - `serve` - Page layout and stylesheet served by the HTTP server
//!
//! # Usage
//!
//! ```ignore
//! use embed::serve::{LAYOUT_HTML, LayoutVars, STYLE_CSS};
//!
//! let html = LAYOUT_HTML.render(&LayoutVars { title, description, sidebar, main });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};

    /// Route the stylesheet is served from.
    pub const STYLESHEET_HREF: &str = "/_syllabus/style.css";

    /// Variables for layout.html.
    ///
    /// `title` and `description` are inserted as-is; callers escape them.
    pub struct LayoutVars {
        pub title: String,
        pub description: String,
        pub sidebar: String,
        pub main: String,
    }

    impl TemplateVars for LayoutVars {
        fn lookup(&self, name: &str) -> Option<&str> {
            match name {
                "TITLE" => Some(&self.title),
                "DESCRIPTION" => Some(&self.description),
                "SIDEBAR" => Some(&self.sidebar),
                "MAIN" => Some(&self.main),
                "STYLESHEET" => Some(STYLESHEET_HREF),
                "VERSION" => Some(env!("CARGO_PKG_VERSION")),
                _ => None,
            }
        }
    }

    /// Page shell shared by every HTML response.
    pub const LAYOUT_HTML: Template<LayoutVars> =
        Template::new(include_str!("serve/layout.html"));

    /// Stylesheet, minified at build time.
    pub const STYLE_CSS: &str = include_str!(concat!(env!("OUT_DIR"), "/style.min.css"));
}
