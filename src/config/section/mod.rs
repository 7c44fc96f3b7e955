//! Configuration section definitions.
//!
//! Each module corresponds to a section in `syllabus.toml`:
//!
//! | Module    | TOML Section | Purpose                              |
//! |-----------|--------------|--------------------------------------|
//! | `site`    | `[site]`     | Title, tagline, description          |
//! | `content` | `[content]`  | Content root, catalog, metadata ext  |
//! | `serve`   | `[serve]`    | HTTP server                          |

mod content;
mod serve;
mod site;

pub use content::ContentConfig;
pub use serve::ServeConfig;
pub use site::SiteSectionConfig;
