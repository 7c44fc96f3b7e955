//! `[site]` section configuration.
//!
//! Text shown in the page chrome.
//!
//! ```toml
//! [site]
//! title = "Open Courseware"
//! tagline = "Lecture notes, slides and videos"
//! description = "Course material for the spring term"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Site title, used in the sidebar and as the `<title>` suffix.
    pub title: String,
    /// Short line under the title.
    pub tagline: String,
    /// Intro paragraph on the home page and `<meta name="description">`.
    pub description: String,
}

pub struct SiteSectionConfigFields {
    pub title: FieldPath,
}

impl SiteSectionConfig {
    pub const FIELDS: SiteSectionConfigFields = SiteSectionConfigFields {
        title: FieldPath::new("site.title"),
    };

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.title.trim().is_empty() {
            diag.error_with_hint(
                Self::FIELDS.title,
                "site title is empty",
                "remove the field to use the default title",
            );
        }
    }
}

impl Default for SiteSectionConfig {
    fn default() -> Self {
        Self {
            title: "Open Courseware".into(),
            tagline: "Course materials".into(),
            description: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_site_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.site.title, "Open Courseware");
        assert!(config.site.description.is_empty());
    }

    #[test]
    fn test_site_override() {
        let config = test_parse_config("[site]\ntitle = \"CS 101\"\ntagline = \"Fall\"");
        assert_eq!(config.site.title, "CS 101");
        assert_eq!(config.site.tagline, "Fall");
    }

    #[test]
    fn test_blank_title_rejected() {
        let site = SiteSectionConfig {
            title: "  ".into(),
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        site.validate(&mut diag);
        assert!(diag.has_errors());
    }
}
