//! Catalog entities: courses, weeks and files.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A course in the catalog.
///
/// Looked up by `id`; weeks are addressed by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub weeks: Vec<Week>,
}

impl Course {
    /// Total number of files across all weeks.
    pub fn file_count(&self) -> usize {
        self.weeks.iter().map(|w| w.files.len()).sum()
    }

    /// Week at `index`, if in range.
    #[inline]
    pub fn week(&self, index: usize) -> Option<&Week> {
        self.weeks.get(index)
    }
}

/// A week within a course. Its position in `Course::weeks` is its index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Week {
    pub name: String,
    #[serde(default)]
    pub files: Vec<CourseFile>,
}

impl Week {
    /// File at `index`, if in range.
    #[inline]
    pub fn file(&self, index: usize) -> Option<&CourseFile> {
        self.files.get(index)
    }
}

/// A single piece of course material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseFile {
    /// Display name.
    pub name: String,
    /// Content address: a path under the static root or an absolute URL.
    pub path: String,
    /// Declared type tag.
    #[serde(rename = "type")]
    pub kind: FileKind,
}

impl CourseFile {
    /// Whether the content address points outside the static root.
    pub fn is_external(&self) -> bool {
        is_external_address(&self.path)
    }
}

/// Check if an address is an absolute `http`/`https` URL.
pub fn is_external_address(address: &str) -> bool {
    address.starts_with("http://") || address.starts_with("https://")
}

/// File type tag.
///
/// Unrecognized tags are kept verbatim so the viewer layer can report them
/// instead of the catalog failing to load.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileKind {
    Markdown,
    Pdf,
    Link,
    Other(String),
}

impl FileKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "markdown" => Self::Markdown,
            "pdf" => Self::Pdf,
            "link" => Self::Link,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Markdown => "markdown",
            Self::Pdf => "pdf",
            Self::Link => "link",
            Self::Other(tag) => tag,
        }
    }
}

impl Serialize for FileKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FileKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}
