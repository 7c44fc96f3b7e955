//! Immutable catalog loaded once at startup.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Course;

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("catalog parsing error")]
    Json(#[from] serde_json::Error),

    #[error("duplicate course id `{id}` (courses #{first} and #{second})")]
    DuplicateCourse {
        id: String,
        first: usize,
        second: usize,
    },

    #[error("course #{0} has an empty id")]
    EmptyCourseId(usize),
}

/// On-disk shape of the catalog resource.
#[derive(Debug, Deserialize)]
struct CatalogData {
    #[serde(default)]
    courses: Vec<Course>,
}

/// The full course hierarchy.
///
/// Never mutated after construction; share it behind an `Arc`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    courses: Vec<Course>,
    /// Course id -> position in `courses`.
    #[serde(skip)]
    index: FxHashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting empty and duplicate course ids.
    pub fn new(courses: Vec<Course>) -> Result<Self, CatalogError> {
        let mut index = FxHashMap::default();
        for (pos, course) in courses.iter().enumerate() {
            if course.id.is_empty() {
                return Err(CatalogError::EmptyCourseId(pos));
            }
            if let Some(&first) = index.get(&course.id) {
                return Err(CatalogError::DuplicateCourse {
                    id: course.id.clone(),
                    first,
                    second: pos,
                });
            }
            index.insert(course.id.clone(), pos);
        }
        Ok(Self { courses, index })
    }

    /// Parse from the catalog JSON format: `{ "courses": [...] }`.
    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(content)?;
        Self::new(data.courses)
    }

    /// Load the catalog resource from disk.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content =
            fs::read_to_string(path).map_err(|err| CatalogError::Io(path.to_path_buf(), err))?;
        Self::from_json(&content)
    }

    /// Look up a course by exact id.
    pub fn course(&self, id: &str) -> Option<&Course> {
        self.index.get(id).map(|&pos| &self.courses[pos])
    }

    /// All courses in catalog order.
    #[inline]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Total number of files in the catalog.
    pub fn file_count(&self) -> usize {
        self.courses.iter().map(Course::file_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "courses": [
            {"id": "intro", "name": "Intro", "weeks": [
                {"name": "Week 1", "files": [
                    {"name": "Lecture 1", "path": "/courses/intro/w0/l1.md", "type": "markdown"}
                ]}
            ]},
            {"id": "adv", "name": "Advanced", "description": "Harder", "weeks": []}
        ]
    }"#;

    #[test]
    fn test_from_json_and_lookup() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.courses().len(), 2);
        assert_eq!(catalog.course("intro").unwrap().name, "Intro");
        assert_eq!(
            catalog.course("adv").unwrap().description.as_deref(),
            Some("Harder")
        );
        assert_eq!(catalog.file_count(), 1);
    }

    #[test]
    fn test_lookup_is_exact() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert!(catalog.course("Intro").is_none());
        assert!(catalog.course("intro ").is_none());
        assert!(catalog.course("").is_none());
    }

    #[test]
    fn test_duplicate_course_rejected() {
        let json = r#"{"courses": [
            {"id": "a", "name": "A"},
            {"id": "b", "name": "B"},
            {"id": "a", "name": "A again"}
        ]}"#;
        let err = Catalog::from_json(json).unwrap_err();
        match err {
            CatalogError::DuplicateCourse { id, first, second } => {
                assert_eq!(id, "a");
                assert_eq!(first, 0);
                assert_eq!(second, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_course_id_rejected() {
        let json = r#"{"courses": [{"id": "", "name": "Nameless"}]}"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::EmptyCourseId(0))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Catalog::from_json("{\"courses\": ["),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::from_json("{}").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("courses.json");
        fs::write(&path, SAMPLE).unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert!(catalog.course("intro").is_some());

        let missing = Catalog::load(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(CatalogError::Io(..))));
    }

    #[test]
    fn test_serializes_without_index() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let json = serde_json::to_value(&catalog).unwrap();
        assert!(json.get("index").is_none());
        assert_eq!(json["courses"][0]["id"], "intro");
    }
}
