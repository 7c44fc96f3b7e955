//! Route parameters → course file lookup.

use std::fmt;

use crate::catalog::{Catalog, Course, CourseFile, Week};

/// Why a `(course, week, file)` triple did not address a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    Course { id: String },
    Week { course: String, week: String },
    File { course: String, week: usize, file: String },
}

impl NotFound {
    /// Short user-facing heading.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Course { .. } => "Course not found",
            Self::Week { .. } => "Week not found",
            Self::File { .. } => "File not found",
        }
    }
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Course { id } => write!(f, "no course with id `{id}`"),
            Self::Week { course, week } => {
                write!(f, "course `{course}` has no week `{week}`")
            }
            Self::File { course, week, file } => {
                write!(f, "week {week} of course `{course}` has no file `{file}`")
            }
        }
    }
}

impl std::error::Error for NotFound {}

/// A file found by [`resolve`], with its parents and position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved<'a> {
    pub course: &'a Course,
    pub week: &'a Week,
    pub file: &'a CourseFile,
    pub week_index: usize,
    pub file_index: usize,
}

/// Parse a positional index segment.
///
/// Only plain decimal digits are accepted: no sign, no whitespace.
fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Look up the course by id.
pub fn resolve_course<'a>(catalog: &'a Catalog, course_id: &str) -> Result<&'a Course, NotFound> {
    catalog.course(course_id).ok_or_else(|| NotFound::Course {
        id: course_id.to_string(),
    })
}

/// Resolve raw route segments to a file.
pub fn resolve<'a>(
    catalog: &'a Catalog,
    course_id: &str,
    week: &str,
    file: &str,
) -> Result<Resolved<'a>, NotFound> {
    let course = resolve_course(catalog, course_id)?;

    let (week_index, week_entry) = parse_index(week)
        .and_then(|i| course.week(i).map(|w| (i, w)))
        .ok_or_else(|| NotFound::Week {
            course: course.id.clone(),
            week: week.to_string(),
        })?;

    let (file_index, file_entry) = parse_index(file)
        .and_then(|i| week_entry.file(i).map(|f| (i, f)))
        .ok_or_else(|| NotFound::File {
            course: course.id.clone(),
            week: week_index,
            file: file.to_string(),
        })?;

    Ok(Resolved {
        course,
        week: week_entry,
        file: file_entry,
        week_index,
        file_index,
    })
}
