//! Catalog check command.
//!
//! Walks every course file and reports local content that is missing under
//! the content root. With `--metadata`, files without a sidecar are reported
//! too. External links are never fetched.

mod report;

use anyhow::Result;
use rayon::prelude::*;

use crate::app::App;
use crate::catalog::{Course, FileKind};
use crate::cli::CheckArgs;
use crate::log;
use crate::logger::ProgressLine;
use crate::metadata::derive_metadata_address;
use crate::resource::StaticRoot;
use crate::utils::text::plural_count;

pub use report::CheckReport;

/// What to look for.
#[derive(Debug, Clone, Copy)]
pub struct CheckOptions<'a> {
    pub metadata: bool,
    pub meta_extension: &'a str,
}

/// Check the loaded catalog against the content root.
pub fn check_catalog(app: &App, args: &CheckArgs, meta_extension: &str) -> Result<()> {
    if app.catalog.is_empty() {
        log!("check"; "catalog has no courses");
        return Ok(());
    }

    let courses = app.catalog.courses();
    let files = app.catalog.file_count();
    log!(
        "check";
        "checking {} in {}",
        plural_count(files, "file"),
        plural_count(courses.len(), "course")
    );

    let options = CheckOptions {
        metadata: args.metadata,
        meta_extension,
    };
    let meta_total = if args.metadata { files } else { 0 };
    let progress = ProgressLine::new("check", &[("files", files), ("meta", meta_total)]);

    let report = courses
        .par_iter()
        .map(|course| check_course(course, &app.root, options, Some(&progress)))
        .reduce(CheckReport::default, |mut acc, r| {
            acc.merge(r);
            acc
        });
    progress.finish();

    report.print();
    log!("check"; "{}", report);

    let fatal = report.content_count();
    if fatal > 0 && !args.warn_only {
        anyhow::bail!(
            "found {} with missing content",
            plural_count(fatal, "file")
        );
    }
    Ok(())
}

/// Check one course. Progress counters are bumped per file.
pub fn check_course(
    course: &Course,
    root: &StaticRoot,
    options: CheckOptions<'_>,
    progress: Option<&ProgressLine>,
) -> CheckReport {
    let mut report = CheckReport::default();

    for week in &course.weeks {
        for file in &week.files {
            let target = format!("{} / {}", week.name, file.name);

            if let FileKind::Other(tag) = &file.kind {
                report.add_unsupported(&course.id, target.clone(), tag);
            }

            if !file.is_external() {
                if root.locate(&file.path).is_none() {
                    report.add_content(&course.id, target.clone(), &file.path);
                }
                if options.metadata
                    && let Some(meta) = derive_metadata_address(&file.path, options.meta_extension)
                    && root.locate(&meta).is_none()
                {
                    report.add_metadata(&course.id, target, &meta);
                }
            }

            if let Some(progress) = progress {
                progress.inc("files");
                if options.metadata {
                    progress.inc("meta");
                }
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use std::fs;

    const CATALOG: &str = r#"{"courses": [{
        "id": "intro", "name": "Intro", "weeks": [
            {"name": "Week 1", "files": [
                {"name": "Welcome", "path": "/w1/welcome.md", "type": "markdown"},
                {"name": "Slides", "path": "/w1/slides.pdf", "type": "pdf"},
                {"name": "Talk", "path": "https://youtube.com/watch?v=abc", "type": "link"},
                {"name": "Notes", "path": "/w1/notes.docx", "type": "docx"}
            ]}
        ]
    }]}"#;

    fn fixture() -> (tempfile::TempDir, Catalog) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("w1")).unwrap();
        fs::write(dir.path().join("w1/welcome.md"), "# Hi").unwrap();
        fs::write(dir.path().join("w1/welcome.meta"), "{}").unwrap();
        fs::write(dir.path().join("w1/notes.docx"), "x").unwrap();
        (dir, Catalog::from_json(CATALOG).unwrap())
    }

    #[test]
    fn test_missing_content_reported() {
        let (dir, catalog) = fixture();
        let root = StaticRoot::new(dir.path());
        let options = CheckOptions {
            metadata: false,
            meta_extension: "meta",
        };

        let report = check_course(&catalog.courses()[0], &root, options, None);
        assert_eq!(report.content_count(), 1);
        assert_eq!(report.content["intro"][0].detail, "/w1/slides.pdf");
        assert_eq!(report.content["intro"][0].target, "Week 1 / Slides");
        assert_eq!(report.metadata_count(), 0);
    }

    #[test]
    fn test_missing_metadata_only_when_asked() {
        let (dir, catalog) = fixture();
        let root = StaticRoot::new(dir.path());
        let options = CheckOptions {
            metadata: true,
            meta_extension: "meta",
        };

        let report = check_course(&catalog.courses()[0], &root, options, None);
        // slides and notes lack sidecars; the external link is skipped
        let missing: Vec<_> = report.metadata["intro"].iter().map(|p| p.detail.as_str()).collect();
        assert_eq!(missing, ["/w1/slides.meta", "/w1/notes.meta"]);
    }

    #[test]
    fn test_reserved_characters_in_file_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("What is Debate?.md"), "# Q").unwrap();
        fs::write(dir.path().join("What is Debate?.meta"), "{}").unwrap();
        fs::write(dir.path().join("Lecture #3.md"), "# 3").unwrap();
        let catalog = Catalog::from_json(
            r#"{"courses": [{"id": "debate", "name": "Debate", "weeks": [
                {"name": "Week 1", "files": [
                    {"name": "Q", "path": "/What is Debate?.md", "type": "markdown"},
                    {"name": "L3", "path": "/Lecture #3.md", "type": "markdown"}
                ]}
            ]}]}"#,
        )
        .unwrap();
        let options = CheckOptions {
            metadata: true,
            meta_extension: "meta",
        };

        let report = check_course(&catalog.courses()[0], &StaticRoot::new(dir.path()), options, None);
        assert_eq!(report.content_count(), 0);
        let missing: Vec<_> = report.metadata["debate"].iter().map(|p| p.detail.as_str()).collect();
        assert_eq!(missing, ["/Lecture #3.meta"]);
    }

    #[test]
    fn test_unsupported_tag_reported() {
        let (dir, catalog) = fixture();
        let root = StaticRoot::new(dir.path());
        let options = CheckOptions {
            metadata: false,
            meta_extension: "meta",
        };

        let report = check_course(&catalog.courses()[0], &root, options, None);
        assert_eq!(report.unsupported_count(), 1);
        assert_eq!(report.unsupported["intro"][0].detail, "docx");
    }
}
