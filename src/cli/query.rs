//! Query command: resolve one route offline and print it as JSON.
//!
//! Accepts the browser form `/course/intro/0/1`, the short form `intro/0/1`,
//! or a course alone (`intro`, `/course/intro`).

use anyhow::{Result, bail};
use serde::Serialize;

use crate::app::App;
use crate::catalog::{Course, CourseFile};
use crate::cli::QueryArgs;
use crate::core::{FileTarget, Route, course_href, file_href};
use crate::metadata::Metadata;
use crate::resolve::{resolve, resolve_course};
use crate::viewer::ViewerKind;
use crate::{debug, log};

/// What a route resolved to.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum QueryResult<'a> {
    Course(CourseResult<'a>),
    File(FileResult<'a>),
}

#[derive(Debug, Serialize)]
struct CourseResult<'a> {
    href: String,
    id: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    weeks: Vec<WeekSummary<'a>>,
}

#[derive(Debug, Serialize)]
struct WeekSummary<'a> {
    index: usize,
    name: &'a str,
    files: usize,
}

#[derive(Debug, Serialize)]
struct FileResult<'a> {
    href: String,
    course: &'a str,
    week: &'a str,
    week_index: usize,
    file_index: usize,
    file: &'a CourseFile,
    viewer: &'static str,
    metadata: Option<Metadata>,
}

pub fn run_query(args: &QueryArgs, app: &App) -> Result<()> {
    let route = parse_query_route(&args.route);
    debug!("query"; "{} -> {:?}", args.route, route);

    let result = match &route {
        Route::Course { id } => QueryResult::Course(course_result(resolve_course(&app.catalog, id)?)),
        Route::File { target, .. } => QueryResult::File(file_result(app, target)?),
        _ => bail!("`{}` is not a course or file route", args.route),
    };

    let formatted = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", formatted);

    if let QueryResult::File(file) = &result
        && file.metadata.is_none()
    {
        log!("query"; "no metadata for {}", file.file.path);
    }
    Ok(())
}

/// Parse the route argument, adding the `/course/` prefix when omitted.
fn parse_query_route(raw: &str) -> Route {
    let trimmed = raw.trim();
    let path = trimmed.trim_start_matches('/');
    if path.starts_with("course/") {
        Route::parse(&format!("/{path}"))
    } else {
        Route::parse(&format!("/course/{path}"))
    }
}

fn course_result(course: &Course) -> CourseResult<'_> {
    CourseResult {
        href: course_href(&course.id),
        id: &course.id,
        name: &course.name,
        description: course.description.as_deref(),
        weeks: course
            .weeks
            .iter()
            .enumerate()
            .map(|(index, week)| WeekSummary {
                index,
                name: &week.name,
                files: week.files.len(),
            })
            .collect(),
    }
}

fn file_result<'a>(app: &'a App, target: &FileTarget) -> Result<FileResult<'a>> {
    let found = resolve(&app.catalog, &target.course, &target.week, &target.file)?;
    let metadata = app
        .metadata
        .get_or_fetch(app.source(), &found.file.path)
        .map(|m| m.as_ref().clone());

    Ok(FileResult {
        href: file_href(&found.course.id, found.week_index, found.file_index),
        course: &found.course.id,
        week: &found.week.name,
        week_index: found.week_index,
        file_index: found.file_index,
        file: found.file,
        viewer: ViewerKind::select(found.file).as_str(),
        metadata,
    })
}
