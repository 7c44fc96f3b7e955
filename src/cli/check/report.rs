//! Check report types and formatting.

use std::collections::BTreeMap;
use std::fmt;

use owo_colors::OwoColorize;

use crate::utils::text::plural_s;

/// A single problem with one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    /// Location inside the course, e.g. `Week 1 / Slides`.
    pub target: String,
    /// Offending address or tag.
    pub detail: String,
}

/// Problems found by `syllabus check`, grouped by course id.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Local content addresses with no file under the root.
    pub content: BTreeMap<String, Vec<Problem>>,
    /// Local files without a metadata sidecar.
    pub metadata: BTreeMap<String, Vec<Problem>>,
    /// Type tags no viewer handles.
    pub unsupported: BTreeMap<String, Vec<Problem>>,
}

impl CheckReport {
    pub fn add_content(&mut self, course: &str, target: String, address: &str) {
        push(&mut self.content, course, target, address);
    }

    pub fn add_metadata(&mut self, course: &str, target: String, address: &str) {
        push(&mut self.metadata, course, target, address);
    }

    pub fn add_unsupported(&mut self, course: &str, target: String, tag: &str) {
        push(&mut self.unsupported, course, target, tag);
    }

    pub fn merge(&mut self, other: Self) {
        for (dst, src) in [
            (&mut self.content, other.content),
            (&mut self.metadata, other.metadata),
            (&mut self.unsupported, other.unsupported),
        ] {
            for (course, mut problems) in src {
                dst.entry(course).or_default().append(&mut problems);
            }
        }
    }

    pub fn content_count(&self) -> usize {
        count(&self.content)
    }

    pub fn metadata_count(&self) -> usize {
        count(&self.metadata)
    }

    pub fn unsupported_count(&self) -> usize {
        count(&self.unsupported)
    }

    /// Print the full report to stderr.
    pub fn print(&self) {
        print_section("missing content", "", &self.content);
        print_section("missing metadata", "", &self.metadata);
        print_section("unsupported type", "no viewer for", &self.unsupported);
    }
}

fn push(map: &mut BTreeMap<String, Vec<Problem>>, course: &str, target: String, detail: &str) {
    map.entry(course.to_string()).or_default().push(Problem {
        target,
        detail: detail.to_string(),
    });
}

fn count(map: &BTreeMap<String, Vec<Problem>>) -> usize {
    map.values().map(Vec::len).sum()
}

fn print_section(name: &str, lead: &str, problems: &BTreeMap<String, Vec<Problem>>) {
    if problems.is_empty() {
        return;
    }
    let total = count(problems);

    eprintln!();
    eprintln!(
        "{} {}",
        name.red().bold(),
        format!(
            "({} course{}, {} entr{})",
            problems.len(),
            plural_s(problems.len()),
            total,
            if total == 1 { "y" } else { "ies" }
        )
        .dimmed()
    );

    for (course, entries) in problems {
        eprintln!("{}{}{}", "[".dimmed(), course.cyan(), "]".dimmed());
        for p in entries {
            if lead.is_empty() {
                eprintln!("{} {} {}", "→".red(), p.target, p.detail.dimmed());
            } else {
                eprintln!("{} {} {} {}", "→".red(), p.target, lead.dimmed(), p.detail);
            }
        }
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.content_count() + self.metadata_count() + self.unsupported_count();

        if total == 0 {
            write!(f, "{}", "all checks passed".green())
        } else {
            write!(
                f,
                "{} {} {}",
                "found".dimmed(),
                total.to_string().red().bold(),
                format!("problem{}", plural_s(total)).dimmed()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_merge() {
        let mut a = CheckReport::default();
        a.add_content("intro", "Week 1 / A".into(), "/a.md");

        let mut b = CheckReport::default();
        b.add_content("intro", "Week 2 / B".into(), "/b.md");
        b.add_metadata("adv", "Week 1 / C".into(), "/c.meta");

        a.merge(b);
        assert_eq!(a.content_count(), 2);
        assert_eq!(a.content["intro"].len(), 2);
        assert_eq!(a.metadata_count(), 1);
        assert_eq!(a.unsupported_count(), 0);
    }

    #[test]
    fn test_display_summary() {
        use crate::logger::strip_ansi;

        let mut report = CheckReport::default();
        assert_eq!(strip_ansi(&report.to_string()), "all checks passed");

        report.add_unsupported("intro", "Week 1 / Notes".into(), "docx");
        assert_eq!(strip_ansi(&report.to_string()), "found 1 problem");
    }
}
