//! Sidebar expansion state.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::catalog::Course;

/// Week expansion flags, keyed by week display name.
///
/// Lives as long as the browser session; route changes never reset it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NavState {
    expanded: FxHashMap<String, bool>,
}

impl NavState {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `week` is currently shown expanded.
    #[inline]
    pub fn is_expanded(&self, week: &str) -> bool {
        self.expanded.get(week).copied().unwrap_or(false)
    }

    /// Flip one week. Other weeks are untouched.
    pub fn toggle(&mut self, week: &str) {
        let entry = self.expanded.entry(week.to_string()).or_insert(false);
        *entry = !*entry;
    }

    /// Expand one week the first time `course` is displayed.
    ///
    /// Applies only when none of the course's weeks has any recorded state:
    /// the route's week when it is in range, otherwise the first week.
    /// Returns whether a week was expanded.
    pub fn seed(&mut self, course: &Course, route_week: Option<usize>) -> bool {
        if course.weeks.is_empty() {
            return false;
        }
        if course.weeks.iter().any(|w| self.expanded.contains_key(&w.name)) {
            return false;
        }

        let week = route_week
            .and_then(|i| course.week(i))
            .unwrap_or(&course.weeks[0]);
        self.expanded.insert(week.name.clone(), true);
        true
    }

    /// Number of weeks with recorded state.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.expanded.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Week;

    fn course(weeks: &[&str]) -> Course {
        Course {
            id: "c".into(),
            name: "C".into(),
            description: None,
            weeks: weeks
                .iter()
                .map(|name| Week {
                    name: (*name).into(),
                    files: Vec::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_seed_route_week() {
        let course = course(&["W1", "W2", "W3"]);
        let mut nav = NavState::new();

        assert!(nav.seed(&course, Some(2)));
        assert!(nav.is_expanded("W3"));
        assert!(!nav.is_expanded("W1"));
        assert_eq!(nav.len(), 1);
    }

    #[test]
    fn test_seed_falls_back_to_first_week() {
        let course = course(&["W1", "W2"]);

        let mut nav = NavState::new();
        nav.seed(&course, None);
        assert!(nav.is_expanded("W1"));

        let mut nav = NavState::new();
        nav.seed(&course, Some(7));
        assert!(nav.is_expanded("W1"));
        assert!(!nav.is_expanded("W2"));
    }

    #[test]
    fn test_seed_is_one_shot() {
        let course = course(&["W1", "W2"]);
        let mut nav = NavState::new();

        nav.seed(&course, Some(0));
        nav.toggle("W1");
        assert!(!nav.is_expanded("W1"));

        // Revisiting the course keeps the user's choice
        assert!(!nav.seed(&course, Some(1)));
        assert!(!nav.is_expanded("W1"));
        assert!(!nav.is_expanded("W2"));
    }

    #[test]
    fn test_seed_empty_course() {
        let mut nav = NavState::new();
        assert!(!nav.seed(&course(&[]), Some(0)));
        assert_eq!(nav.len(), 0);
    }

    #[test]
    fn test_double_toggle_restores() {
        let course = course(&["W1", "W2"]);
        let mut nav = NavState::new();
        nav.seed(&course, None);

        for week in ["W1", "W2"] {
            let before = nav.is_expanded(week);
            nav.toggle(week);
            assert_ne!(nav.is_expanded(week), before);
            nav.toggle(week);
            assert_eq!(nav.is_expanded(week), before);
        }
    }

    #[test]
    fn test_toggle_independent() {
        let mut nav = NavState::new();
        nav.toggle("W1");
        nav.toggle("W2");
        assert!(nav.is_expanded("W1"));
        assert!(nav.is_expanded("W2"));
    }
}
