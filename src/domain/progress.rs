use crate::domain::course::Course;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Outcome of recording a lecture completion. Duplicates are not errors, but
/// callers surface a different message for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    Recorded,
    AlreadyCompleted,
}

/// Per-(user, course) record of completed lectures.
///
/// Created lazily on the first completion event; the set only ever grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseProgress {
    pub user_id: String,
    pub course_id: String,
    pub completed_lectures: BTreeSet<String>,
}

impl CourseProgress {
    pub fn new(user_id: impl Into<String>, course_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            course_id: course_id.into(),
            completed_lectures: BTreeSet::new(),
        }
    }

    pub fn mark_complete(&mut self, lecture_id: &str) -> MarkOutcome {
        if self.completed_lectures.insert(lecture_id.to_owned()) {
            MarkOutcome::Recorded
        } else {
            MarkOutcome::AlreadyCompleted
        }
    }

    /// Completed lectures that actually exist in the course. Stale ids (e.g.
    /// a lecture later removed by the educator) do not inflate the count.
    fn completed_in(&self, course: &Course) -> usize {
        self.completed_lectures
            .iter()
            .filter(|id| course.contains_lecture(id))
            .count()
    }

    /// Whole-number completion percentage. A course with no lectures is 0%
    /// complete regardless of the record's contents.
    pub fn percent_complete(&self, course: &Course) -> u8 {
        let total = course.total_lectures();
        if total == 0 {
            return 0;
        }
        ((self.completed_in(course) * 100) / total) as u8
    }

    /// A zero-lecture course is never completed.
    pub fn is_completed(&self, course: &Course) -> bool {
        let total = course.total_lectures();
        total > 0 && self.completed_in(course) >= total
    }
}
