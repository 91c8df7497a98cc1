use crate::domain::ports::{CourseStoreRef, ProgressStoreRef, UserStoreRef};
use crate::domain::progress::{CourseProgress, MarkOutcome};
use crate::error::{Result, SettlementError};
use tracing::debug;

/// Records per-lecture completion for enrolled user/course pairs.
///
/// Enrollment is an explicit guard on every write here, not something assumed
/// from UI gating: a user who never settled a purchase for the course cannot
/// create or grow a progress record.
#[derive(Clone)]
pub struct ProgressTracker {
    users: UserStoreRef,
    courses: CourseStoreRef,
    progress: ProgressStoreRef,
}

impl ProgressTracker {
    pub fn new(users: UserStoreRef, courses: CourseStoreRef, progress: ProgressStoreRef) -> Self {
        Self {
            users,
            courses,
            progress,
        }
    }

    /// Appends a lecture to the completed set, creating the record lazily on
    /// the first event. Duplicates are reported, not errors.
    pub async fn mark_lecture_complete(
        &self,
        user_id: &str,
        course_id: &str,
        lecture_id: &str,
    ) -> Result<MarkOutcome> {
        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| SettlementError::not_found("Data Not Found"))?;
        if !user.is_enrolled(course_id) {
            return Err(SettlementError::unauthorized(
                "User has not purchased this course.",
            ));
        }
        let course = self
            .courses
            .get(course_id)
            .await?
            .ok_or_else(|| SettlementError::not_found("Course not found"))?;
        if !course.contains_lecture(lecture_id) {
            return Err(SettlementError::not_found("Lecture not found"));
        }

        let mut record = self
            .progress
            .get(user_id, course_id)
            .await?
            .unwrap_or_else(|| CourseProgress::new(user_id, course_id));

        let outcome = record.mark_complete(lecture_id);
        match outcome {
            MarkOutcome::Recorded => self.progress.store(record).await?,
            MarkOutcome::AlreadyCompleted => {
                debug!(user_id, course_id, lecture_id, "lecture already completed");
            }
        }
        Ok(outcome)
    }

    /// Returns the progress record, or an empty one when nothing has been
    /// completed yet. Absence is not an error.
    pub async fn get_progress(&self, user_id: &str, course_id: &str) -> Result<CourseProgress> {
        Ok(self
            .progress
            .get(user_id, course_id)
            .await?
            .unwrap_or_else(|| CourseProgress::new(user_id, course_id)))
    }

    /// Progress record plus the values derived from the course's current
    /// lecture list.
    pub async fn summary(&self, user_id: &str, course_id: &str) -> Result<ProgressSummary> {
        let course = self
            .courses
            .get(course_id)
            .await?
            .ok_or_else(|| SettlementError::not_found("Course not found"))?;
        let record = self.get_progress(user_id, course_id).await?;
        Ok(ProgressSummary {
            percent_complete: record.percent_complete(&course),
            is_completed: record.is_completed(&course),
            record,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSummary {
    pub record: CourseProgress,
    pub percent_complete: u8,
    pub is_completed: bool,
}
