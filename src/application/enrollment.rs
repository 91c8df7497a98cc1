use crate::domain::course::Course;
use crate::domain::ports::{CourseStoreRef, UserStoreRef};
use crate::error::{Result, SettlementError};
use tracing::debug;

/// Applies settled purchases to both sides of the user/course relation.
///
/// The relation is materialized redundantly (`User.enrolled_courses` and
/// `Course.enrolled_students`) and there is no multi-document transaction, so
/// each side is written independently with a membership check first. A crash
/// between the two writes leaves a state that any retry converges from;
/// nothing here ever removes an enrollment.
#[derive(Clone)]
pub struct EnrollmentApplier {
    users: UserStoreRef,
    courses: CourseStoreRef,
}

impl EnrollmentApplier {
    pub fn new(users: UserStoreRef, courses: CourseStoreRef) -> Self {
        Self { users, courses }
    }

    /// Enrolls a user in a course. Re-enrolling is a successful no-op.
    pub async fn enroll(&self, user_id: &str, course_id: &str) -> Result<()> {
        let mut course = self
            .courses
            .get(course_id)
            .await?
            .ok_or_else(|| SettlementError::not_found("User or Course not found"))?;
        let mut user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| SettlementError::not_found("User or Course not found"))?;

        // Each side is persisted as soon as it changes so a partial
        // application is durable and repairable by retry.
        if course.enroll(user_id) {
            self.courses.store(course).await?;
        } else {
            debug!(user_id, course_id, "student already in course roster");
        }

        if user.enroll(course_id) {
            self.users.store(user).await?;
        } else {
            debug!(user_id, course_id, "course already in user enrollments");
        }

        Ok(())
    }

    /// Resolves the user's enrolled course ids to full course records. Ids
    /// that no longer resolve (a course since removed from the catalog) are
    /// skipped rather than failing the whole read.
    pub async fn enrolled_courses(&self, user_id: &str) -> Result<Vec<Course>> {
        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| SettlementError::not_found("User Not Found"))?;

        let mut courses = Vec::with_capacity(user.enrolled_courses.len());
        for course_id in &user.enrolled_courses {
            match self.courses.get(course_id).await? {
                Some(course) => courses.push(course),
                None => debug!(user_id, course_id, "enrolled course no longer in catalog"),
            }
        }
        Ok(courses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::{InMemoryCourseStore, InMemoryUserStore};
    use crate::test_fixtures::{sample_course, sample_user};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    async fn applier_with_data() -> (EnrollmentApplier, UserStoreRef, CourseStoreRef) {
        let users: UserStoreRef = Arc::new(InMemoryUserStore::new());
        let courses: CourseStoreRef = Arc::new(InMemoryCourseStore::new());
        users.store(sample_user("user-1")).await.unwrap();
        courses
            .store(sample_course("course-1", dec!(49.99), 0))
            .await
            .unwrap();
        (
            EnrollmentApplier::new(users.clone(), courses.clone()),
            users,
            courses,
        )
    }

    #[tokio::test]
    async fn test_enroll_updates_both_sides() {
        let (applier, users, courses) = applier_with_data().await;
        applier.enroll("user-1", "course-1").await.unwrap();

        let user = users.get("user-1").await.unwrap().unwrap();
        let course = courses.get("course-1").await.unwrap().unwrap();
        assert!(user.is_enrolled("course-1"));
        assert!(course.is_enrolled("user-1"));
    }

    #[tokio::test]
    async fn test_enroll_is_idempotent() {
        let (applier, users, courses) = applier_with_data().await;
        applier.enroll("user-1", "course-1").await.unwrap();
        applier.enroll("user-1", "course-1").await.unwrap();

        let user = users.get("user-1").await.unwrap().unwrap();
        let course = courses.get("course-1").await.unwrap().unwrap();
        assert_eq!(user.enrolled_courses.len(), 1);
        assert_eq!(course.enrolled_students.len(), 1);
    }

    #[tokio::test]
    async fn test_enroll_repairs_partial_application() {
        let (applier, users, courses) = applier_with_data().await;

        // Simulate a crash after the course-side write.
        let mut course = courses.get("course-1").await.unwrap().unwrap();
        course.enroll("user-1");
        courses.store(course).await.unwrap();

        applier.enroll("user-1", "course-1").await.unwrap();

        let user = users.get("user-1").await.unwrap().unwrap();
        let course = courses.get("course-1").await.unwrap().unwrap();
        assert!(user.is_enrolled("course-1"));
        assert_eq!(course.enrolled_students.len(), 1);
    }

    #[tokio::test]
    async fn test_enroll_unknown_course() {
        let (applier, _, _) = applier_with_data().await;
        assert!(matches!(
            applier.enroll("user-1", "missing").await,
            Err(SettlementError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_enrolled_courses_skips_unresolvable_ids() {
        let (applier, users, _) = applier_with_data().await;
        applier.enroll("user-1", "course-1").await.unwrap();

        // An enrollment whose course has since left the catalog.
        let mut user = users.get("user-1").await.unwrap().unwrap();
        user.enroll("retired-course");
        users.store(user).await.unwrap();

        let courses = applier.enrolled_courses("user-1").await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].id, "course-1");
    }

    #[tokio::test]
    async fn test_enrolled_courses_unknown_user() {
        let (applier, _, _) = applier_with_data().await;
        assert!(matches!(
            applier.enrolled_courses("ghost").await,
            Err(SettlementError::NotFound(_))
        ));
    }
}
