use crate::domain::course::Rating;
use crate::domain::ports::{CourseStoreRef, UserStoreRef};
use crate::error::{Result, SettlementError};

/// Ratings for enrolled users: at most one entry per (user, course), the
/// latest value winning.
#[derive(Clone)]
pub struct RatingService {
    users: UserStoreRef,
    courses: CourseStoreRef,
}

impl RatingService {
    pub fn new(users: UserStoreRef, courses: CourseStoreRef) -> Self {
        Self { users, courses }
    }

    pub async fn add_or_update(&self, user_id: &str, course_id: &str, rating: u8) -> Result<()> {
        let rating = Rating::new(rating)?;

        let mut course = self
            .courses
            .get(course_id)
            .await?
            .ok_or_else(|| SettlementError::not_found("Course not found"))?;
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

        course.apply_rating(user_id, rating);
        self.courses.store(course).await?;
        Ok(())
    }
}
