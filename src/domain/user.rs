use serde::{Deserialize, Serialize};

/// A learner, keyed by the identity provider's stable user id.
///
/// Profile fields are owned by the identity provider and refreshed on sync;
/// `enrolled_courses` is owned by this service and only ever grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub image_url: String,
    pub enrolled_courses: Vec<String>,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            image_url: image_url.into(),
            enrolled_courses: Vec::new(),
        }
    }

    pub fn is_enrolled(&self, course_id: &str) -> bool {
        self.enrolled_courses.iter().any(|id| id == course_id)
    }

    /// Adds a course to the enrolled set. Returns `false` when the course was
    /// already present (no change).
    pub fn enroll(&mut self, course_id: &str) -> bool {
        if self.is_enrolled(course_id) {
            return false;
        }
        self.enrolled_courses.push(course_id.to_owned());
        true
    }
}
