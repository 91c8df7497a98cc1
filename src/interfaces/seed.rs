use crate::domain::course::Course;
use crate::domain::ports::CourseStoreRef;
use crate::error::Result;
use std::io::Read;
use tracing::info;

/// Reads a JSON array of courses from a seed source.
///
/// Course authoring is out of scope for this service, so deployments that
/// are not fronted by a catalog service load their courses at startup from
/// a file passed on the command line.
pub struct CourseSeeder<R: Read> {
    source: R,
}

impl<R: Read> CourseSeeder<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn courses(self) -> Result<Vec<Course>> {
        Ok(serde_json::from_reader(self.source)?)
    }
}

/// Stores every seeded course, returning how many were loaded.
pub async fn apply(store: &CourseStoreRef, courses: Vec<Course>) -> Result<usize> {
    let count = courses.len();
    for course in courses {
        store.store(course).await?;
    }
    info!(count, "seeded courses");
    Ok(count)
}
