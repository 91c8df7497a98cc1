use crate::domain::course::Course;
use crate::domain::ports::{CourseStore, ProgressStore, PurchaseStore, UserStore};
use crate::domain::progress::CourseProgress;
use crate::domain::purchase::Purchase;
use crate::domain::user::User;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Thread-safe in-memory user store.
///
/// `Arc<RwLock<HashMap>>` for shared concurrent access; the default backend
/// when no database path is configured, and the test backend throughout.
#[derive(Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn store(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;
        users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn get(&self, user_id: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(user_id).cloned())
    }
}

/// Thread-safe in-memory course store.
#[derive(Default, Clone)]
pub struct InMemoryCourseStore {
    courses: Arc<RwLock<HashMap<String, Course>>>,
}

impl InMemoryCourseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseStore for InMemoryCourseStore {
    async fn store(&self, course: Course) -> Result<()> {
        let mut courses = self.courses.write().await;
        courses.insert(course.id.clone(), course);
        Ok(())
    }

    async fn get(&self, course_id: &str) -> Result<Option<Course>> {
        let courses = self.courses.read().await;
        Ok(courses.get(course_id).cloned())
    }
}

/// Thread-safe in-memory purchase store.
#[derive(Default, Clone)]
pub struct InMemoryPurchaseStore {
    purchases: Arc<RwLock<HashMap<Uuid, Purchase>>>,
}

impl InMemoryPurchaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every purchase, for tests and diagnostics.
    pub async fn all(&self) -> Vec<Purchase> {
        let purchases = self.purchases.read().await;
        purchases.values().cloned().collect()
    }
}

#[async_trait]
impl PurchaseStore for InMemoryPurchaseStore {
    async fn store(&self, purchase: Purchase) -> Result<()> {
        let mut purchases = self.purchases.write().await;
        purchases.insert(purchase.id, purchase);
        Ok(())
    }

    async fn get(&self, purchase_id: Uuid) -> Result<Option<Purchase>> {
        let purchases = self.purchases.read().await;
        Ok(purchases.get(&purchase_id).cloned())
    }
}

/// Thread-safe in-memory progress store, keyed by (user id, course id).
#[derive(Default, Clone)]
pub struct InMemoryProgressStore {
    records: Arc<RwLock<HashMap<(String, String), CourseProgress>>>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn store(&self, progress: CourseProgress) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert(
            (progress.user_id.clone(), progress.course_id.clone()),
            progress,
        );
        Ok(())
    }

    async fn get(&self, user_id: &str, course_id: &str) -> Result<Option<CourseProgress>> {
        let records = self.records.read().await;
        Ok(records
            .get(&(user_id.to_owned(), course_id.to_owned()))
            .cloned())
    }
}
