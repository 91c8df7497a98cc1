use crate::domain::course::Course;
use crate::domain::ports::{CourseStore, ProgressStore, PurchaseStore, UserStore};
use crate::domain::progress::CourseProgress;
use crate::domain::purchase::Purchase;
use crate::domain::user::User;
use crate::error::{Result, SettlementError};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Column Family for user records.
pub const CF_USERS: &str = "users";
/// Column Family for course records.
pub const CF_COURSES: &str = "courses";
/// Column Family for purchase records.
pub const CF_PURCHASES: &str = "purchases";
/// Column Family for course-progress records.
pub const CF_PROGRESS: &str = "progress";

// Composite (user, course) key; user ids and course ids never contain NUL.
fn progress_key(user_id: &str, course_id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(user_id.len() + course_id.len() + 1);
    key.extend_from_slice(user_id.as_bytes());
    key.push(0);
    key.extend_from_slice(course_id.as_bytes());
    key
}

/// Persistent store backed by RocksDB, one Column Family per entity with
/// JSON-encoded values.
///
/// Thread-safe: `Clone` shares the underlying `Arc<DB>`, so a single opened
/// database serves all four store ports.
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at the given path, ensuring all
    /// required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = [CF_USERS, CF_COURSES, CF_PURCHASES, CF_PROGRESS]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, cfs)?;
        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            SettlementError::Internal(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    fn put_json<T: Serialize>(&self, cf_name: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value)?;
        self.db.put_cf(cf, key, bytes)?;
        Ok(())
    }

    fn get_json<T: DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(cf, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UserStore for RocksDbStore {
    async fn store(&self, user: User) -> Result<()> {
        self.put_json(CF_USERS, user.id.as_bytes(), &user)
    }

    async fn get(&self, user_id: &str) -> Result<Option<User>> {
        self.get_json(CF_USERS, user_id.as_bytes())
    }
}

#[async_trait]
impl CourseStore for RocksDbStore {
    async fn store(&self, course: Course) -> Result<()> {
        self.put_json(CF_COURSES, course.id.as_bytes(), &course)
    }

    async fn get(&self, course_id: &str) -> Result<Option<Course>> {
        self.get_json(CF_COURSES, course_id.as_bytes())
    }
}

#[async_trait]
impl PurchaseStore for RocksDbStore {
    async fn store(&self, purchase: Purchase) -> Result<()> {
        self.put_json(CF_PURCHASES, purchase.id.as_bytes(), &purchase)
    }

    async fn get(&self, purchase_id: Uuid) -> Result<Option<Purchase>> {
        self.get_json(CF_PURCHASES, purchase_id.as_bytes())
    }
}

#[async_trait]
impl ProgressStore for RocksDbStore {
    async fn store(&self, progress: CourseProgress) -> Result<()> {
        let key = progress_key(&progress.user_id, &progress.course_id);
        self.put_json(CF_PROGRESS, &key, &progress)
    }

    async fn get(&self, user_id: &str, course_id: &str) -> Result<Option<CourseProgress>> {
        self.get_json(CF_PROGRESS, &progress_key(user_id, course_id))
    }
}
