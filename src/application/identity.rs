use crate::domain::ports::UserStoreRef;
use crate::domain::user::User;
use crate::error::{Result, SettlementError};
use tracing::info;

/// Identity-provider profile data carried in a sync request. The provider
/// has already authenticated the caller; this service only mirrors profile
/// fields locally.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityProfile {
    pub email: String,
    pub name: String,
    pub image_url: String,
}

/// Outcome of a sync, so the boundary can report "already synced" distinctly.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    Created(User),
    AlreadySynced(User),
}

impl SyncOutcome {
    pub fn user(&self) -> &User {
        match self {
            Self::Created(user) | Self::AlreadySynced(user) => user,
        }
    }
}

/// Creates local user records on first sync from the identity provider.
/// This is the only User creation path the service owns.
#[derive(Clone)]
pub struct IdentitySync {
    users: UserStoreRef,
}

impl IdentitySync {
    pub fn new(users: UserStoreRef) -> Self {
        Self { users }
    }

    /// Idempotent: re-syncing an existing user returns it unchanged.
    pub async fn sync(&self, user_id: &str, profile: IdentityProfile) -> Result<SyncOutcome> {
        if let Some(existing) = self.users.get(user_id).await? {
            return Ok(SyncOutcome::AlreadySynced(existing));
        }

        let user = User::new(user_id, profile.email, profile.name, profile.image_url);
        self.users.store(user.clone()).await?;
        info!(user_id, "user synced from identity provider");
        Ok(SyncOutcome::Created(user))
    }

    /// Refreshes profile fields for an already-synced user. The enrolled set
    /// is owned by this service, not the identity provider, and survives the
    /// update untouched.
    pub async fn update(&self, user_id: &str, profile: IdentityProfile) -> Result<User> {
        let mut user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| SettlementError::not_found("User Not Found"))?;

        user.email = profile.email;
        user.name = profile.name;
        user.image_url = profile.image_url;
        self.users.store(user.clone()).await?;
        info!(user_id, "user profile updated");
        Ok(user)
    }

    pub async fn get(&self, user_id: &str) -> Result<User> {
        self.users
            .get(user_id)
            .await?
            .ok_or_else(|| SettlementError::not_found("User Not Found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::UserStore;
    use crate::infrastructure::in_memory::InMemoryUserStore;
    use std::sync::Arc;

    fn profile() -> IdentityProfile {
        IdentityProfile {
            email: "ada@example.com".into(),
            name: "Ada".into(),
            image_url: "https://img.example.com/ada.png".into(),
        }
    }

    #[tokio::test]
    async fn test_first_sync_creates_user() {
        let sync = IdentitySync::new(Arc::new(InMemoryUserStore::new()));
        let outcome = sync.sync("user-1", profile()).await.unwrap();
        assert!(matches!(outcome, SyncOutcome::Created(_)));
        assert_eq!(outcome.user().email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_resync_is_idempotent() {
        let sync = IdentitySync::new(Arc::new(InMemoryUserStore::new()));
        sync.sync("user-1", profile()).await.unwrap();

        let mut changed = profile();
        changed.name = "Ada L.".into();
        let outcome = sync.sync("user-1", changed).await.unwrap();
        assert!(matches!(outcome, SyncOutcome::AlreadySynced(_)));
        assert_eq!(outcome.user().name, "Ada");
    }

    #[tokio::test]
    async fn test_update_refreshes_profile_but_keeps_enrollments() {
        let users = Arc::new(InMemoryUserStore::new());
        let sync = IdentitySync::new(users.clone());
        sync.sync("user-1", profile()).await.unwrap();

        let mut enrolled = sync.get("user-1").await.unwrap();
        enrolled.enroll("course-1");
        users.store(enrolled).await.unwrap();

        let mut changed = profile();
        changed.name = "Ada L.".into();
        changed.email = "ada.l@example.com".into();
        let user = sync.update("user-1", changed).await.unwrap();

        assert_eq!(user.name, "Ada L.");
        assert_eq!(user.email, "ada.l@example.com");
        assert_eq!(user.enrolled_courses, vec!["course-1".to_owned()]);
    }

    #[tokio::test]
    async fn test_update_requires_prior_sync() {
        let sync = IdentitySync::new(Arc::new(InMemoryUserStore::new()));
        assert!(matches!(
            sync.update("user-1", profile()).await,
            Err(SettlementError::NotFound(_))
        ));
        assert!(matches!(
            sync.get("user-1").await,
            Err(SettlementError::NotFound(_))
        ));
    }
}
