use super::course::Course;
use super::progress::CourseProgress;
use super::purchase::Purchase;
use super::user::User;
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn store(&self, user: User) -> Result<()>;
    async fn get(&self, user_id: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn store(&self, course: Course) -> Result<()>;
    async fn get(&self, course_id: &str) -> Result<Option<Course>>;
}

#[async_trait]
pub trait PurchaseStore: Send + Sync {
    async fn store(&self, purchase: Purchase) -> Result<()>;
    async fn get(&self, purchase_id: Uuid) -> Result<Option<Purchase>>;
}

#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn store(&self, progress: CourseProgress) -> Result<()>;
    async fn get(&self, user_id: &str, course_id: &str) -> Result<Option<CourseProgress>>;
}

/// What the settlement coordinator hands the payment processor when opening
/// a hosted checkout. The purchase id travels as session metadata so the
/// processor's confirmation can be correlated back to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub purchase_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub product_name: String,
    /// Origin of the initiating client, used for the post-payment redirect.
    pub origin: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSession {
    pub session_id: String,
    pub redirect_url: String,
}

/// Port to the external payment processor. The processor's protocol is not
/// modeled here; adapters own the wire details.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    async fn create_session(&self, request: CheckoutRequest) -> Result<CheckoutSession>;
}

// Services share stores, so the aliases are Arc rather than Box.
pub type UserStoreRef = Arc<dyn UserStore>;
pub type CourseStoreRef = Arc<dyn CourseStore>;
pub type PurchaseStoreRef = Arc<dyn PurchaseStore>;
pub type ProgressStoreRef = Arc<dyn ProgressStore>;
pub type CheckoutGatewayRef = Arc<dyn CheckoutGateway>;
