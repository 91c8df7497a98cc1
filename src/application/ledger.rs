use crate::domain::ports::{CourseStoreRef, PurchaseStoreRef, UserStoreRef};
use crate::domain::purchase::Purchase;
use crate::error::{Result, SettlementError};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Owns creation and status transitions of purchase records.
///
/// The ledger reads users and courses only to validate references at
/// creation time; it never mutates them. Enrollment side effects live in the
/// applier, orchestration in the coordinator.
#[derive(Clone)]
pub struct PurchaseLedger {
    purchases: PurchaseStoreRef,
    users: UserStoreRef,
    courses: CourseStoreRef,
}

impl PurchaseLedger {
    pub fn new(purchases: PurchaseStoreRef, users: UserStoreRef, courses: CourseStoreRef) -> Self {
        Self {
            purchases,
            users,
            courses,
        }
    }

    /// Creates a `pending` purchase. The caller supplies the amount it is
    /// about to charge; it must equal the course's current effective price.
    /// The stored amount is frozen from then on.
    pub async fn create_pending(
        &self,
        course_id: &str,
        user_id: &str,
        amount: Decimal,
    ) -> Result<Purchase> {
        if self.users.get(user_id).await?.is_none() {
            return Err(SettlementError::not_found("Data Not Found"));
        }
        let course = self
            .courses
            .get(course_id)
            .await?
            .ok_or_else(|| SettlementError::not_found("Data Not Found"))?;

        if amount != course.effective_price() {
            return Err(SettlementError::validation(
                "Amount does not match the course's effective price",
            ));
        }

        let purchase = Purchase::new_pending(course_id, user_id, amount);
        self.purchases.store(purchase.clone()).await?;
        Ok(purchase)
    }

    pub async fn get(&self, purchase_id: Uuid) -> Result<Purchase> {
        self.purchases
            .get(purchase_id)
            .await?
            .ok_or_else(|| SettlementError::not_found("Purchase not found"))
    }

    /// Marks a purchase `completed`. Re-completing is a no-op success; a
    /// `failed` purchase cannot be completed.
    pub async fn mark_completed(&self, purchase_id: Uuid) -> Result<Purchase> {
        let mut purchase = self.get(purchase_id).await?;
        if purchase.mark_completed()? {
            self.purchases.store(purchase.clone()).await?;
        }
        Ok(purchase)
    }

    /// Marks a purchase `failed`, with the mirror-image terminal guard.
    pub async fn mark_failed(&self, purchase_id: Uuid) -> Result<Purchase> {
        let mut purchase = self.get(purchase_id).await?;
        if purchase.mark_failed()? {
            self.purchases.store(purchase.clone()).await?;
        }
        Ok(purchase)
    }
}
