use crate::error::{Result, SettlementError};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Pending,
    Completed,
    Failed,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// The authoritative record of why an enrollment exists.
///
/// `amount` is the effective price frozen at creation; it is never recomputed
/// or mutated afterwards. Status transitions are monotonic: `pending` moves
/// to exactly one of `completed` or `failed`, and terminal states are final.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: Uuid,
    pub course_id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub status: PurchaseStatus,
    pub created_at: DateTime<Utc>,
}

impl Purchase {
    pub fn new_pending(
        course_id: impl Into<String>,
        user_id: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            course_id: course_id.into(),
            user_id: user_id.into(),
            amount,
            status: PurchaseStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Transitions to `completed`. Returns `Ok(true)` when the transition
    /// happened, `Ok(false)` when already completed (idempotent no-op), and
    /// an error when the purchase already failed.
    pub fn mark_completed(&mut self) -> Result<bool> {
        match self.status {
            PurchaseStatus::Completed => Ok(false),
            PurchaseStatus::Failed => Err(SettlementError::invalid_state(
                "Purchase already failed",
            )),
            PurchaseStatus::Pending => {
                self.status = PurchaseStatus::Completed;
                Ok(true)
            }
        }
    }

    /// Transitions to `failed`, with the mirror-image terminal guard of
    /// [`Purchase::mark_completed`].
    pub fn mark_failed(&mut self) -> Result<bool> {
        match self.status {
            PurchaseStatus::Failed => Ok(false),
            PurchaseStatus::Completed => Err(SettlementError::invalid_state(
                "Purchase already completed",
            )),
            PurchaseStatus::Pending => {
                self.status = PurchaseStatus::Failed;
                Ok(true)
            }
        }
    }

    /// Whether a still-pending purchase has outlived the abandonment TTL.
    /// Terminal purchases never expire.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.status == PurchaseStatus::Pending && now - self.created_at > ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pending() -> Purchase {
        Purchase::new_pending("course-1", "user-1", dec!(67.49))
    }

    #[test]
    fn test_complete_from_pending() {
        let mut p = pending();
        assert!(p.mark_completed().unwrap());
        assert_eq!(p.status, PurchaseStatus::Completed);
    }

    #[test]
    fn test_complete_is_idempotent() {
        let mut p = pending();
        p.mark_completed().unwrap();
        assert!(!p.mark_completed().unwrap());
        assert_eq!(p.status, PurchaseStatus::Completed);
    }

    #[test]
    fn test_complete_after_failed_is_rejected() {
        let mut p = pending();
        p.mark_failed().unwrap();
        assert!(matches!(
            p.mark_completed(),
            Err(SettlementError::InvalidState(_))
        ));
    }

    #[test]
    fn test_fail_after_completed_is_rejected() {
        let mut p = pending();
        p.mark_completed().unwrap();
        assert!(matches!(
            p.mark_failed(),
            Err(SettlementError::InvalidState(_))
        ));
    }

    #[test]
    fn test_fail_is_idempotent() {
        let mut p = pending();
        p.mark_failed().unwrap();
        assert!(!p.mark_failed().unwrap());
    }

    #[test]
    fn test_amount_is_frozen_at_creation() {
        let p = pending();
        assert_eq!(p.amount, dec!(67.49));
    }

    #[test]
    fn test_expiry_applies_only_to_pending() {
        let mut p = pending();
        p.created_at = Utc::now() - Duration::hours(48);
        assert!(p.is_expired(Utc::now(), Duration::hours(24)));

        p.mark_completed().unwrap();
        assert!(!p.is_expired(Utc::now(), Duration::hours(24)));
    }
}
