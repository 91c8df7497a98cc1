use super::enrollment::EnrollmentApplier;
use super::ledger::PurchaseLedger;
use crate::domain::ports::{CheckoutGatewayRef, CheckoutRequest, CourseStoreRef, UserStoreRef};
use crate::domain::purchase::{Purchase, PurchaseStatus};
use crate::error::{Result, SettlementError};
use chrono::{Duration, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

/// What `initiate` hands back to the client: where to send the buyer, and
/// the ledger id to correlate the eventual completion with.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutHandle {
    pub purchase_id: Uuid,
    pub redirect_url: String,
}

/// Distinguishes a settlement that just happened from an idempotent replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    Completed,
    AlreadyCompleted,
}

/// Orchestrates the two-phase purchase flow.
///
/// `initiate` and `complete` arrive as separate requests, possibly minutes
/// apart, with the browser carrying the purchase id between them; the
/// purchase record is the only durable checkpoint. Enrollment is granted on
/// confirmed completion only, never optimistically at checkout time.
#[derive(Clone)]
pub struct SettlementCoordinator {
    ledger: PurchaseLedger,
    applier: EnrollmentApplier,
    users: UserStoreRef,
    courses: CourseStoreRef,
    gateway: CheckoutGatewayRef,
    currency: String,
    pending_ttl: Option<Duration>,
}

impl SettlementCoordinator {
    pub fn new(
        ledger: PurchaseLedger,
        applier: EnrollmentApplier,
        users: UserStoreRef,
        courses: CourseStoreRef,
        gateway: CheckoutGatewayRef,
        currency: impl Into<String>,
        pending_ttl: Option<Duration>,
    ) -> Self {
        Self {
            ledger,
            applier,
            users,
            courses,
            gateway,
            currency: currency.into(),
            pending_ttl,
        }
    }

    /// Opens a checkout: validates the buyer and course, records a `pending`
    /// purchase at the current effective price, and asks the payment
    /// processor for a hosted session tagged with the purchase id.
    ///
    /// A processor failure must not leave an actionable `pending` record, so
    /// the purchase is marked `failed` before the error is surfaced.
    pub async fn initiate(
        &self,
        user_id: &str,
        course_id: &str,
        origin: &str,
    ) -> Result<CheckoutHandle> {
        if self.users.get(user_id).await?.is_none() {
            return Err(SettlementError::not_found("Data Not Found"));
        }
        let course = self
            .courses
            .get(course_id)
            .await?
            .ok_or_else(|| SettlementError::not_found("Data Not Found"))?;

        let amount = course.effective_price();
        let purchase = self.ledger.create_pending(course_id, user_id, amount).await?;

        let request = CheckoutRequest {
            purchase_id: purchase.id,
            amount,
            currency: self.currency.clone(),
            product_name: course.title.clone(),
            origin: origin.to_owned(),
        };
        let session = match self.gateway.create_session(request).await {
            Ok(session) => session,
            Err(err) => {
                if let Err(mark_err) = self.ledger.mark_failed(purchase.id).await {
                    error!(purchase_id = %purchase.id, error = %mark_err,
                        "could not fail purchase after gateway error");
                }
                return Err(err);
            }
        };

        info!(purchase_id = %purchase.id, user_id, course_id, %amount,
            session_id = %session.session_id, "checkout initiated");
        Ok(CheckoutHandle {
            purchase_id: purchase.id,
            redirect_url: session.redirect_url,
        })
    }

    /// Settles a purchase: applies enrollment, then marks the record
    /// `completed`.
    ///
    /// Safe to re-invoke from any trigger. A replay against a completed
    /// purchase returns without touching the gateway or the enrollment sets;
    /// a crash between the enrollment writes and the status write converges
    /// on retry because every individual step is idempotent.
    pub async fn complete(
        &self,
        purchase_id: Uuid,
        caller_user_id: &str,
    ) -> Result<SettlementOutcome> {
        let purchase = self.ledger.get(purchase_id).await?;
        self.authorize(&purchase, caller_user_id)?;

        match purchase.status {
            PurchaseStatus::Completed => {
                info!(%purchase_id, "purchase already completed, replay ignored");
                return Ok(SettlementOutcome::AlreadyCompleted);
            }
            PurchaseStatus::Failed => {
                return Err(SettlementError::invalid_state("Purchase already failed"));
            }
            PurchaseStatus::Pending => {}
        }

        match self.expire_if_stale(&purchase).await? {
            Some(PurchaseStatus::Completed) => {
                info!(%purchase_id, "purchase settled concurrently, replay ignored");
                return Ok(SettlementOutcome::AlreadyCompleted);
            }
            Some(_) => {
                return Err(SettlementError::invalid_state(
                    "Purchase expired before completion",
                ));
            }
            None => {}
        }

        if self.users.get(&purchase.user_id).await?.is_none()
            || self.courses.get(&purchase.course_id).await?.is_none()
        {
            return Err(SettlementError::not_found("User or Course not found"));
        }

        // Enrollment strictly before the status write: if we crash in
        // between, the purchase stays pending and a retry re-runs both
        // idempotent steps.
        self.applier
            .enroll(&purchase.user_id, &purchase.course_id)
            .await?;
        self.ledger.mark_completed(purchase_id).await?;

        info!(%purchase_id, user_id = %purchase.user_id,
            course_id = %purchase.course_id, "purchase settled");
        Ok(SettlementOutcome::Completed)
    }

    /// Read-only status check with the same ownership guard as `complete`.
    pub async fn check_status(
        &self,
        purchase_id: Uuid,
        caller_user_id: &str,
    ) -> Result<PurchaseStatus> {
        let purchase = self.ledger.get(purchase_id).await?;
        self.authorize(&purchase, caller_user_id)?;

        if let Some(status) = self.expire_if_stale(&purchase).await? {
            return Ok(status);
        }
        Ok(purchase.status)
    }

    fn authorize(&self, purchase: &Purchase, caller_user_id: &str) -> Result<()> {
        if purchase.user_id != caller_user_id {
            return Err(SettlementError::unauthorized("Unauthorized"));
        }
        Ok(())
    }

    /// Expiry-on-read for abandoned checkouts: a pending purchase older than
    /// the TTL is failed the next time anything loads it.
    ///
    /// Returns the purchase's effective status when expiry applied, `None`
    /// when the purchase was not stale. The expiry write can lose a race to
    /// a concurrent completion; the terminal-state guard rejects it and the
    /// fresh status wins.
    async fn expire_if_stale(&self, purchase: &Purchase) -> Result<Option<PurchaseStatus>> {
        let Some(ttl) = self.pending_ttl else {
            return Ok(None);
        };
        if !purchase.is_expired(Utc::now(), ttl) {
            return Ok(None);
        }
        warn!(purchase_id = %purchase.id, "pending purchase expired, marking failed");
        match self.ledger.mark_failed(purchase.id).await {
            Ok(_) => Ok(Some(PurchaseStatus::Failed)),
            Err(SettlementError::InvalidState(_)) => {
                Ok(Some(self.ledger.get(purchase.id).await?.status))
            }
            Err(err) => Err(err),
        }
    }
}
