use crate::domain::ports::{CheckoutGateway, CheckoutRequest, CheckoutSession};
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Stand-in for a hosted payment processor.
///
/// Produces a session id and redirect URL shaped like a real hosted checkout,
/// with the purchase id threaded through the success URL the same way the
/// processor's metadata would carry it. Production deployments implement
/// [`CheckoutGateway`] against the real processor; everything else in the
/// service is indifferent to which one is wired in.
#[derive(Clone)]
pub struct StubCheckoutGateway {
    base_url: String,
}

impl StubCheckoutGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }
}

#[async_trait]
impl CheckoutGateway for StubCheckoutGateway {
    async fn create_session(&self, request: CheckoutRequest) -> Result<CheckoutSession> {
        let session_id = format!("cs_{}", Uuid::new_v4().simple());
        let redirect_url = format!(
            "{}/{}?amount={}&currency={}&success_url={}/payment-success%3Fsession_id%3D{}%26purchase_id%3D{}",
            self.base_url,
            session_id,
            request.amount,
            request.currency,
            request.origin,
            session_id,
            request.purchase_id,
        );
        Ok(CheckoutSession {
            session_id,
            redirect_url,
        })
    }
}
