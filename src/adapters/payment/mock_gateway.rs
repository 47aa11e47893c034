//! Mock payment gateway.
//!
//! Hands out deterministic session URLs under configured bases instead of
//! talking to a payment provider. Supports:
//! - Call tracking
//! - Error injection

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::foundation::{ProfileId, Timestamp};
use crate::ports::{CheckoutRequest, CheckoutSession, PaymentError, PaymentGateway, PortalSession};

/// Checkout sessions expire after this many minutes.
const CHECKOUT_TTL_MINUTES: i64 = 30;

/// Mock payment gateway for development and tests.
///
/// # Example
///
/// ```ignore
/// let gateway = MockPaymentGateway::new("https://pay.example.com/checkout", "https://pay.example.com/portal");
///
/// // Inject errors
/// gateway.fail_next(PaymentError::network("provider down"));
///
/// let result = gateway.create_checkout_session(request).await;
/// ```
#[derive(Debug, Clone)]
pub struct MockPaymentGateway {
    checkout_base_url: String,
    portal_base_url: String,
    inner: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<GatewayCall>,

    sequence: u64,
}

/// Recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Checkout(CheckoutRequest),
    Portal { profile_id: ProfileId, return_url: String },
}

impl MockPaymentGateway {
    pub fn new(checkout_base_url: impl Into<String>, portal_base_url: impl Into<String>) -> Self {
        Self {
            checkout_base_url: checkout_base_url.into(),
            portal_base_url: portal_base_url.into(),
            inner: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Makes the next call fail with `error`.
    pub fn fail_next(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// All calls made so far, oldest first.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state().call_log.clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records the call, then either fails or returns the next session id.
    fn record(&self, call: GatewayCall) -> Result<u64, PaymentError> {
        let mut state = self.state();
        state.call_log.push(call);
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        state.sequence += 1;
        Ok(state.sequence)
    }
}

fn session_url(base: &str, session_id: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), session_id)
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        if request.success_url.is_empty() || request.cancel_url.is_empty() {
            return Err(PaymentError::invalid_request(
                "success and cancel urls are required",
            ));
        }
        let seq = self.record(GatewayCall::Checkout(request.clone()))?;

        let id = format!("cs_mock_{}_{seq}", request.profile_id);
        let expires_at = Timestamp::from_datetime(
            *Timestamp::now().as_datetime() + Duration::minutes(CHECKOUT_TTL_MINUTES),
        );
        Ok(CheckoutSession {
            url: format!(
                "{}?plan={}",
                session_url(&self.checkout_base_url, &id),
                request.plan
            ),
            id,
            expires_at,
        })
    }

    async fn create_portal_session(
        &self,
        profile_id: &ProfileId,
        return_url: &str,
    ) -> Result<PortalSession, PaymentError> {
        let seq = self.record(GatewayCall::Portal {
            profile_id: profile_id.clone(),
            return_url: return_url.to_string(),
        })?;

        let id = format!("bps_mock_{profile_id}_{seq}");
        Ok(PortalSession {
            url: session_url(&self.portal_base_url, &id),
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Plan;

    fn gateway() -> MockPaymentGateway {
        MockPaymentGateway::new("https://pay.test/checkout/", "https://pay.test/portal")
    }

    fn request(profile_id: &ProfileId) -> CheckoutRequest {
        CheckoutRequest {
            profile_id: profile_id.clone(),
            plan: Plan::Monthly,
            success_url: "https://app.test/ok".into(),
            cancel_url: "https://app.test/cancel".into(),
        }
    }

    #[tokio::test]
    async fn checkout_url_is_under_base_and_keyed_by_profile() {
        let gateway = gateway();
        let profile_id = ProfileId::new("p1").unwrap();

        let session = gateway
            .create_checkout_session(request(&profile_id))
            .await
            .unwrap();

        assert_eq!(session.id, "cs_mock_p1_1");
        assert_eq!(
            session.url,
            "https://pay.test/checkout/cs_mock_p1_1?plan=monthly"
        );
        assert!(session.expires_at.is_after(&Timestamp::now()));
        assert_eq!(gateway.calls(), vec![GatewayCall::Checkout(request(&profile_id))]);
    }

    #[tokio::test]
    async fn portal_session_records_call() {
        let gateway = gateway();
        let profile_id = ProfileId::new("p1").unwrap();

        let session = gateway
            .create_portal_session(&profile_id, "https://app.test/dashboard")
            .await
            .unwrap();

        assert_eq!(session.url, "https://pay.test/portal/bps_mock_p1_1");
        assert_eq!(gateway.calls().len(), 1);
    }

    #[tokio::test]
    async fn injected_error_fails_once() {
        let gateway = gateway();
        let profile_id = ProfileId::new("p1").unwrap();
        gateway.fail_next(PaymentError::network("down"));

        let err = gateway
            .create_checkout_session(request(&profile_id))
            .await
            .unwrap_err();
        assert!(err.retryable);

        assert!(gateway
            .create_checkout_session(request(&profile_id))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn checkout_requires_redirect_urls() {
        let gateway = gateway();
        let mut req = request(&ProfileId::new("p1").unwrap());
        req.success_url.clear();

        let err = gateway.create_checkout_session(req).await.unwrap_err();
        assert_eq!(err.code, crate::ports::PaymentErrorCode::InvalidRequest);
        assert!(gateway.calls().is_empty());
    }
}
