//! StartCheckoutHandler and OpenBillingPortalHandler - Paywall redirects.
//!
//! Both ask the payment gateway for a hosted page keyed by profile id. The
//! resulting subscription status reaches the profile out-of-band.

use std::sync::Arc;

use crate::application::client::CompatClient;
use crate::application::session::fetch_profile;
use crate::domain::foundation::ProfileId;
use crate::domain::profile::SubscriptionStatus;
use crate::ports::{CheckoutRequest, CheckoutSession, PaymentGateway, Plan, PortalSession};

use super::ProfileError;

/// Command to start a subscription checkout.
#[derive(Debug, Clone)]
pub struct StartCheckoutCommand {
    pub profile_id: ProfileId,
    pub plan: Plan,
    pub success_url: String,
    pub cancel_url: String,
}

/// Handler for the subscription step's "subscribe" button.
pub struct StartCheckoutHandler {
    client: CompatClient,
    gateway: Arc<dyn PaymentGateway>,
}

impl StartCheckoutHandler {
    pub fn new(client: CompatClient, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { client, gateway }
    }

    pub async fn handle(&self, cmd: StartCheckoutCommand) -> Result<CheckoutSession, ProfileError> {
        // 1. The profile must exist; the gateway only sees its id
        let profile = fetch_profile(&self.client, &cmd.profile_id).await?;

        // 2. Ask for a hosted checkout page
        let session = self
            .gateway
            .create_checkout_session(CheckoutRequest {
                profile_id: profile.id,
                plan: cmd.plan,
                success_url: cmd.success_url,
                cancel_url: cmd.cancel_url,
            })
            .await?;

        tracing::info!(profile_id = %cmd.profile_id, session_id = %session.id, "Checkout session created");
        Ok(session)
    }
}

/// Command to open the billing portal.
#[derive(Debug, Clone)]
pub struct OpenBillingPortalCommand {
    pub profile_id: ProfileId,
    pub return_url: String,
}

/// Handler for the dashboard's "manage subscription" link.
pub struct OpenBillingPortalHandler {
    client: CompatClient,
    gateway: Arc<dyn PaymentGateway>,
}

impl OpenBillingPortalHandler {
    pub fn new(client: CompatClient, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { client, gateway }
    }

    pub async fn handle(
        &self,
        cmd: OpenBillingPortalCommand,
    ) -> Result<PortalSession, ProfileError> {
        let profile = fetch_profile(&self.client, &cmd.profile_id).await?;
        if profile.subscription_status == SubscriptionStatus::Inactive {
            return Err(ProfileError::not_found(format!(
                "subscription for profile '{}'",
                cmd.profile_id
            )));
        }

        Ok(self
            .gateway
            .create_portal_session(&profile.id, &cmd.return_url)
            .await?)
    }
}
