use crate::{ServiceConfig, ServiceError};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use studio_transport::PREMIUM_PRICE_USD;
use tracing::debug;

/// How long the simulated backend takes to confirm a payment.
pub const CONFIRMATION_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pub client_secret: String,
    pub amount_cents: u64,
    pub currency: String,
}

pub trait PaymentProcessor: Send + Sync {
    fn create_payment_intent(
        &self,
    ) -> impl Future<Output = Result<PaymentIntent, ServiceError>> + Send;

    /// Resolves once the payment is settled from the user's point of view.
    fn confirm_payment(
        &self,
        intent: &PaymentIntent,
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;
}

/// Checkout without a payment backend.
///
/// Intents are minted locally and confirmation always succeeds after
/// [`CONFIRMATION_DELAY`]. A publishable key is still required so an
/// unconfigured build reports checkout as unavailable.
pub struct SimulatedStripe {
    publishable_key: Option<String>,
    confirmation_delay: Duration,
    issued: AtomicU64,
}

impl SimulatedStripe {
    pub fn new(publishable_key: Option<String>) -> Self {
        Self {
            publishable_key: publishable_key.filter(|k| !k.is_empty()),
            confirmation_delay: CONFIRMATION_DELAY,
            issued: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.stripe_publishable_key().map(str::to_string))
    }

    pub fn with_confirmation_delay(mut self, delay: Duration) -> Self {
        self.confirmation_delay = delay;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.publishable_key.is_some()
    }
}

impl PaymentProcessor for SimulatedStripe {
    async fn create_payment_intent(&self) -> Result<PaymentIntent, ServiceError> {
        if !self.is_configured() {
            return Err(ServiceError::ConfigurationMissing("Stripe publishable key"));
        }
        let n = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        let intent = PaymentIntent {
            client_secret: format!("pi_sim_{n:08}_secret"),
            amount_cents: PREMIUM_PRICE_USD * 100,
            currency: "usd".to_string(),
        };
        debug!(client_secret = %intent.client_secret, "Created payment intent");
        Ok(intent)
    }

    async fn confirm_payment(&self, intent: &PaymentIntent) -> Result<(), ServiceError> {
        if !intent.client_secret.starts_with("pi_") {
            return Err(ServiceError::Api {
                service: "Stripe",
                status: 400,
                message: "Invalid client secret".to_string(),
            });
        }
        debug!(client_secret = %intent.client_secret, "Confirming payment");
        tokio::time::sleep(self.confirmation_delay).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_checkout_is_unavailable() {
        let stripe = SimulatedStripe::new(None);
        let err = stripe.create_payment_intent().await.expect_err("no key");
        assert!(err.is_configuration_missing());

        let stripe = SimulatedStripe::new(Some(String::new()));
        assert!(!stripe.is_configured());
    }

    #[tokio::test]
    async fn test_intent_charges_premium_price() {
        let stripe = SimulatedStripe::new(Some("pk_test_1".to_string()));
        let intent = stripe.create_payment_intent().await.expect("intent");

        assert_eq!(intent.amount_cents, 1500);
        assert_eq!(intent.currency, "usd");
        assert!(intent.client_secret.starts_with("pi_sim_"));
    }

    #[tokio::test]
    async fn test_client_secrets_are_unique() {
        let stripe = SimulatedStripe::new(Some("pk_test_1".to_string()));
        let a = stripe.create_payment_intent().await.expect("intent");
        let b = stripe.create_payment_intent().await.expect("intent");
        assert_ne!(a.client_secret, b.client_secret);
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmation_waits_for_delay() {
        let stripe = SimulatedStripe::new(Some("pk_test_1".to_string()));
        let intent = stripe.create_payment_intent().await.expect("intent");

        let started = tokio::time::Instant::now();
        stripe.confirm_payment(&intent).await.expect("confirm");
        assert!(started.elapsed() >= CONFIRMATION_DELAY);
    }

    #[tokio::test]
    async fn test_confirm_rejects_foreign_secret() {
        let stripe = SimulatedStripe::new(Some("pk_test_1".to_string()))
            .with_confirmation_delay(Duration::ZERO);
        let intent = PaymentIntent {
            client_secret: "bogus".to_string(),
            amount_cents: 1500,
            currency: "usd".to_string(),
        };

        let err = stripe.confirm_payment(&intent).await.expect_err("invalid");
        assert!(matches!(err, ServiceError::Api { status: 400, .. }));
    }
}
