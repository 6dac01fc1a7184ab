//! In-process stand-in for the payment provider.
//!
//! Behaves like the provider's sandbox environment closely enough to drive
//! the checkout and webhook flows locally and in tests: payments are kept in
//! memory and private keys must be registered before they are accepted.

use crate::domain::payment::{
    Authorization, Charge, Keypair, Payment, PaymentState, RegisteredWebhook, TransactionRequest,
};
use crate::domain::ports::{ClientFactory, PaymentProvider, PaymentProviderBox, ProviderResult};
use crate::error::{BridgeError, ProviderError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Payment type ids with this prefix belong to prepayment instruments.
const PREPAYMENT_PREFIX: &str = "s-ppy";

#[derive(Default)]
struct SandboxState {
    /// private key -> public key
    keypairs: HashMap<String, String>,
    payments: HashMap<String, Payment>,
    webhooks: HashMap<String, Vec<RegisteredWebhook>>,
    requests: Vec<TransactionRequest>,
    sequence: u64,
}

impl SandboxState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.sequence += 1;
        format!("{}-{}", prefix, self.sequence)
    }
}

#[derive(Default, Clone)]
pub struct SandboxClientFactory {
    state: Arc<Mutex<SandboxState>>,
}

impl SandboxClientFactory {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SandboxState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn register_keypair(&self, private_key: impl Into<String>, public_key: impl Into<String>) {
        self.lock()
            .keypairs
            .insert(private_key.into(), public_key.into());
    }

    /// Makes a payment known to the sandbox, replacing one with the same id.
    pub fn insert_payment(&self, payment: Payment) {
        self.lock().payments.insert(payment.id.clone(), payment);
    }

    pub fn payment_for_order(&self, order_id: &str) -> Option<Payment> {
        self.lock()
            .payments
            .values()
            .find(|payment| payment.order_id == order_id)
            .cloned()
    }

    /// The most recent charge or authorization request.
    pub fn last_request(&self) -> Option<TransactionRequest> {
        self.lock().requests.last().cloned()
    }
}

impl ClientFactory for SandboxClientFactory {
    fn create_client(&self, private_key: &str) -> Result<PaymentProviderBox> {
        if private_key.is_empty() {
            return Err(BridgeError::Configuration(
                "A private key is required to create a provider client".to_string(),
            ));
        }

        Ok(Box::new(SandboxClient {
            private_key: private_key.to_string(),
            state: self.state.clone(),
        }))
    }
}

struct SandboxClient {
    private_key: String,
    state: Arc<Mutex<SandboxState>>,
}

impl SandboxClient {
    /// Locks the sandbox after checking that the client's key is known.
    fn authenticated(&self) -> ProviderResult<MutexGuard<'_, SandboxState>> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if !state.keypairs.contains_key(&self.private_key) {
            return Err(ProviderError::new(
                "API.320.000.004",
                "Access denied: the private key is invalid",
            ));
        }
        Ok(state)
    }
}

fn redirect_url(request: &TransactionRequest, payment_id: &str) -> String {
    format!("{}?paymentId={}", request.return_url, payment_id)
}

#[async_trait]
impl PaymentProvider for SandboxClient {
    async fn charge(&self, request: TransactionRequest) -> ProviderResult<Charge> {
        let mut state = self.authenticated()?;
        let payment_id = state.next_id("s-pay");
        let prepayment = request.payment_type_id.starts_with(PREPAYMENT_PREFIX);

        let charge = Charge {
            id: state.next_id("s-chg"),
            amount: request.amount,
            currency: request.currency.clone(),
            iban: prepayment.then(|| "DE89370400440532013000".to_string()),
            bic: prepayment.then(|| "COBADEFFXXX".to_string()),
            holder: prepayment.then(|| "Sandbox Merchant".to_string()),
            descriptor: prepayment.then(|| format!("{}.{}", state.sequence, request.order_id)),
            redirect_url: Some(redirect_url(&request, &payment_id)),
        };

        let payment = Payment {
            id: payment_id,
            order_id: request.order_id.clone(),
            state: if prepayment {
                PaymentState::Pending
            } else {
                PaymentState::Completed
            },
            authorization: None,
            charges: vec![charge.clone()],
        };
        state.payments.insert(payment.id.clone(), payment);
        state.requests.push(request);

        Ok(charge)
    }

    async fn authorize(&self, request: TransactionRequest) -> ProviderResult<Authorization> {
        let mut state = self.authenticated()?;
        let payment_id = state.next_id("s-pay");

        let authorization = Authorization {
            id: state.next_id("s-aut"),
            amount: request.amount,
            currency: request.currency.clone(),
            redirect_url: Some(redirect_url(&request, &payment_id)),
        };

        let payment = Payment {
            id: payment_id,
            order_id: request.order_id.clone(),
            state: PaymentState::Pending,
            authorization: Some(authorization.clone()),
            charges: vec![],
        };
        state.payments.insert(payment.id.clone(), payment);
        state.requests.push(request);

        Ok(authorization)
    }

    async fn fetch_payment(&self, payment_id: &str) -> ProviderResult<Payment> {
        let state = self.authenticated()?;
        state.payments.get(payment_id).cloned().ok_or_else(|| {
            ProviderError::new("API.310.100.003", format!("Payment {} not found", payment_id))
        })
    }

    async fn fetch_keypair(&self) -> ProviderResult<Keypair> {
        let state = self.authenticated()?;
        let public_key = state
            .keypairs
            .get(&self.private_key)
            .cloned()
            .unwrap_or_default();
        Ok(Keypair { public_key })
    }

    async fn register_webhook(&self, url: &str, event: &str) -> ProviderResult<RegisteredWebhook> {
        let mut state = self.authenticated()?;
        let id = state.next_id("s-whk");
        let registered = state.webhooks.entry(self.private_key.clone()).or_default();

        if let Some(existing) = registered
            .iter()
            .find(|webhook| webhook.url == url && webhook.event == event)
        {
            return Ok(existing.clone());
        }

        let webhook = RegisteredWebhook {
            id,
            url: url.to_string(),
            event: event.to_string(),
        };
        registered.push(webhook.clone());
        Ok(webhook)
    }

    async fn fetch_webhooks(&self) -> ProviderResult<Vec<RegisteredWebhook>> {
        let state = self.authenticated()?;
        Ok(state
            .webhooks
            .get(&self.private_key)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_webhooks(&self) -> ProviderResult<()> {
        let mut state = self.authenticated()?;
        state.webhooks.remove(&self.private_key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(payment_type_id: &str) -> TransactionRequest {
        TransactionRequest {
            amount: dec!(12.50),
            currency: "EUR".to_string(),
            return_url: "https://shop.example.com/finalize".to_string(),
            payment_type_id: payment_type_id.to_string(),
            order_id: "tx-1".to_string(),
            recurrence_type: None,
        }
    }

    #[tokio::test]
    async fn test_unknown_private_key_is_rejected() {
        let factory = SandboxClientFactory::new();
        let client = factory.create_client("s-priv-unknown").unwrap();

        let err = client.charge(request("s-crd-1")).await.unwrap_err();
        assert_eq!(err.code, "API.320.000.004");
        assert!(factory.create_client("").is_err());
    }

    #[tokio::test]
    async fn test_prepayment_charge_carries_bank_details() {
        let factory = SandboxClientFactory::new();
        factory.register_keypair("s-priv-1", "s-pub-1");
        let client = factory.create_client("s-priv-1").unwrap();

        let charge = client.charge(request("s-ppy-1")).await.unwrap();
        assert!(charge.iban.is_some());

        let card = client.charge(request("s-crd-1")).await.unwrap();
        assert!(card.iban.is_none());
        assert!(card.redirect_url.unwrap().contains("paymentId=s-pay-"));
    }

    #[tokio::test]
    async fn test_fetch_charged_payment() {
        let factory = SandboxClientFactory::new();
        factory.register_keypair("s-priv-1", "s-pub-1");
        let client = factory.create_client("s-priv-1").unwrap();

        client.charge(request("s-crd-1")).await.unwrap();
        let stored = factory.payment_for_order("tx-1").unwrap();
        let fetched = client.fetch_payment(&stored.id).await.unwrap();

        assert_eq!(fetched.state, PaymentState::Completed);
        assert!(client.fetch_payment("s-pay-missing").await.is_err());
    }
}
