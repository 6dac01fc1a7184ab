#![allow(dead_code)]

use async_trait::async_trait;
use checkout_bridge::domain::checkout::{
    Basket, CheckoutData, Customer, PaymentTransaction, SalesChannelContext,
};
use checkout_bridge::domain::configuration::{Configuration, KeyPairConfig};
use checkout_bridge::domain::device::PaymentDevice;
use checkout_bridge::domain::payment::{
    Authorization, Charge, Keypair, Payment, PaymentType, RegisteredWebhook, TransactionRequest,
};
use checkout_bridge::domain::ports::{
    ClientFactory, PaymentDeviceRepository, PaymentProvider, PaymentProviderBox, ProviderResult,
    WebhookContext, WebhookHandler,
};
use checkout_bridge::domain::webhook::Webhook;
use checkout_bridge::error::{BridgeError, ProviderError, Result};
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

pub const PUBLIC_KEY: &str = "s-pub-main";
pub const PRIVATE_KEY: &str = "s-priv-main";
pub const INSTALLMENT_PUBLIC_KEY: &str = "s-pub-installment";
pub const INSTALLMENT_PRIVATE_KEY: &str = "s-priv-installment";

/// A channel configuration with one entry in every pay-later collection.
pub fn configuration() -> Configuration {
    let pair = |name: &str| KeyPairConfig {
        key: "b2c-eur".to_string(),
        public_key: format!("s-pub-{name}"),
        private_key: format!("s-priv-{name}"),
    };

    Configuration {
        paylater_invoice: vec![pair("invoice")],
        paylater_installment: vec![pair("installment")],
        paylater_direct_debit_secured: vec![pair("dds")],
        ..Configuration::new(PUBLIC_KEY, PRIVATE_KEY)
    }
}

pub fn transaction() -> PaymentTransaction {
    PaymentTransaction {
        order_id: "order-100".to_string(),
        order_transaction_id: "order-tx-100".to_string(),
        return_url: "https://shop.example.com/payment/finalize-transaction".to_string(),
    }
}

pub fn checkout(type_id: &str) -> CheckoutData {
    CheckoutData::new(
        Some(PaymentType::new(type_id)),
        Basket {
            total_value_gross: dec!(119.00),
            currency: "EUR".to_string(),
        },
    )
}

pub fn customer_context(guest: bool) -> SalesChannelContext {
    SalesChannelContext::new("storefront").with_customer(Customer {
        id: "customer-1".to_string(),
        guest,
    })
}

pub fn webhook_body(event: &str, public_key: &str, payment_id: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "event": event,
        "publicKey": public_key,
        "retrieveUrl": format!("https://sandbox.example.com/v1/payments/{payment_id}"),
        "paymentId": payment_id,
    }))
    .unwrap()
}

/// Handler that records its executions in a shared journal.
pub struct RecordingHandler {
    pub name: &'static str,
    pub events: Vec<&'static str>,
    pub fails: bool,
    pub journal: Arc<Mutex<Vec<&'static str>>>,
}

impl RecordingHandler {
    pub fn boxed(
        name: &'static str,
        events: &[&'static str],
        fails: bool,
        journal: &Arc<Mutex<Vec<&'static str>>>,
    ) -> Box<dyn WebhookHandler> {
        Box::new(Self {
            name,
            events: events.to_vec(),
            fails,
            journal: journal.clone(),
        })
    }
}

#[async_trait]
impl WebhookHandler for RecordingHandler {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports(&self, webhook: &Webhook, _context: &WebhookContext<'_>) -> bool {
        self.events.contains(&webhook.event())
    }

    async fn execute(&self, _webhook: &Webhook, _context: &WebhookContext<'_>) -> Result<()> {
        self.journal.lock().unwrap().push(self.name);
        if self.fails {
            return Err(BridgeError::Provider(ProviderError::new(
                "API.310.100.003",
                "Payment not found",
            )));
        }
        Ok(())
    }
}

/// Provider whose every call is rejected.
#[derive(Clone, Default)]
pub struct RejectingClientFactory;

struct RejectingClient;

fn declined() -> ProviderError {
    ProviderError::new("API.360.000.001", "The card has been declined")
}

#[async_trait]
impl PaymentProvider for RejectingClient {
    async fn charge(&self, _request: TransactionRequest) -> ProviderResult<Charge> {
        Err(declined())
    }

    async fn authorize(&self, _request: TransactionRequest) -> ProviderResult<Authorization> {
        Err(declined())
    }

    async fn fetch_payment(&self, _payment_id: &str) -> ProviderResult<Payment> {
        Err(declined())
    }

    async fn fetch_keypair(&self) -> ProviderResult<Keypair> {
        Err(declined())
    }

    async fn register_webhook(&self, _url: &str, _event: &str) -> ProviderResult<RegisteredWebhook> {
        Err(declined())
    }

    async fn fetch_webhooks(&self) -> ProviderResult<Vec<RegisteredWebhook>> {
        Err(declined())
    }

    async fn delete_webhooks(&self) -> ProviderResult<()> {
        Err(declined())
    }
}

impl ClientFactory for RejectingClientFactory {
    fn create_client(&self, _private_key: &str) -> Result<PaymentProviderBox> {
        Ok(Box::new(RejectingClient))
    }
}

/// Device repository whose storage backend is unavailable.
pub struct BrokenDeviceRepository;

#[async_trait]
impl PaymentDeviceRepository for BrokenDeviceRepository {
    async fn create(&self, _device: PaymentDevice) -> Result<()> {
        Err(BridgeError::Storage("connection refused".to_string()))
    }

    async fn exists(&self, _type_id: &str) -> Result<bool> {
        Err(BridgeError::Storage("connection refused".to_string()))
    }

    async fn get_by_customer(&self, _customer_id: &str) -> Result<Vec<PaymentDevice>> {
        Err(BridgeError::Storage("connection refused".to_string()))
    }
}

/// A log line captured from `tracing`.
#[derive(Debug, Clone)]
pub struct CapturedLog {
    pub level: tracing::Level,
    pub message: String,
    pub kind: Option<String>,
}

/// A tracing layer that captures events for assertions.
pub struct LogCapture {
    logs: Arc<Mutex<Vec<CapturedLog>>>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        struct Visitor {
            message: String,
            kind: Option<String>,
        }

        impl tracing::field::Visit for Visitor {
            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                match field.name() {
                    "kind" => self.kind = Some(value.to_string()),
                    "message" => self.message = value.to_string(),
                    _ => {}
                }
            }

            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.message = format!("{:?}", value);
                }
            }
        }

        let mut visitor = Visitor {
            message: String::new(),
            kind: None,
        };
        event.record(&mut visitor);

        self.logs.lock().unwrap().push(CapturedLog {
            level: *event.metadata().level(),
            message: visitor.message,
            kind: visitor.kind,
        });
    }
}

/// Installs a capturing subscriber for the current thread.
///
/// Keep the guard alive for as long as events should be captured.
pub fn capture_logs() -> (tracing::subscriber::DefaultGuard, Arc<Mutex<Vec<CapturedLog>>>) {
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let logs = Arc::new(Mutex::new(Vec::new()));
    let guard = tracing_subscriber::registry()
        .with(LogCapture { logs: logs.clone() })
        .set_default();
    (guard, logs)
}
