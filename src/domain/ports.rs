use super::checkout::{SalesChannelContext, TransactionState};
use super::configuration::Configuration;
use super::device::PaymentDevice;
use super::payment::{
    Authorization, Charge, Keypair, Payment, RegisteredWebhook, TransactionRequest,
};
use super::transfer_information::TransferInformation;
use super::webhook::Webhook;
use crate::error::{ProviderError, Result};
use async_trait::async_trait;
use std::sync::Arc;

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Client for the payment provider's API, bound to one private key.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn charge(&self, request: TransactionRequest) -> ProviderResult<Charge>;
    async fn authorize(&self, request: TransactionRequest) -> ProviderResult<Authorization>;
    async fn fetch_payment(&self, payment_id: &str) -> ProviderResult<Payment>;
    async fn fetch_keypair(&self) -> ProviderResult<Keypair>;
    async fn register_webhook(&self, url: &str, event: &str) -> ProviderResult<RegisteredWebhook>;
    async fn fetch_webhooks(&self) -> ProviderResult<Vec<RegisteredWebhook>>;
    async fn delete_webhooks(&self) -> ProviderResult<()>;
}

pub type PaymentProviderBox = Box<dyn PaymentProvider>;

/// Builds provider clients for a given private key.
pub trait ClientFactory: Send + Sync {
    fn create_client(&self, private_key: &str) -> Result<PaymentProviderBox>;
}

/// The host platform's order transaction state machine.
#[async_trait]
pub trait TransactionStateHandler: Send + Sync {
    async fn current_state(&self, order_transaction_id: &str) -> Result<Option<TransactionState>>;
    async fn transition(&self, order_transaction_id: &str, state: TransactionState) -> Result<()>;

    async fn fail(&self, order_transaction_id: &str) -> Result<()> {
        self.transition(order_transaction_id, TransactionState::Failed)
            .await
    }
}

#[async_trait]
pub trait TransferInfoRepository: Send + Sync {
    async fn create(&self, transaction_id: &str, info: TransferInformation) -> Result<()>;
    async fn get(&self, transaction_id: &str) -> Result<Option<TransferInformation>>;
}

#[async_trait]
pub trait PaymentDeviceRepository: Send + Sync {
    async fn create(&self, device: PaymentDevice) -> Result<()>;
    /// Whether an instrument with the given provider id is already vaulted.
    async fn exists(&self, type_id: &str) -> Result<bool>;
    async fn get_by_customer(&self, customer_id: &str) -> Result<Vec<PaymentDevice>>;
}

/// Per-sales-channel configuration store.
#[async_trait]
pub trait ConfigReader: Send + Sync {
    async fn read(&self, sales_channel_id: &str) -> Result<Configuration>;
}

/// What a webhook handler gets to see besides the webhook itself.
#[derive(Debug, Clone, Copy)]
pub struct WebhookContext<'a> {
    pub sales_channel: &'a SalesChannelContext,
    pub configuration: &'a Configuration,
}

/// A reaction to one or more kinds of provider notifications.
#[async_trait]
pub trait WebhookHandler: Send + Sync {
    /// Identifies the handler in logs.
    fn name(&self) -> &'static str;

    fn supports(&self, webhook: &Webhook, context: &WebhookContext<'_>) -> bool;

    async fn execute(&self, webhook: &Webhook, context: &WebhookContext<'_>) -> Result<()>;
}

pub type WebhookHandlerBox = Box<dyn WebhookHandler>;
pub type SharedClientFactory = Arc<dyn ClientFactory>;
pub type SharedStateHandler = Arc<dyn TransactionStateHandler>;
pub type SharedTransferInfoRepository = Arc<dyn TransferInfoRepository>;
pub type SharedPaymentDeviceRepository = Arc<dyn PaymentDeviceRepository>;
pub type SharedConfigReader = Arc<dyn ConfigReader>;
