use thiserror::Error;

/// An error reported by the payment provider's API.
///
/// Carries the provider's error code together with the message meant for
/// the merchant (logs) and the one that may be shown to the customer.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("provider error {code}: {merchant_message}")]
pub struct ProviderError {
    pub code: String,
    pub merchant_message: String,
    pub client_message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, merchant_message: impl Into<String>) -> Self {
        let merchant_message = merchant_message.into();
        Self {
            code: code.into(),
            client_message: merchant_message.clone(),
            merchant_message,
        }
    }
}

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for BridgeError {
    fn from(err: rocksdb::Error) -> Self {
        BridgeError::Storage(err.to_string())
    }
}

/// Errors surfaced to the host platform when a checkout payment cannot proceed.
#[derive(Error, Debug)]
pub enum PaymentProcessError {
    /// The asynchronous payment process was interrupted. The host keeps
    /// control over the order transaction state.
    #[error("The asynchronous payment process was interrupted for transaction {order_transaction_id}: {message}")]
    AsyncProcessInterrupted {
        order_transaction_id: String,
        message: String,
    },
    /// The provider rejected the payment. The order transaction has already
    /// been moved to the failed state.
    #[error("Payment for order {order_id} (transaction {order_transaction_id}) failed at the provider: {source}")]
    ProviderProcess {
        order_id: String,
        order_transaction_id: String,
        #[source]
        source: ProviderError,
    },
}

impl PaymentProcessError {
    pub fn order_transaction_id(&self) -> &str {
        match self {
            Self::AsyncProcessInterrupted {
                order_transaction_id,
                ..
            }
            | Self::ProviderProcess {
                order_transaction_id,
                ..
            } => order_transaction_id,
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
