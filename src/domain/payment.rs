//! Resources exchanged with the payment provider.
//!
//! These mirror the shapes the provider's API returns. The crate never
//! constructs them on its own except through a provider client.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A payment instrument previously created on the provider side
/// (a tokenized card, a PayPal account, a prepayment type...).
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentType {
    pub id: String,
}

impl PaymentType {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Marks a transaction as using a registered instrument.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    OneClick,
}

/// Input for a charge or an authorization.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TransactionRequest {
    pub amount: Decimal,
    pub currency: String,
    pub return_url: String,
    pub payment_type_id: String,
    pub order_id: String,
    pub recurrence_type: Option<RecurrenceType>,
}

/// Result of an immediate settlement.
///
/// Bank-transfer based methods fill in the account the customer has to pay to.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Charge {
    pub id: String,
    pub amount: Decimal,
    pub currency: String,
    pub iban: Option<String>,
    pub bic: Option<String>,
    pub holder: Option<String>,
    pub descriptor: Option<String>,
    pub redirect_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Authorization {
    pub id: String,
    pub amount: Decimal,
    pub currency: String,
    pub redirect_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    Pending,
    Completed,
    Canceled,
    PartlyPaid,
    PaymentReview,
    Chargeback,
}

/// The provider's view of a payment and the transactions booked on it.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Payment {
    pub id: String,
    /// The host order transaction this payment was created for.
    pub order_id: String,
    pub state: PaymentState,
    pub authorization: Option<Authorization>,
    #[serde(default)]
    pub charges: Vec<Charge>,
}

impl Payment {
    pub fn first_charge(&self) -> Option<&Charge> {
        self.charges.first()
    }

    /// A payment that has only been authorized so far.
    pub fn is_authorized_only(&self) -> bool {
        self.authorization.is_some() && self.charges.is_empty()
    }
}

/// Key pair information the provider returns for a private key.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Keypair {
    pub public_key: String,
}

/// A webhook subscription registered on the provider side.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct RegisteredWebhook {
    pub id: String,
    pub url: String,
    pub event: String,
}
