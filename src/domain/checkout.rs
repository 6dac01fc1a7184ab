use super::payment::PaymentType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The host's description of the transaction being paid.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentTransaction {
    pub order_id: String,
    pub order_transaction_id: String,
    pub return_url: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Customer {
    pub id: String,
    pub guest: bool,
}

/// Per-request context of the sales channel a request arrived on.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct SalesChannelContext {
    pub sales_channel_id: String,
    pub customer: Option<Customer>,
}

impl SalesChannelContext {
    pub fn new(sales_channel_id: impl Into<String>) -> Self {
        Self {
            sales_channel_id: sales_channel_id.into(),
            customer: None,
        }
    }

    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customer = Some(customer);
        self
    }
}

/// Basket totals as hydrated for the provider.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Basket {
    pub total_value_gross: Decimal,
    pub currency: String,
}

/// Everything the storefront submitted with the checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutData {
    /// The provider resource the storefront created for the chosen
    /// instrument. Absent when hydration failed.
    pub payment_type: Option<PaymentType>,
    pub basket: Basket,
    flags: HashSet<String>,
}

impl CheckoutData {
    pub fn new(payment_type: Option<PaymentType>, basket: Basket) -> Self {
        Self {
            payment_type,
            basket,
            flags: HashSet::new(),
        }
    }

    /// Sets a checkbox-style flag from the submitted data bag.
    pub fn with_flag(mut self, key: impl Into<String>) -> Self {
        self.flags.insert(key.into());
        self
    }

    pub fn has(&self, key: &str) -> bool {
        self.flags.contains(key)
    }
}

/// States of the host's order transaction state machine this crate drives.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionState {
    Open,
    InProgress,
    Authorized,
    Paid,
    PaidPartially,
    Cancelled,
    Chargeback,
    Failed,
}
