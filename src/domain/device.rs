use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    CreditCard,
    PaypalAccount,
}

/// A vaulted payment instrument belonging to a customer.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentDevice {
    pub customer_id: String,
    pub device_type: DeviceType,
    /// The provider-side id of the tokenized instrument.
    pub type_id: String,
}

impl PaymentDevice {
    pub fn new(customer_id: impl Into<String>, device_type: DeviceType, type_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            device_type,
            type_id: type_id.into(),
        }
    }
}
