use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a payment is settled immediately or only held.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingMode {
    #[default]
    Charge,
    Authorize,
}

/// A named credential set used by one of the pay-later product variants.
#[derive(Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct KeyPairConfig {
    /// Variant discriminator, e.g. the customer type and currency the keys apply to.
    #[serde(default)]
    pub key: String,
    pub public_key: String,
    #[serde(default)]
    pub private_key: String,
}

impl fmt::Debug for KeyPairConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPairConfig")
            .field("key", &self.key)
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Per-sales-channel credential bundle.
///
/// Read once per request from the configuration store and treated as an
/// immutable snapshot.
#[derive(Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub public_key: String,
    #[serde(default)]
    pub private_key: String,
    #[serde(default)]
    pub booking_mode_card: BookingMode,
    #[serde(default)]
    pub booking_mode_paypal: BookingMode,
    #[serde(default)]
    pub paylater_invoice: Vec<KeyPairConfig>,
    #[serde(default)]
    pub paylater_installment: Vec<KeyPairConfig>,
    #[serde(default)]
    pub paylater_direct_debit_secured: Vec<KeyPairConfig>,
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .field("booking_mode_card", &self.booking_mode_card)
            .field("booking_mode_paypal", &self.booking_mode_paypal)
            .field("paylater_invoice", &self.paylater_invoice)
            .field("paylater_installment", &self.paylater_installment)
            .field(
                "paylater_direct_debit_secured",
                &self.paylater_direct_debit_secured,
            )
            .finish()
    }
}

impl Configuration {
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
            ..Self::default()
        }
    }

    /// All pay-later sub-configurations, in the order they are checked.
    pub fn sub_configurations(&self) -> impl Iterator<Item = &KeyPairConfig> {
        self.paylater_invoice
            .iter()
            .chain(self.paylater_installment.iter())
            .chain(self.paylater_direct_debit_secured.iter())
    }

    /// Returns true if `public_key` is the primary key or belongs to any
    /// pay-later sub-configuration. A blank key never matches, even against a
    /// blank configured entry.
    pub fn is_valid_public_key(&self, public_key: &str) -> bool {
        self.private_key_for(public_key).is_some()
    }

    /// The private key matching `public_key`, used to talk to the provider on
    /// behalf of whichever credential set a webhook was sent for.
    pub fn private_key_for(&self, public_key: &str) -> Option<&str> {
        if public_key.is_empty() {
            return None;
        }

        if public_key == self.public_key {
            return Some(self.private_key.as_str());
        }

        self.sub_configurations()
            .find(|pair| pair.public_key == public_key)
            .map(|pair| pair.private_key.as_str())
    }
}
