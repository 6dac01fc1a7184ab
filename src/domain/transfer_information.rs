use super::payment::Charge;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Bank account details a customer needs to settle a bank-transfer charge.
///
/// Captured once from a successful charge and never changed afterwards.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TransferInformation {
    iban: Option<String>,
    bic: Option<String>,
    holder: Option<String>,
    descriptor: Option<String>,
    amount: Decimal,
}

impl TransferInformation {
    /// Copies the account details verbatim and rounds the amount half-up to
    /// two decimal places.
    pub fn from_charge(charge: &Charge) -> Self {
        Self {
            iban: charge.iban.clone(),
            bic: charge.bic.clone(),
            holder: charge.holder.clone(),
            descriptor: charge.descriptor.clone(),
            amount: charge
                .amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        }
    }

    pub fn iban(&self) -> Option<&str> {
        self.iban.as_deref()
    }

    pub fn bic(&self) -> Option<&str> {
        self.bic.as_deref()
    }

    pub fn holder(&self) -> Option<&str> {
        self.holder.as_deref()
    }

    pub fn descriptor(&self) -> Option<&str> {
        self.descriptor.as_deref()
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// A charge carries transfer details when the customer has an account to pay to.
    pub fn is_available_for(charge: &Charge) -> bool {
        charge.iban.is_some()
    }
}
