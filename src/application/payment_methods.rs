//! Behaviour that differs between the payment methods sharing
//! [`PaymentHandler`](super::payment_handler::PaymentHandler).

use crate::domain::configuration::{BookingMode, Configuration};
use crate::domain::device::DeviceType;

/// How a method lets customers keep their instrument for later checkouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vaulting {
    pub device_type: DeviceType,
    /// Checkout data key of the "remember" checkbox.
    pub remember_key: &'static str,
}

pub trait PaymentMethod: Send + Sync {
    fn name(&self) -> &'static str;

    fn booking_mode(&self, configuration: &Configuration) -> BookingMode;

    /// `None` for methods whose instruments cannot be vaulted.
    fn vaulting(&self) -> Option<Vaulting> {
        None
    }

    /// Whether the charge result holds bank details the customer transfers to.
    fn captures_transfer_info(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CreditCard;

impl CreditCard {
    pub const REMEMBER_KEY: &'static str = "creditCardRemember";
}

impl PaymentMethod for CreditCard {
    fn name(&self) -> &'static str {
        "credit_card"
    }

    fn booking_mode(&self, configuration: &Configuration) -> BookingMode {
        configuration.booking_mode_card
    }

    fn vaulting(&self) -> Option<Vaulting> {
        Some(Vaulting {
            device_type: DeviceType::CreditCard,
            remember_key: Self::REMEMBER_KEY,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Paypal;

impl Paypal {
    pub const REMEMBER_KEY: &'static str = "paypalRemember";
}

impl PaymentMethod for Paypal {
    fn name(&self) -> &'static str {
        "paypal"
    }

    fn booking_mode(&self, configuration: &Configuration) -> BookingMode {
        configuration.booking_mode_paypal
    }

    fn vaulting(&self) -> Option<Vaulting> {
        Some(Vaulting {
            device_type: DeviceType::PaypalAccount,
            remember_key: Self::REMEMBER_KEY,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Prepayment;

impl PaymentMethod for Prepayment {
    fn name(&self) -> &'static str {
        "prepayment"
    }

    fn booking_mode(&self, _configuration: &Configuration) -> BookingMode {
        BookingMode::Charge
    }

    fn captures_transfer_info(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_mode_follows_configuration() {
        let config = Configuration {
            booking_mode_card: BookingMode::Authorize,
            booking_mode_paypal: BookingMode::Charge,
            ..Configuration::new("abc", "priv")
        };

        assert_eq!(CreditCard.booking_mode(&config), BookingMode::Authorize);
        assert_eq!(Paypal.booking_mode(&config), BookingMode::Charge);
        assert_eq!(Prepayment.booking_mode(&config), BookingMode::Charge);
    }

    #[test]
    fn test_prepayment_is_not_vaultable() {
        assert!(Prepayment.vaulting().is_none());
        assert!(Prepayment.captures_transfer_info());
        assert!(!CreditCard.captures_transfer_info());
    }
}
