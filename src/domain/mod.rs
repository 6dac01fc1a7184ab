//! Domain types and the ports through which the crate reaches the provider
//! and the host platform.

pub mod checkout;
pub mod configuration;
pub mod device;
pub mod payment;
pub mod ports;
pub mod transfer_information;
pub mod webhook;
