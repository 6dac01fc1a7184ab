//! Application layer orchestrating the checkout and webhook flows.
//!
//! `WebhookDispatcher` validates inbound notifications and fans them out to the
//! handlers in `webhook_handlers`. `PaymentHandler` drives a checkout payment for
//! one `PaymentMethod`. Shared steps live in small helper modules that take
//! their collaborators as arguments.

pub mod administration;
pub mod device_vault;
pub mod dispatcher;
pub mod payment_handler;
pub mod payment_methods;
pub mod transfer_info;
pub mod webhook_handlers;
