//! Webhook handlers registered with the
//! [`WebhookDispatcher`](super::dispatcher::WebhookDispatcher).
//!
//! Deliveries can arrive twice or out of order, so handlers always act on the
//! payment as the provider currently reports it rather than on the event name.

use super::transfer_info::save_transfer_info;
use crate::domain::checkout::TransactionState;
use crate::domain::payment::{Payment, PaymentState};
use crate::domain::ports::{
    SharedClientFactory, SharedStateHandler, SharedTransferInfoRepository, WebhookContext,
    WebhookHandler,
};
use crate::domain::transfer_information::TransferInformation;
use crate::domain::webhook::Webhook;
use crate::error::{BridgeError, Result};
use async_trait::async_trait;
use tracing::{debug, info};

const PAYMENT_EVENT_PREFIX: &str = "payment.";
const PAYMENT_EVENTS: [&str; 6] = [
    "completed",
    "canceled",
    "partly",
    "pending",
    "chargeback",
    "payment_review",
];

async fn fetch_payment(
    client_factory: &SharedClientFactory,
    webhook: &Webhook,
    context: &WebhookContext<'_>,
) -> Result<Payment> {
    let payment_id = webhook.payment_id().ok_or_else(|| {
        BridgeError::Validation(format!(
            "Webhook {} does not reference a payment",
            webhook.event()
        ))
    })?;

    let private_key = context
        .configuration
        .private_key_for(webhook.public_key())
        .ok_or_else(|| {
            BridgeError::Configuration("No private key configured for the webhook".to_string())
        })?;

    let client = client_factory.create_client(private_key)?;
    Ok(client.fetch_payment(payment_id).await?)
}

/// Host transaction state matching the provider's payment state.
pub fn target_state(payment: &Payment) -> TransactionState {
    match payment.state {
        PaymentState::Completed => TransactionState::Paid,
        PaymentState::PartlyPaid => TransactionState::PaidPartially,
        PaymentState::Canceled => TransactionState::Cancelled,
        PaymentState::Chargeback => TransactionState::Chargeback,
        PaymentState::PaymentReview => TransactionState::InProgress,
        PaymentState::Pending if payment.is_authorized_only() => TransactionState::Authorized,
        PaymentState::Pending => TransactionState::Open,
    }
}

/// Keeps the host's order transaction state in line with the payment.
pub struct TransactionStateWebhookHandler {
    client_factory: SharedClientFactory,
    state_handler: SharedStateHandler,
}

impl TransactionStateWebhookHandler {
    pub fn new(client_factory: SharedClientFactory, state_handler: SharedStateHandler) -> Self {
        Self {
            client_factory,
            state_handler,
        }
    }
}

#[async_trait]
impl WebhookHandler for TransactionStateWebhookHandler {
    fn name(&self) -> &'static str {
        "transaction_state"
    }

    fn supports(&self, webhook: &Webhook, _context: &WebhookContext<'_>) -> bool {
        webhook
            .event()
            .strip_prefix(PAYMENT_EVENT_PREFIX)
            .is_some_and(|suffix| PAYMENT_EVENTS.contains(&suffix))
    }

    async fn execute(&self, webhook: &Webhook, context: &WebhookContext<'_>) -> Result<()> {
        let payment = fetch_payment(&self.client_factory, webhook, context).await?;
        let target = target_state(&payment);

        let current = self.state_handler.current_state(&payment.order_id).await?;
        if current == Some(target) {
            debug!(
                target: "checkout_bridge::webhook",
                order_transaction_id = %payment.order_id,
                state = ?target,
                "Order transaction is already in the target state"
            );
            return Ok(());
        }

        self.state_handler
            .transition(&payment.order_id, target)
            .await?;

        info!(
            target: "checkout_bridge::webhook",
            order_transaction_id = %payment.order_id,
            payment_id = %payment.id,
            from = ?current,
            to = ?target,
            "Order transaction state updated"
        );
        Ok(())
    }
}

/// Records the bank details of bank-transfer charges once they are booked.
pub struct TransferInfoWebhookHandler {
    client_factory: SharedClientFactory,
    repository: SharedTransferInfoRepository,
}

impl TransferInfoWebhookHandler {
    pub fn new(client_factory: SharedClientFactory, repository: SharedTransferInfoRepository) -> Self {
        Self {
            client_factory,
            repository,
        }
    }
}

#[async_trait]
impl WebhookHandler for TransferInfoWebhookHandler {
    fn name(&self) -> &'static str {
        "transfer_info"
    }

    fn supports(&self, webhook: &Webhook, _context: &WebhookContext<'_>) -> bool {
        matches!(webhook.event(), "charge.succeeded" | "payment.pending")
    }

    async fn execute(&self, webhook: &Webhook, context: &WebhookContext<'_>) -> Result<()> {
        let payment = fetch_payment(&self.client_factory, webhook, context).await?;

        let Some(charge) = payment
            .first_charge()
            .filter(|charge| TransferInformation::is_available_for(charge))
        else {
            debug!(
                target: "checkout_bridge::webhook",
                payment_id = %payment.id,
                "Payment carries no transfer information"
            );
            return Ok(());
        };

        if self.repository.get(&payment.order_id).await?.is_some() {
            return Ok(());
        }

        save_transfer_info(self.repository.as_ref(), &payment.order_id, charge).await?;
        Ok(())
    }
}
