use crate::domain::checkout::SalesChannelContext;
use crate::domain::configuration::Configuration;
use crate::domain::ports::{WebhookContext, WebhookHandlerBox};
use crate::domain::webhook::Webhook;
use tracing::{debug, error};

/// Outcome of a webhook delivery as reported back to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookStatus {
    Ok,
    BadRequest,
    Forbidden,
}

impl WebhookStatus {
    pub fn as_u16(self) -> u16 {
        match self {
            WebhookStatus::Ok => 200,
            WebhookStatus::BadRequest => 400,
            WebhookStatus::Forbidden => 403,
        }
    }
}

/// Validates inbound webhooks and fans them out to the registered handlers.
///
/// Handlers run in registration order. Once the public key has been accepted
/// the delivery is always acknowledged, even when handlers fail: the provider
/// redelivers on non-2xx responses, which does not help with failures on our side.
pub struct WebhookDispatcher {
    handlers: Vec<WebhookHandlerBox>,
}

impl WebhookDispatcher {
    pub fn new(handlers: Vec<WebhookHandlerBox>) -> Self {
        Self { handlers }
    }

    /// Checks the raw body and parses it into a [`Webhook`].
    pub fn parse(raw_body: &[u8]) -> Result<Webhook, WebhookStatus> {
        if raw_body.is_empty() {
            error!(
                target: "checkout_bridge::webhook",
                "The webhook was not executed due to missing data."
            );
            return Err(WebhookStatus::BadRequest);
        }

        Webhook::from_slice(raw_body).map_err(|e| {
            error!(
                target: "checkout_bridge::webhook",
                error = %e,
                "The webhook was not executed due to a malformed payload."
            );
            WebhookStatus::BadRequest
        })
    }

    pub async fn handle(
        &self,
        raw_body: &[u8],
        configuration: &Configuration,
        sales_channel: &SalesChannelContext,
    ) -> WebhookStatus {
        let webhook = match Self::parse(raw_body) {
            Ok(webhook) => webhook,
            Err(status) => return status,
        };

        if !configuration.is_valid_public_key(webhook.public_key()) {
            error!(
                target: "checkout_bridge::webhook",
                sales_channel_id = %sales_channel.sales_channel_id,
                event = webhook.event(),
                "The provided public key does not match the configured public key"
            );
            return WebhookStatus::Forbidden;
        }

        let context = WebhookContext {
            sales_channel,
            configuration,
        };

        for handler in &self.handlers {
            if !handler.supports(&webhook, &context) {
                continue;
            }

            debug!(
                target: "checkout_bridge::webhook",
                handler = handler.name(),
                content = %String::from_utf8_lossy(raw_body),
                "Started handling of incoming webhook"
            );

            if let Err(e) = handler.execute(&webhook, &context).await {
                error!(
                    target: "checkout_bridge::webhook",
                    handler = handler.name(),
                    event = webhook.event(),
                    payment_id = webhook.payment_id().unwrap_or_default(),
                    sales_channel_id = %sales_channel.sales_channel_id,
                    error = %e,
                    details = ?e,
                    "An error was caught when handling a webhook, but this may not be a failure."
                );
            }
        }

        WebhookStatus::Ok
    }
}
