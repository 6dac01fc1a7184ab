use crate::domain::payment::RegisteredWebhook;
use crate::domain::ports::SharedClientFactory;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{error, info, warn};

/// Event subscription used when registering the shop's webhook endpoint.
pub const ALL_EVENTS: &str = "all";

const MISSING_SELECTION: &str = "webhook.missing.selection";

/// Result of checking a key pair against the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStatus {
    Valid,
    /// The provider rejected the private key or returned a different public key.
    Invalid,
    MissingKeys,
}

impl CredentialStatus {
    pub fn as_u16(self) -> u16 {
        match self {
            CredentialStatus::Valid => 200,
            CredentialStatus::Invalid => 400,
            CredentialStatus::MissingKeys => 412,
        }
    }
}

/// A sales channel the merchant selected in the administration.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSelection {
    pub private_key: String,
    pub sales_channel_id: String,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
}

impl ActionResult {
    fn new(success: bool, message: &str) -> Self {
        Self {
            success,
            message: message.to_string(),
        }
    }
}

/// Per sales channel outcome, keyed by sales channel id.
pub type ActionResults = BTreeMap<String, ActionResult>;

fn missing_selection() -> ActionResults {
    BTreeMap::from([(
        "missing".to_string(),
        ActionResult::new(false, MISSING_SELECTION),
    )])
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Backs the administration actions for credentials and webhook registration.
pub struct AdministrationService {
    client_factory: SharedClientFactory,
}

impl AdministrationService {
    pub fn new(client_factory: SharedClientFactory) -> Self {
        Self { client_factory }
    }

    pub async fn validate_credentials(
        &self,
        private_key: Option<&str>,
        public_key: Option<&str>,
    ) -> CredentialStatus {
        let (Some(private_key), Some(public_key)) = (present(private_key), present(public_key))
        else {
            return CredentialStatus::MissingKeys;
        };

        let status = match self.client_factory.create_client(private_key) {
            Ok(client) => match client.fetch_keypair().await {
                Ok(keypair) if keypair.public_key == public_key => CredentialStatus::Valid,
                Ok(_) => CredentialStatus::Invalid,
                Err(e) => {
                    warn!(target: "checkout_bridge::admin", error = %e, "Keypair could not be fetched");
                    CredentialStatus::Invalid
                }
            },
            Err(e) => {
                warn!(target: "checkout_bridge::admin", error = %e, "Provider client could not be created");
                CredentialStatus::Invalid
            }
        };

        if status == CredentialStatus::Valid {
            info!(target: "checkout_bridge::admin", "API credentials test passed!");
        } else {
            error!(target: "checkout_bridge::admin", "API credentials test failed!");
        }

        status
    }

    /// Registers the shop's webhook URL for every selected sales channel.
    ///
    /// Failures are reported per sales channel instead of aborting the batch.
    pub async fn register_webhooks(&self, selection: &[WebhookSelection]) -> ActionResults {
        if selection.is_empty() {
            return missing_selection();
        }

        let mut results = ActionResults::new();
        for entry in selection {
            let outcome = match self.client_factory.create_client(&entry.private_key) {
                Ok(client) => client
                    .register_webhook(&entry.url, ALL_EVENTS)
                    .await
                    .map(|_| ())
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };

            let result = match outcome {
                Ok(()) => ActionResult::new(true, "webhook.register.done"),
                Err(e) => {
                    warn!(
                        target: "checkout_bridge::admin",
                        sales_channel_id = %entry.sales_channel_id,
                        url = %entry.url,
                        error = %e,
                        "Webhook registration failed"
                    );
                    ActionResult::new(false, "webhook.register.failure")
                }
            };
            results.insert(entry.sales_channel_id.clone(), result);
        }

        results
    }

    /// Removes every webhook registered for `private_key`.
    pub async fn clear_webhooks(
        &self,
        private_key: Option<&str>,
        selection: &[WebhookSelection],
    ) -> ActionResults {
        let Some(private_key) = present(private_key) else {
            return missing_selection();
        };
        if selection.is_empty() {
            return missing_selection();
        }

        let outcome = match self.client_factory.create_client(private_key) {
            Ok(client) => client.delete_webhooks().await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        let result = match outcome {
            Ok(()) => ActionResult::new(true, "webhook.clear.done"),
            Err(e) => {
                warn!(target: "checkout_bridge::admin", error = %e, "Webhooks could not be cleared");
                ActionResult::new(false, "webhook.clear.failure")
            }
        };

        selection
            .iter()
            .map(|entry| (entry.sales_channel_id.clone(), result.clone()))
            .collect()
    }

    /// Webhooks registered for `private_key`, or `None` when no key was given.
    pub async fn get_webhooks(
        &self,
        private_key: Option<&str>,
    ) -> Result<Option<Vec<RegisteredWebhook>>> {
        let Some(private_key) = present(private_key) else {
            return Ok(None);
        };

        let client = self.client_factory.create_client(private_key)?;
        Ok(Some(client.fetch_webhooks().await?))
    }
}
