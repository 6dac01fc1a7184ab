use crate::error::{BridgeError, Result};
use serde::Deserialize;

/// An inbound provider notification.
///
/// Built once per request from the raw body and never modified afterwards.
#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    #[serde(default)]
    event: String,
    public_key: String,
    #[serde(default)]
    retrieve_url: Option<String>,
    #[serde(default)]
    payment_id: Option<String>,
}

impl Webhook {
    /// Parses a webhook from the raw request body.
    ///
    /// A body that is not a JSON object or lacks the `publicKey` field is
    /// rejected as a validation error.
    pub fn from_slice(raw: &[u8]) -> Result<Self> {
        serde_json::from_slice(raw)
            .map_err(|e| BridgeError::Validation(format!("Malformed webhook payload: {}", e)))
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn retrieve_url(&self) -> Option<&str> {
        self.retrieve_url.as_deref()
    }

    /// The payment this notification refers to.
    ///
    /// Falls back to the last path segment of the retrieve URL when the
    /// payload carries no explicit payment id.
    pub fn payment_id(&self) -> Option<&str> {
        if let Some(id) = self.payment_id.as_deref().filter(|id| !id.is_empty()) {
            return Some(id);
        }

        let url = self.retrieve_url.as_deref()?;
        let path = match url.split_once("://") {
            Some((_, rest)) => rest.split_once('/').map(|(_, path)| path)?,
            None => url,
        };

        path.split(['?', '#'])
            .next()?
            .split('/')
            .rev()
            .find(|segment| !segment.is_empty())
    }
}
