use super::AppState;
use crate::application::administration::WebhookSelection;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Admin actions read their parameters leniently: a missing or unreadable body
/// counts as "no parameters" so the action can answer with its own status.
fn parameters<T: DeserializeOwned + Default>(body: &Bytes) -> T {
    if body.is_empty() {
        return T::default();
    }

    serde_json::from_slice(body).unwrap_or_else(|e| {
        debug!(target: "checkout_bridge::admin", error = %e, "Ignoring unreadable request body");
        T::default()
    })
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(super) struct CredentialsRequest {
    #[serde(default)]
    private_key: Option<String>,
    #[serde(default)]
    public_key: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(super) struct SelectionRequest {
    #[serde(default)]
    private_key: Option<String>,
    #[serde(default)]
    selection: Vec<WebhookSelection>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(super) struct PrivateKeyRequest {
    #[serde(default)]
    private_key: Option<String>,
}

pub(super) async fn validate_credentials(
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let request: CredentialsRequest = parameters(&body);
    let status = state
        .administration
        .validate_credentials(request.private_key.as_deref(), request.public_key.as_deref())
        .await;

    let code = StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_REQUEST);
    (code, Json(json!({}))).into_response()
}

pub(super) async fn register_webhooks(
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let request: SelectionRequest = parameters(&body);
    let results = state
        .administration
        .register_webhooks(&request.selection)
        .await;
    Json(results).into_response()
}

pub(super) async fn clear_webhooks(
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let request: SelectionRequest = parameters(&body);
    let results = state
        .administration
        .clear_webhooks(request.private_key.as_deref(), &request.selection)
        .await;
    Json(results).into_response()
}

pub(super) async fn get_webhooks(
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let request: PrivateKeyRequest = parameters(&body);
    match state
        .administration
        .get_webhooks(request.private_key.as_deref())
        .await
    {
        Ok(Some(webhooks)) => Json(webhooks).into_response(),
        Ok(None) => Json(json!({})).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": e.to_string() })),
        )
            .into_response(),
    }
}
