use super::AppState;
use crate::application::dispatcher::{WebhookDispatcher, WebhookStatus};
use crate::domain::checkout::SalesChannelContext;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::error;

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(super) struct WebhookQuery {
    #[serde(default)]
    sales_channel_id: Option<String>,
}

fn status_code(status: WebhookStatus) -> StatusCode {
    match status {
        WebhookStatus::Ok => StatusCode::OK,
        WebhookStatus::BadRequest => StatusCode::BAD_REQUEST,
        WebhookStatus::Forbidden => StatusCode::FORBIDDEN,
    }
}

/// Provider webhook endpoint. Server-to-server, so there is no CSRF protection
/// and the response body is always empty.
pub(super) async fn execute(
    State(state): State<AppState>,
    Query(query): Query<WebhookQuery>,
    body: Bytes,
) -> StatusCode {
    let sales_channel = SalesChannelContext::new(query.sales_channel_id.unwrap_or_default());

    let configuration = match state
        .config_reader
        .read(&sales_channel.sales_channel_id)
        .await
    {
        Ok(configuration) => configuration,
        Err(e) => {
            error!(
                target: "checkout_bridge::webhook",
                sales_channel_id = %sales_channel.sales_channel_id,
                error = %e,
                "No configuration to validate the webhook against"
            );
            // Without credentials no key can match.
            return match WebhookDispatcher::parse(&body) {
                Ok(_) => StatusCode::FORBIDDEN,
                Err(status) => status_code(status),
            };
        }
    };

    status_code(
        state
            .dispatcher
            .handle(&body, &configuration, &sales_channel)
            .await,
    )
}
