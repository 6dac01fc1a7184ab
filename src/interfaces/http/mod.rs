//! HTTP surface: the provider's webhook endpoint and the administration actions.

mod administration;
mod webhook;

use crate::application::administration::AdministrationService;
use crate::application::dispatcher::WebhookDispatcher;
use crate::domain::ports::SharedConfigReader;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub const WEBHOOK_PATH: &str = "/payment/webhook";
pub const ADMIN_PREFIX: &str = "/api/_action/payment";

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<WebhookDispatcher>,
    pub config_reader: SharedConfigReader,
    pub administration: Arc<AdministrationService>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            WEBHOOK_PATH,
            post(webhook::execute).get(webhook::execute),
        )
        .route(
            &format!("{ADMIN_PREFIX}/validate-credentials"),
            post(administration::validate_credentials),
        )
        .route(
            &format!("{ADMIN_PREFIX}/register-webhooks"),
            post(administration::register_webhooks),
        )
        .route(
            &format!("{ADMIN_PREFIX}/clear-webhooks"),
            post(administration::clear_webhooks),
        )
        .route(
            &format!("{ADMIN_PREFIX}/get-webhooks"),
            post(administration::get_webhooks),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Serves the router until `shutdown` resolves.
pub async fn serve(
    state: AppState,
    addr: SocketAddr,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening for webhooks on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
