//! HTTP surface for the account ledger.
//!
//! Exposes upload, listing, search, detail and transfer endpoints as an axum
//! router returning JSON. Uploads are parsed and persisted on the blocking
//! pool; other handlers call the synchronous core directly, and every store
//! operation holds its row locks only for the duration of the call. Extractor
//! rejections are reported through the same JSON error body.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::*;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServiceConfig;
use crate::core::{AccountStore, Ingestor, TransferEngine};

/// Shared state handed to every handler
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub ingestor: Ingestor,
    pub engine: TransferEngine,
}

impl AppState {
    /// Wire the ingestion pipeline and the transfer engine to one store
    pub fn new(store: Arc<dyn AccountStore>, config: &ServiceConfig) -> Self {
        Self {
            ingestor: Ingestor::new(store.clone(), config.ingestion.clone()),
            engine: TransferEngine::new(store.clone(), config.transfer.clone()),
            store,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/accounts/upload", post(handlers::upload_accounts))
        .route("/accounts/list", get(handlers::list_accounts))
        .route("/accounts/search", get(handlers::search_accounts))
        .route("/accounts/details/{id}", get(handlers::account_details))
        .route("/accounts/transfer/{id}", get(handlers::transfer_form))
        .route(
            "/accounts/transfer",
            get(handlers::transfer_query).post(handlers::transfer_form_submit),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Serve the router on `bind` until Ctrl-C is received
///
/// # Errors
///
/// Returns the I/O error if the address cannot be bound or the server fails.
pub async fn serve(state: AppState, bind: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(address = %listener.local_addr()?, "Account ledger listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            error!(error = %e, "Cannot listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
