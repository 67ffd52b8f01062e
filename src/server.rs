//! HTTP front end.
//!
//! `POST /` with `{"text": "<word>"}` answers `{"value": ..., "lexical": ...}`
//! and stores the word. Invalid words get `400`, store failures `500`.
//! Bodies that are not a JSON match request keep axum's rejection status but
//! use the same `{"error": ...}` body.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use log::{error, info};
use serde_json::json;

use crate::error::{NearwordError, Result};
use crate::service::{MatchRequest, handle_request};
use crate::store::Store;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;

/// Build the router serving `store`.
pub fn router(store: Arc<Store>) -> Router {
    Router::new()
        .route("/", post(handle_match))
        .with_state(store)
}

pub async fn handle_match(
    State(store): State<Arc<Store>>,
    payload: std::result::Result<Json<MatchRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return error_response(rejection.status(), &rejection.body_text()),
    };

    // Log appends are blocking file I/O.
    let outcome = tokio::task::spawn_blocking(move || handle_request(&store, &request)).await;

    match outcome {
        Ok(Ok(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(Err(e @ NearwordError::InvalidWord(_))) => error_response(StatusCode::BAD_REQUEST, &e),
        Ok(Err(e)) => {
            error!("request failed: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e)
        }
        Err(join_error) => {
            error!("request task failed: {join_error}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &join_error)
        }
    }
}

fn error_response(status: StatusCode, e: &dyn std::fmt::Display) -> Response {
    (status, Json(json!({ "error": format!("Failed due to: {e}") }))).into_response()
}

/// Serve `store` on `addr` until Ctrl+C, then close the store.
pub async fn serve(store: Arc<Store>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(store.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutting down");
    store.close()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}
