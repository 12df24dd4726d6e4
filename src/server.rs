//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api::{self, VerifySettings};
use crate::error::{ApiError, ConfigError};
use crate::models::AppConfig;
use crate::services::{Clock, SystemClock, UrlSigner, Verifier};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub signer: Arc<UrlSigner>,
    pub verifier: Arc<Verifier>,
    pub clock: Arc<dyn Clock>,
}

/// Create application state from configuration, reading the system clock.
pub fn create_app_state(config: &AppConfig) -> Result<AppState, ConfigError> {
    create_app_state_with_clock(config, Arc::new(SystemClock))
}

/// Create application state with an explicit clock shared by signer and
/// verifier.
pub fn create_app_state_with_clock(
    config: &AppConfig,
    clock: Arc<dyn Clock>,
) -> Result<AppState, ConfigError> {
    let signer_config = config.signer_config()?;
    let verifier = Arc::new(Verifier::from_config(
        &signer_config,
        config.max_skew_seconds,
    ));

    let mut signer = UrlSigner::new(signer_config).with_shared_clock(clock.clone());
    if let Some(resolver) = config.resolver() {
        tracing::info!(resources = resolver.len(), "Static resolver configured");
        signer = signer.with_resolver(resolver);
    }

    Ok(AppState {
        signer: Arc::new(signer),
        verifier,
        clock,
    })
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/sign", get(handle_sign))
        .route("/api/verify", get(handle_verify))
        // Forward-auth endpoint for nginx auth_request / traefik forwardAuth
        .route("/auth", get(handle_auth))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn verify_settings(state: &AppState) -> VerifySettings {
    VerifySettings {
        verifier: state.verifier.clone(),
        clock: state.clock.clone(),
        param_name: Arc::from(state.signer.config().param_name()),
    }
}

// Wrapper handlers to extract state components for the underlying API handlers

async fn handle_sign(
    axum::extract::State(state): axum::extract::State<AppState>,
    query: axum::extract::Query<Vec<(String, String)>>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    api::handle_sign(axum::extract::State(state.signer), query).await
}

async fn handle_verify(
    axum::extract::State(state): axum::extract::State<AppState>,
    query: axum::extract::Query<api::verify::VerifyQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    api::handle_verify(axum::extract::State(verify_settings(&state)), query).await
}

async fn handle_auth(
    axum::extract::State(state): axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> Result<axum::http::StatusCode, ApiError> {
    api::handle_auth(axum::extract::State(verify_settings(&state)), headers).await
}
