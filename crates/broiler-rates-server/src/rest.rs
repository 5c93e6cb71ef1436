// Copyright 2026 Broiler Rates Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API.
//!
//! `GET /rates/:city` always answers 200; extraction failures travel in the
//! record's `error` field.

use crate::state::AppState;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use broiler_rates::RateRecord;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::Instrument;

/// Build the axum Router with all REST endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/cities", get(cities))
        .route("/rates/:city", get(rates))
        .layer(cors)
        .with_state(state)
}

/// Serve the REST API on `addr` until the listener fails.
pub async fn start(addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("REST API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────

async fn home() -> Json<Value> {
    Json(serde_json::json!({
        "message": "Welcome to the Poultry Rate Scraper API",
        "usage": "Use /rates/{city} to fetch data for any city.",
        "example": "/rates/Lahore",
    }))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.started_at.elapsed().as_secs_f64(),
        "active_sessions": state.engine.renderer().active_sessions(),
    }))
}

async fn cities(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(serde_json::json!({
        "cities": state.engine.config().policy_set.cities(),
    }))
}

async fn rates(
    Path(city): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<RateRecord> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("rates", %request_id, city = %city);
    let record = state.engine.extract(&city).instrument(span).await;
    Json(record)
}
