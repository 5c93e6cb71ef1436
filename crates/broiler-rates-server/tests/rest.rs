// Copyright 2026 Broiler Rates Contributors
// SPDX-License-Identifier: Apache-2.0

//! REST API tests: the router is driven in-process with `oneshot`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use assert_json_diff::assert_json_eq;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use broiler_rates::{
    EngineConfig, NoopRenderer, RenderElement, RenderError, RenderSession, Renderer,
};
use broiler_rates_server::state::{build_engine, AppState};
use broiler_rates_server::router;
use serde_json::{json, Value};
use tower::ServiceExt;

// ─────────────────────── helpers ───────────────────────

/// Every page renders the same rates on first read.
struct StaticRenderer {
    today: &'static str,
    yesterday: &'static str,
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl Renderer for StaticRenderer {
    async fn open(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        Ok(Box::new(StaticSession {
            today: self.today,
            yesterday: self.yesterday,
            closed: Arc::clone(&self.closed),
        }))
    }

    fn active_sessions(&self) -> usize {
        0
    }
}

struct StaticSession {
    today: &'static str,
    yesterday: &'static str,
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl RenderSession for StaticSession {
    async fn navigate(&mut self, _url: &str, _timeout: Duration) -> Result<(), RenderError> {
        Ok(())
    }

    async fn find(&self, locator: &str) -> Result<Box<dyn RenderElement>, RenderError> {
        let text = if locator.contains("Today") {
            self.today
        } else {
            self.yesterday
        };
        Ok(Box::new(Text(text)))
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct Text(&'static str);

#[async_trait]
impl RenderElement for Text {
    async fn text(&self) -> Result<String, RenderError> {
        Ok(self.0.to_string())
    }
}

fn app_with(renderer: Arc<dyn Renderer>) -> axum::Router {
    let engine = build_engine(renderer, EngineConfig::default());
    router(Arc::new(AppState::new(engine)))
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ─────────────────────── tests ───────────────────────

#[tokio::test]
async fn test_home_describes_usage() {
    let (status, body) = get_json(app_with(Arc::new(NoopRenderer)), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_json_eq!(
        body,
        json!({
            "message": "Welcome to the Poultry Rate Scraper API",
            "usage": "Use /rates/{city} to fetch data for any city.",
            "example": "/rates/Lahore"
        })
    );
}

#[tokio::test]
async fn test_rates_returns_record() {
    let closed = Arc::new(AtomicUsize::new(0));
    let renderer = Arc::new(StaticRenderer {
        today: "Announced Rate Rs. 350",
        yesterday: "Announced Rate Rs. 340",
        closed: Arc::clone(&closed),
    });

    let (status, body) = get_json(app_with(renderer), "/rates/Lahore").await;

    assert_eq!(status, StatusCode::OK);
    assert_json_eq!(
        body,
        json!({ "city": "Lahore", "today": "350", "yesterday": "340", "error": null })
    );
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_rates_decodes_path_and_normalizes() {
    let renderer = Arc::new(StaticRenderer {
        today: "Rs. 361",
        yesterday: "Rs. 358",
        closed: Arc::new(AtomicUsize::new(0)),
    });

    let (_, body) = get_json(app_with(renderer), "/rates/dera%20ghazi%20KHAN").await;

    assert_eq!(body["city"], "Dera Ghazi Khan");
    assert_eq!(body["today"], "361");
}

#[tokio::test]
async fn test_failure_is_still_ok_status() {
    let (status, body) = get_json(app_with(Arc::new(NoopRenderer)), "/rates/UnknownTown").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], "Unknowntown");
    assert!(body["today"].is_null());
    assert!(body["yesterday"].is_null());
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("browser launch failed"));
}

#[tokio::test]
async fn test_health_and_cities() {
    let (status, health) = get_json(app_with(Arc::new(NoopRenderer)), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["active_sessions"], 0);

    let (_, cities) = get_json(app_with(Arc::new(NoopRenderer)), "/cities").await;
    let list = cities["cities"].as_array().unwrap();
    assert_eq!(list.len(), 45);
    assert!(list.contains(&json!("Lahore")));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = app_with(Arc::new(NoopRenderer))
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
