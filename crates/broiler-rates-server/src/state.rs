// Copyright 2026 Broiler Rates Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared handler state, built once at startup.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use broiler_rates::renderer::chromium::ChromiumRenderer;
use broiler_rates::{EngineConfig, ExtractionEngine, NoopRenderer, Renderer};
use tracing::{info, warn};

pub struct AppState {
    pub engine: Arc<ExtractionEngine>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(engine: Arc<ExtractionEngine>) -> Self {
        Self {
            engine,
            started_at: Instant::now(),
        }
    }
}

/// Chromium when available, otherwise a renderer that reports the missing
/// browser on every request.
pub fn build_renderer(chromium_path: Option<PathBuf>) -> Arc<dyn Renderer> {
    match ChromiumRenderer::new(chromium_path) {
        Ok(renderer) => {
            info!("Chromium renderer initialized: {}", renderer.chrome_path().display());
            Arc::new(renderer)
        }
        Err(e) => {
            warn!("Failed to initialize Chromium: {e}");
            warn!("Every extraction will report a launch error");
            Arc::new(NoopRenderer)
        }
    }
}

pub fn build_engine(renderer: Arc<dyn Renderer>, config: EngineConfig) -> Arc<ExtractionEngine> {
    Arc::new(ExtractionEngine::new(renderer, config))
}
