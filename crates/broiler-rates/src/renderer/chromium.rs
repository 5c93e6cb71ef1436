// Copyright 2026 Broiler Rates Contributors
// SPDX-License-Identifier: Apache-2.0

//! Chromium-based renderer using chromiumoxide.
//!
//! Each session launches its own headless browser process with a private
//! profile directory, so concurrent extractions never share state.

use super::{RenderElement, RenderSession, Renderer};
use crate::error::RenderError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Env var overriding Chromium discovery.
pub const CHROMIUM_PATH_ENV: &str = "BROILER_CHROMIUM_PATH";

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. BROILER_CHROMIUM_PATH env
    if let Ok(p) = std::env::var(CHROMIUM_PATH_ENV) {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. System PATH
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 3. Common macOS location
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Chromium-based renderer. Holds only the binary path; browsers are
/// launched per session.
pub struct ChromiumRenderer {
    chrome_path: PathBuf,
    active_count: Arc<AtomicUsize>,
    next_profile: AtomicU64,
}

impl ChromiumRenderer {
    /// Use an explicit binary, or discover one with [`find_chromium`].
    pub fn new(explicit: Option<PathBuf>) -> Result<Self, RenderError> {
        let chrome_path = explicit
            .filter(|p| p.exists())
            .or_else(find_chromium)
            .ok_or_else(|| {
                RenderError::Launch(format!(
                    "Chromium not found; install Chrome or set {CHROMIUM_PATH_ENV}"
                ))
            })?;

        Ok(Self {
            chrome_path,
            active_count: Arc::new(AtomicUsize::new(0)),
            next_profile: AtomicU64::new(0),
        })
    }

    pub fn chrome_path(&self) -> &std::path::Path {
        &self.chrome_path
    }

    fn profile_dir(&self) -> PathBuf {
        let n = self.next_profile.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("broiler-rates-{}-{n}", std::process::id()))
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn open(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        let profile_dir = self.profile_dir();

        let config = BrowserConfig::builder()
            .chrome_executable(&self.chrome_path)
            .user_data_dir(&profile_dir)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(|e| RenderError::Launch(format!("failed to build browser config: {e}")))?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        // Spawn the handler task
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                // The browser is already running; tear it down before bailing.
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler_task.abort();
                let _ = tokio::fs::remove_dir_all(&profile_dir).await;
                return Err(RenderError::Launch(format!(
                    "failed to create new page: {e}"
                )));
            }
        };

        self.active_count.fetch_add(1, Ordering::Relaxed);
        debug!(profile = %profile_dir.display(), "chromium session opened");

        Ok(Box::new(ChromiumSession {
            browser,
            page,
            handler_task,
            profile_dir,
            active_count: Arc::clone(&self.active_count),
        }))
    }

    fn active_sessions(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }
}

/// A single headless browser with one page.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    profile_dir: PathBuf,
    active_count: Arc<AtomicUsize>,
}

#[async_trait]
impl RenderSession for ChromiumSession {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), RenderError> {
        let result = tokio::time::timeout(timeout, self.page.goto(url)).await;

        // goto resolves once the navigation has committed and loaded.
        match result {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(RenderError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(RenderError::Navigation {
                url: url.to_string(),
                reason: format!("timed out after {}ms", timeout.as_millis()),
            }),
        }
    }

    async fn find(&self, locator: &str) -> Result<Box<dyn RenderElement>, RenderError> {
        // DOM.getSearchResults rejects an empty range, so find_xpaths errors
        // instead of returning nothing. Count first.
        let count: i64 = self
            .page
            .evaluate(xpath_count_script(locator))
            .await
            .map_err(|e| RenderError::Lookup(e.to_string()))?
            .into_value()
            .map_err(|e| RenderError::Lookup(format!("unexpected match count: {e:?}")))?;
        require_match(count, locator)?;

        let elements = self
            .page
            .find_xpaths(locator)
            .await
            .map_err(|e| RenderError::Lookup(e.to_string()))?;

        elements
            .into_iter()
            .next()
            .map(|element| Box::new(ChromiumElement { element }) as Box<dyn RenderElement>)
            .ok_or_else(|| RenderError::NotFound {
                locator: locator.to_string(),
            })
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        let ChromiumSession {
            mut browser,
            page,
            handler_task,
            profile_dir,
            active_count,
        } = *self;

        active_count.fetch_sub(1, Ordering::Relaxed);
        let _ = page.close().await;

        let closed = browser.close().await;
        // Reap the child even if the close command failed.
        if let Err(e) = browser.wait().await {
            warn!("failed to wait for chromium exit: {e}");
        }
        handler_task.abort();

        if let Err(e) = tokio::fs::remove_dir_all(&profile_dir).await {
            debug!(profile = %profile_dir.display(), "profile cleanup skipped: {e}");
        }

        closed
            .map(|_| ())
            .map_err(|e| RenderError::Close(e.to_string()))
    }
}

/// JS expression evaluating to the number of nodes matching `xpath`.
fn xpath_count_script(xpath: &str) -> String {
    // A JSON string literal is a valid JS string literal.
    let literal = serde_json::Value::String(xpath.to_string()).to_string();
    format!(
        "document.evaluate({literal}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength"
    )
}

fn require_match(count: i64, locator: &str) -> Result<(), RenderError> {
    if count > 0 {
        Ok(())
    } else {
        Err(RenderError::NotFound {
            locator: locator.to_string(),
        })
    }
}

/// A located Chromium DOM node.
pub struct ChromiumElement {
    element: Element,
}

#[async_trait]
impl RenderElement for ChromiumElement {
    async fn text(&self) -> Result<String, RenderError> {
        let text = self
            .element
            .inner_text()
            .await
            .map_err(|e| RenderError::Lookup(e.to_string()))?;
        Ok(text.unwrap_or_default())
    }
}
