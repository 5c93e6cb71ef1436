// Copyright 2026 Broiler Rates Contributors
// SPDX-License-Identifier: Apache-2.0

//! Renderer abstraction for browser-based page rendering.
//!
//! Defines the `Renderer`, `RenderSession` and `RenderElement` traits that
//! abstract over the browser engine (currently Chromium via chromiumoxide).

pub mod chromium;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::RenderError;

/// A browser engine that hands out isolated sessions.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Launch an isolated headless session with one blank page.
    async fn open(&self) -> Result<Box<dyn RenderSession>, RenderError>;
    /// Number of sessions opened and not yet closed.
    fn active_sessions(&self) -> usize;
}

/// One browser instance with one navigation state. Never shared between
/// concurrent extractions.
#[async_trait]
pub trait RenderSession: Send + Sync {
    /// Navigate to a URL with a timeout.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), RenderError>;
    /// Locate a single node by XPath. A missing node is
    /// [`RenderError::NotFound`].
    async fn find(&self, locator: &str) -> Result<Box<dyn RenderElement>, RenderError>;
    /// Release the page and the browser process.
    async fn close(self: Box<Self>) -> Result<(), RenderError>;
}

/// A located DOM node.
#[async_trait]
pub trait RenderElement: Send + Sync {
    /// Rendered text content at the moment of the call.
    async fn text(&self) -> Result<String, RenderError>;
}

/// Owns an open session and releases it exactly once.
///
/// [`SessionGuard::close`] releases in place. If the guard is dropped while
/// still holding the session (the owning future was cancelled), `Drop` hands
/// the close to a background task on the current runtime.
pub struct SessionGuard {
    session: Option<Box<dyn RenderSession>>,
}

impl SessionGuard {
    pub fn new(session: Box<dyn RenderSession>) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn session_mut(&mut self) -> &mut dyn RenderSession {
        match self.session.as_mut() {
            Some(session) => session.as_mut(),
            None => unreachable!("session used after close"),
        }
    }

    pub async fn close(mut self) -> Result<(), RenderError> {
        match self.session.take() {
            Some(session) => session.close().await,
            None => Ok(()),
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = session.close().await {
                        tracing::warn!("{e}");
                    }
                });
            }
            Err(_) => tracing::warn!("no runtime to close abandoned browser session"),
        }
    }
}

/// A no-op renderer used when Chromium is unavailable.
///
/// Every extraction fails at launch and is reported through the record's
/// `error` field, so the HTTP surface stays up.
pub struct NoopRenderer;

#[async_trait]
impl Renderer for NoopRenderer {
    async fn open(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        Err(RenderError::Launch(
            "browser not available, Chromium was not found".to_string(),
        ))
    }

    fn active_sessions(&self) -> usize {
        0
    }
}
