// Copyright 2026 Broiler Rates Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for rendering and extraction.

use serde::{Deserialize, Serialize};

/// Failures raised by a [`Renderer`](crate::Renderer) or its sessions.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("no element matches locator: {locator}")]
    NotFound { locator: String },

    #[error("element lookup failed: {0}")]
    Lookup(String),

    #[error("failed to close browser session: {0}")]
    Close(String),
}

impl RenderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RenderError::NotFound { .. })
    }
}

/// Everything that can stop one extraction.
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    /// Strict polling ran out of time before both rates showed real values.
    #[error("Timed out waiting for non-N/A values for {city}.")]
    Timeout { city: String },

    /// Fast-path presence wait ran out of time.
    #[error("element not present within {timeout_ms}ms: {locator}")]
    NotPresent { locator: String, timeout_ms: u64 },

    #[error("invalid target URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// How a failed extraction is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    Unclassified,
}

impl ExtractError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ExtractError::Timeout { .. } => FailureKind::Timeout,
            ExtractError::NotPresent { .. }
            | ExtractError::InvalidUrl { .. }
            | ExtractError::Render(_) => FailureKind::Unclassified,
        }
    }
}
