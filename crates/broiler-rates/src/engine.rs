// Copyright 2026 Broiler Rates Contributors
// SPDX-License-Identifier: Apache-2.0

//! Extraction engine: render the city page, wait for both rate elements
//! under the city's [`WaitPolicy`], and fold the outcome into a
//! [`RateRecord`].
//!
//! Per request the engine moves through
//! `Idle → Navigating → Polling{today} → Polling{yesterday} → Extracted → Done`,
//! or ends in `Failed` from navigation or either polling phase. The browser
//! session is closed exactly once on every path: before the record is
//! returned, or by [`SessionGuard`] when the extraction is cancelled.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::city::{normalize_city, WaitPolicy};
use crate::config::EngineConfig;
use crate::error::{ExtractError, RenderError};
use crate::rate::{derive_rate, is_sentinel};
use crate::renderer::{RenderSession, Renderer, SessionGuard};
use crate::types::RateRecord;

/// Which rate element is being waited on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateField {
    Today,
    Yesterday,
}

impl RateField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateField::Today => "today",
            RateField::Yesterday => "yesterday",
        }
    }
}

/// Per-request progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionPhase {
    Idle,
    Navigating,
    Polling(RateField),
    Extracted,
    Done,
    Failed,
}

impl ExtractionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExtractionPhase::Done | ExtractionPhase::Failed)
    }
}

/// Tracks the phase of one extraction and logs each transition.
struct PhaseTracker<'a> {
    city: &'a str,
    phase: ExtractionPhase,
}

impl<'a> PhaseTracker<'a> {
    fn new(city: &'a str) -> Self {
        Self {
            city,
            phase: ExtractionPhase::Idle,
        }
    }

    fn advance(&mut self, next: ExtractionPhase) {
        debug_assert!(!self.phase.is_terminal(), "phase already terminal");
        debug!(city = self.city, from = ?self.phase, to = ?next, "extraction phase");
        self.phase = next;
    }
}

/// The rate extraction service. Cheap to share behind an `Arc`; holds no
/// per-request state.
pub struct ExtractionEngine {
    renderer: Arc<dyn Renderer>,
    config: EngineConfig,
}

impl ExtractionEngine {
    pub fn new(renderer: Arc<dyn Renderer>, config: EngineConfig) -> Self {
        Self { renderer, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn renderer(&self) -> &Arc<dyn Renderer> {
        &self.renderer
    }

    /// Extract today's and yesterday's rate for `city`.
    ///
    /// Never fails: any error ends up in [`RateRecord::error`] with both
    /// rates `None`.
    pub async fn extract(&self, city: &str) -> RateRecord {
        let started = Instant::now();
        let city = normalize_city(city);
        let policy = self.config.policy_set.policy_for(&city);
        let mut tracker = PhaseTracker::new(&city);

        let outcome = self.run(&city, policy, &mut tracker).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok((today, yesterday)) => {
                tracker.advance(ExtractionPhase::Done);
                info!(city = %city, %policy, elapsed_ms, "rates extracted");
                RateRecord::success(city.clone(), today, yesterday)
            }
            Err(e) => {
                tracker.advance(ExtractionPhase::Failed);
                warn!(city = %city, %policy, elapsed_ms, kind = ?e.kind(), "extraction failed: {e}");
                RateRecord::failure(city.clone(), &e)
            }
        }
    }

    /// Acquire a session, drive it, and release it whatever happened.
    async fn run(
        &self,
        city: &str,
        policy: WaitPolicy,
        tracker: &mut PhaseTracker<'_>,
    ) -> Result<(String, String), ExtractError> {
        tracker.advance(ExtractionPhase::Navigating);
        let url = self.target_url(city)?;
        let mut session = SessionGuard::new(self.renderer.open().await?);

        let outcome = self
            .drive(session.session_mut(), &url, city, policy, tracker)
            .await;

        if let Err(e) = session.close().await {
            warn!(city, "{e}");
        }
        outcome
    }

    fn target_url(&self, city: &str) -> Result<String, ExtractError> {
        let raw = self.config.target_url(city);
        url::Url::parse(&raw)
            .map(String::from)
            .map_err(|source| ExtractError::InvalidUrl { url: raw, source })
    }

    async fn drive(
        &self,
        session: &mut dyn RenderSession,
        url: &str,
        city: &str,
        policy: WaitPolicy,
        tracker: &mut PhaseTracker<'_>,
    ) -> Result<(String, String), ExtractError> {
        session
            .navigate(url, self.config.navigation_timeout)
            .await?;

        let (today, yesterday) = match policy {
            WaitPolicy::Strict => {
                let deadline = Instant::now() + self.config.strict_timeout;
                tracker.advance(ExtractionPhase::Polling(RateField::Today));
                let today = self
                    .wait_real_value(session, &self.config.today_locator, deadline)
                    .await
                    .ok_or_else(|| timeout(city))?;
                tracker.advance(ExtractionPhase::Polling(RateField::Yesterday));
                let yesterday = self
                    .wait_real_value(session, &self.config.yesterday_locator, deadline)
                    .await
                    .ok_or_else(|| timeout(city))?;
                (today, yesterday)
            }
            WaitPolicy::FastPath => {
                let deadline = Instant::now() + self.config.fast_path_timeout;
                tracker.advance(ExtractionPhase::Polling(RateField::Today));
                let today = self
                    .wait_present(session, &self.config.today_locator, deadline)
                    .await?;
                tracker.advance(ExtractionPhase::Polling(RateField::Yesterday));
                let yesterday = self
                    .wait_present(session, &self.config.yesterday_locator, deadline)
                    .await?;
                (today, yesterday)
            }
        };

        tracker.advance(ExtractionPhase::Extracted);
        Ok((today, yesterday))
    }

    /// Poll until the derived text is not a placeholder. Lookup errors count
    /// as "not yet". Returns `None` when the deadline passes.
    async fn wait_real_value(
        &self,
        session: &dyn RenderSession,
        locator: &str,
        deadline: Instant,
    ) -> Option<String> {
        let poll = async {
            loop {
                match self.read_derived(session, locator).await {
                    Ok(value) if !is_sentinel(&value) => return value,
                    Ok(value) => debug!(locator, value = %value, "placeholder value, polling"),
                    Err(e) => debug!(locator, "not ready: {e}"),
                }
                tokio::time::sleep(self.config.poll_interval).await;
            }
        };
        tokio::time::timeout_at(deadline, poll).await.ok()
    }

    /// Wait for the element to exist, then take its text unfiltered. Only
    /// `NotFound` is retried within the bound.
    async fn wait_present(
        &self,
        session: &dyn RenderSession,
        locator: &str,
        deadline: Instant,
    ) -> Result<String, ExtractError> {
        let presence = async {
            loop {
                match session.find(locator).await {
                    Ok(element) => return Ok(element),
                    Err(e) if e.is_not_found() => {}
                    Err(e) => return Err(e),
                }
                tokio::time::sleep(self.config.poll_interval).await;
            }
        };

        let element = match tokio::time::timeout_at(deadline, presence).await {
            Ok(found) => found?,
            Err(_) => {
                return Err(ExtractError::NotPresent {
                    locator: locator.to_string(),
                    timeout_ms: duration_ms(self.config.fast_path_timeout),
                })
            }
        };

        let text = element.text().await?;
        Ok(derive_rate(&text, &self.config.currency_marker))
    }

    async fn read_derived(
        &self,
        session: &dyn RenderSession,
        locator: &str,
    ) -> Result<String, RenderError> {
        let element = session.find(locator).await?;
        let text = element.text().await?;
        Ok(derive_rate(&text, &self.config.currency_marker))
    }
}

fn timeout(city: &str) -> ExtractError {
    ExtractError::Timeout {
        city: city.to_string(),
    }
}

fn duration_ms(d: Duration) -> u64 {
    d.as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::NoopRenderer;

    fn noop_engine(config: EngineConfig) -> ExtractionEngine {
        ExtractionEngine::new(Arc::new(NoopRenderer), config)
    }

    #[test]
    fn test_terminal_phases() {
        assert!(ExtractionPhase::Done.is_terminal());
        assert!(ExtractionPhase::Failed.is_terminal());
        assert!(!ExtractionPhase::Polling(RateField::Today).is_terminal());
        assert!(!ExtractionPhase::Idle.is_terminal());
    }

    #[tokio::test]
    async fn test_unparseable_url_is_reported() {
        let engine = noop_engine(EngineConfig {
            url_template: "not a url/{city}".into(),
            ..EngineConfig::default()
        });

        let record = engine.extract("Lahore").await;

        assert_eq!(record.city, "Lahore");
        let error = record.error.expect("error should be set");
        assert!(error.starts_with("invalid target URL not a url/Lahore"), "{error}");
    }

    #[tokio::test]
    async fn test_missing_browser_is_reported() {
        let record = noop_engine(EngineConfig::default()).extract("sialkot").await;

        assert_eq!(record.city, "Sialkot");
        assert!(record.today.is_none() && record.yesterday.is_none());
        assert!(record.error.unwrap().starts_with("browser launch failed"));
    }
}
