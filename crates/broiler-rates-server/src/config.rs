// Copyright 2026 Broiler Rates Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration loading and resolution.
//!
//! Every knob is a CLI flag with an environment fallback; unset values keep
//! the engine defaults.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use broiler_rates::config::{
    DEFAULT_FAST_PATH_TIMEOUT, DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_POLL_INTERVAL,
    DEFAULT_STRICT_TIMEOUT, DEFAULT_URL_TEMPLATE,
};
use broiler_rates::EngineConfig;

/// Default listen address.
pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";

/// Extraction settings shared by every subcommand.
#[derive(Debug, Clone, clap::Args)]
pub struct EngineArgs {
    /// Page URL template; `{city}` is replaced with the normalized city.
    #[arg(long, global = true, env = "BROILER_URL_TEMPLATE", default_value = DEFAULT_URL_TEMPLATE)]
    pub url_template: String,

    /// Overall deadline for cities that wait for real values.
    #[arg(long, global = true, env = "BROILER_STRICT_TIMEOUT_SECS", default_value_t = DEFAULT_STRICT_TIMEOUT.as_secs())]
    pub strict_timeout_secs: u64,

    /// Presence bound for all other cities.
    #[arg(long, global = true, env = "BROILER_FAST_PATH_TIMEOUT_SECS", default_value_t = DEFAULT_FAST_PATH_TIMEOUT.as_secs())]
    pub fast_path_timeout_secs: u64,

    /// Delay between polls.
    #[arg(long, global = true, env = "BROILER_POLL_INTERVAL_MS", default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    pub poll_interval_ms: u64,

    /// Page load bound.
    #[arg(long, global = true, env = "BROILER_NAVIGATION_TIMEOUT_SECS", default_value_t = DEFAULT_NAVIGATION_TIMEOUT.as_secs())]
    pub navigation_timeout_secs: u64,

    /// Chromium binary; discovered on PATH when unset.
    #[arg(long, global = true, env = "BROILER_CHROMIUM_PATH")]
    pub chromium_path: Option<PathBuf>,
}

impl EngineArgs {
    /// Resolve into a validated engine configuration.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let config = EngineConfig {
            url_template: self.url_template.clone(),
            strict_timeout: Duration::from_secs(self.strict_timeout_secs),
            fast_path_timeout: Duration::from_secs(self.fast_path_timeout_secs),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            navigation_timeout: Duration::from_secs(self.navigation_timeout_secs),
            ..EngineConfig::default()
        };
        config.validate().context("invalid engine configuration")?;
        Ok(config)
    }
}
