// Copyright 2026 Broiler Rates Contributors
// SPDX-License-Identifier: Apache-2.0

//! Extraction engine configuration.

use std::time::Duration;

use crate::city::CityPolicySet;
use crate::rate::DEFAULT_CURRENCY_MARKER;

/// Placeholder substituted with the normalized city.
pub const CITY_PLACEHOLDER: &str = "{city}";

pub const DEFAULT_URL_TEMPLATE: &str =
    "https://poultrybaba.com/rates/history/broiler?month=Oct+2025&city={city}&productName=BROILER";

pub const DEFAULT_TODAY_LOCATOR: &str = "//h2[contains(text(),'Today Rate of broiler')]/following::div[1]//h2[contains(text(),'Announced Rate')]";

pub const DEFAULT_YESTERDAY_LOCATOR: &str = "//h2[contains(text(),'Yesterday Rate of broiler')]/following::div[1]//h2[contains(text(),'Announced Rate')]";

/// Overall deadline for strict polling.
pub const DEFAULT_STRICT_TIMEOUT: Duration = Duration::from_secs(120);

/// Presence bound for cities outside the policy set.
pub const DEFAULT_FAST_PATH_TIMEOUT: Duration = Duration::from_secs(5);

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("URL template must contain {{city}}: {0}")]
    MissingCityPlaceholder(String),

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("currency marker must not be empty")]
    EmptyCurrencyMarker,
}

/// Everything the engine needs besides a renderer.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub url_template: String,
    pub today_locator: String,
    pub yesterday_locator: String,
    pub currency_marker: String,
    pub strict_timeout: Duration,
    pub fast_path_timeout: Duration,
    pub poll_interval: Duration,
    pub navigation_timeout: Duration,
    pub policy_set: CityPolicySet,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            today_locator: DEFAULT_TODAY_LOCATOR.to_string(),
            yesterday_locator: DEFAULT_YESTERDAY_LOCATOR.to_string(),
            currency_marker: DEFAULT_CURRENCY_MARKER.to_string(),
            strict_timeout: DEFAULT_STRICT_TIMEOUT,
            fast_path_timeout: DEFAULT_FAST_PATH_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            policy_set: CityPolicySet::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.url_template.contains(CITY_PLACEHOLDER) {
            return Err(ConfigError::MissingCityPlaceholder(
                self.url_template.clone(),
            ));
        }
        if self.currency_marker.is_empty() {
            return Err(ConfigError::EmptyCurrencyMarker);
        }
        for (name, value) in [
            ("strict_timeout", self.strict_timeout),
            ("fast_path_timeout", self.fast_path_timeout),
            ("poll_interval", self.poll_interval),
            ("navigation_timeout", self.navigation_timeout),
        ] {
            if value.is_zero() {
                return Err(ConfigError::ZeroDuration(name));
            }
        }
        Ok(())
    }

    /// Substitute the normalized city into the template.
    pub fn target_url(&self, city: &str) -> String {
        self.url_template.replace(CITY_PLACEHOLDER, city)
    }
}
