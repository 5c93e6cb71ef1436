// Copyright 2026 Broiler Rates Contributors
// SPDX-License-Identifier: Apache-2.0

//! The record returned for every extraction.

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// Today's and yesterday's rate for one city.
///
/// `error` is set exactly when the rates could not be obtained; in that
/// case both rate fields are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRecord {
    pub city: String,
    pub today: Option<String>,
    pub yesterday: Option<String>,
    pub error: Option<String>,
}

impl RateRecord {
    pub fn success(city: impl Into<String>, today: String, yesterday: String) -> Self {
        Self {
            city: city.into(),
            today: Some(today),
            yesterday: Some(yesterday),
            error: None,
        }
    }

    pub fn failure(city: impl Into<String>, err: &ExtractError) -> Self {
        Self {
            city: city.into(),
            today: None,
            yesterday: None,
            error: Some(err.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
