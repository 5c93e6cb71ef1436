// Copyright 2026 Broiler Rates Contributors
// SPDX-License-Identifier: Apache-2.0

//! Broiler rates — extract today's and yesterday's broiler rate for a city
//! from a client-side rendered page.
//!
//! The [`ExtractionEngine`] drives a [`Renderer`] (Chromium via chromiumoxide
//! in production) through a polling protocol and always produces a
//! [`RateRecord`], folding every failure into its `error` field.

pub mod city;
pub mod config;
pub mod engine;
pub mod error;
pub mod rate;
pub mod renderer;
pub mod types;

pub use city::{normalize_city, CityPolicySet, WaitPolicy};
pub use config::EngineConfig;
pub use engine::{ExtractionEngine, ExtractionPhase, RateField};
pub use error::{ExtractError, FailureKind, RenderError};
pub use rate::{derive_rate, is_sentinel};
pub use renderer::{NoopRenderer, RenderElement, RenderSession, Renderer, SessionGuard};
pub use types::RateRecord;
