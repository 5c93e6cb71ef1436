// Copyright 2026 Broiler Rates Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP API and CLI plumbing around the broiler rate extraction engine.

pub mod config;
pub mod logging;
pub mod rest;
pub mod state;

pub use config::EngineArgs;
pub use rest::router;
pub use state::AppState;
