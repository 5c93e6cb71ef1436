// Copyright 2026 Broiler Rates Contributors
// SPDX-License-Identifier: Apache-2.0

//! Rate value derivation from rendered element text.

/// Placeholder texts the page shows before the real rate arrives,
/// compared against the lower-cased derived value.
pub const SENTINELS: &[&str] = &["n/a", "na", "-"];

/// Currency marker preceding the numeric rate on the page.
pub const DEFAULT_CURRENCY_MARKER: &str = "Rs.";

/// Strip everything up to and including the last `marker`, then trim.
///
/// Text without the marker is only trimmed, which makes the derivation
/// idempotent on already-derived values.
pub fn derive_rate(raw: &str, marker: &str) -> String {
    let tail = match raw.rfind(marker) {
        Some(idx) if !marker.is_empty() => &raw[idx + marker.len()..],
        _ => raw,
    };
    tail.trim().to_string()
}

/// Whether a derived value means "not available yet".
///
/// Purely textual: anything that is non-empty and not a known placeholder
/// counts as present, numeric or not.
pub fn is_sentinel(derived: &str) -> bool {
    let lowered = derived.trim().to_lowercase();
    lowered.is_empty() || SENTINELS.contains(&lowered.as_str())
}
