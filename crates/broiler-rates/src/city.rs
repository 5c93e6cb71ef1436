// Copyright 2026 Broiler Rates Contributors
// SPDX-License-Identifier: Apache-2.0

//! City normalization and the fixed set of cities that get strict polling.

use serde::{Deserialize, Serialize};

/// Cities whose pages are known to render a placeholder before the real rate.
pub const DEFAULT_POLICY_CITIES: &[&str] = &[
    "Hasilpur",
    "Rahim yar Khan",
    "FortAbbas",
    "Chishtian",
    "Bahawalpur",
    "Larkana",
    "Baddin",
    "Dadu",
    "Taunsa",
    "Layyah",
    "Rajanpur",
    "Dera Ghazi Khan",
    "Muzaffir Garh",
    "Kot Addu",
    "Jhang",
    "Chiniot",
    "Faisalabad",
    "Toba Tek Sing",
    "Hafizabad",
    "Sialkot",
    "Gujranwala",
    "Wazirabad",
    "Gujrat",
    "Karachi",
    "Lahore",
    "Mirpur khas",
    "Vehari",
    "Burewala",
    "Khanewal",
    "Attock",
    "Talagang",
    "Chakwal",
    "Kahuta",
    "Rawalpindi",
    "Pakpattan",
    "Chichawatni",
    "Okara",
    "Sahiwal",
    "Arifwala",
    "Mianwali",
    "Sargodha",
    "Bakkar",
    "Nawab Shah",
    "Shikarpur",
    "Sukker",
];

/// Normalize a free-text city name: trim, then title-case.
///
/// A letter is upper-cased when the character before it is not a letter,
/// and lower-cased otherwise, so `"rahim yar KHAN"` becomes
/// `"Rahim Yar Khan"` and `"UnknownTown"` becomes `"Unknowntown"`.
pub fn normalize_city(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_is_letter = false;
    for c in raw.trim().chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                // Multi-char uppercase forms ("ß" -> "SS") keep only the
                // first letter capitalized.
                let mut upper = c.to_uppercase();
                out.extend(upper.next());
                out.extend(upper.flat_map(char::to_lowercase));
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// How long and how carefully the engine waits for the rate elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitPolicy {
    /// Poll until the text is a real value, not a placeholder.
    Strict,
    /// One short presence wait, text taken as-is.
    FastPath,
}

impl WaitPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitPolicy::Strict => "strict",
            WaitPolicy::FastPath => "fast_path",
        }
    }
}

impl std::fmt::Display for WaitPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed set of cities that receive [`WaitPolicy::Strict`].
///
/// Entries are stored both as configured (for display) and normalized
/// (for membership checks).
#[derive(Debug, Clone)]
pub struct CityPolicySet {
    entries: Vec<String>,
    normalized: Vec<String>,
}

impl CityPolicySet {
    pub fn new<I, S>(cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = cities.into_iter().map(Into::into).collect();
        let normalized = entries.iter().map(|c| normalize_city(c)).collect();
        Self {
            entries,
            normalized,
        }
    }

    /// Whether `city` (raw or normalized) is a member.
    pub fn contains(&self, city: &str) -> bool {
        let city = normalize_city(city);
        self.normalized.iter().any(|c| *c == city)
    }

    /// The wait policy for `city`.
    pub fn policy_for(&self, city: &str) -> WaitPolicy {
        if self.contains(city) {
            WaitPolicy::Strict
        } else {
            WaitPolicy::FastPath
        }
    }

    /// Entries in configured order.
    pub fn cities(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CityPolicySet {
    fn default() -> Self {
        Self::new(DEFAULT_POLICY_CITIES.iter().copied())
    }
}
