// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password strength heuristic.
//!
//! A coarse three-bucket classification shown when a password is saved or
//! generated. This is advice for the user, not a gate: weak passwords are
//! still accepted.

/// Strength verdict for a candidate password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    Weak,
    Medium,
    Strong,
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Strength::Weak => "Weak",
            Strength::Medium => "Medium",
            Strength::Strong => "Strong",
        };
        f.write_str(label)
    }
}

/// Classify a password.
///
/// Weak: shorter than 6 characters, or missing lowercase, uppercase, or a
/// digit. Strong: at least 12 characters with all four classes present.
/// Everything in between is Medium.
pub fn classify(password: &str) -> Strength {
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| c.is_ascii_punctuation());
    let length = password.chars().count();

    if length < 6 || !has_lower || !has_upper || !has_digit {
        return Strength::Weak;
    }
    if length >= 12 && has_symbol {
        return Strength::Strong;
    }
    Strength::Medium
}
