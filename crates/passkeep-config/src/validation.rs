// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty paths and Argon2id cost floors.

use crate::diagnostic::ConfigError;
use crate::model::PasskeepConfig;

/// Known log level names accepted by the tracing filter.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &PasskeepConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !VALID_LOG_LEVELS.contains(&config.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log_level must be one of {}, got `{}`",
                VALID_LOG_LEVELS.join(", "),
                config.log_level
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // Argon2id cost floors. Anything below these makes a stolen vault file
    // cheap to brute-force.
    if config.vault.kdf_memory_cost < 32768 {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_memory_cost must be at least 32768 (32 MiB), got {}",
                config.vault.kdf_memory_cost
            ),
        });
    }

    if config.vault.kdf_iterations < 2 {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_iterations must be at least 2, got {}",
                config.vault.kdf_iterations
            ),
        });
    }

    if config.vault.kdf_parallelism < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_parallelism must be at least 1, got {}",
                config.vault.kdf_parallelism
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
