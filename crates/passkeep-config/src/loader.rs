// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./passkeep.toml` > `~/.config/passkeep/passkeep.toml`
//! > `/etc/passkeep/passkeep.toml` with environment variable overrides via
//! `PASSKEEP_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PasskeepConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/passkeep/passkeep.toml` (system-wide)
/// 3. `~/.config/passkeep/passkeep.toml` (user XDG config)
/// 4. `./passkeep.toml` (local directory)
/// 5. `PASSKEEP_*` environment variables
pub fn load_config() -> Result<PasskeepConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<PasskeepConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PasskeepConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PasskeepConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PasskeepConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PasskeepConfig::default()))
        .merge(Toml::file("/etc/passkeep/passkeep.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("passkeep/passkeep.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("passkeep.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `PASSKEEP_VAULT_KDF_ITERATIONS` must map
/// to `vault.kdf_iterations`, not `vault.kdf.iterations`.
fn env_provider() -> Env {
    Env::prefixed("PASSKEEP_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: PASSKEEP_STORAGE_DATABASE_PATH -> "storage_database_path"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("storage_", "storage.", 1)
            .replacen("vault_", "vault.", 1);
        mapped.into()
    })
}
