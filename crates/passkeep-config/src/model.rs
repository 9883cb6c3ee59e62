// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Passkeep credential vault.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Passkeep configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PasskeepConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Vault key-derivation settings.
    #[serde(default)]
    pub vault: VaultConfig,
}

impl Default for PasskeepConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            storage: StorageConfig::default(),
            vault: VaultConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite vault file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("passkeep").join("passkeep.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("passkeep.db"))
        .to_string_lossy()
        .into_owned()
}

/// Vault key-derivation configuration.
///
/// These parameters feed Argon2id when a vault is created or its passphrase
/// is rotated. Unlocking always uses the parameters persisted in the vault
/// itself, so changing this config never breaks an existing vault.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Argon2id memory cost in KiB (default: 65536 = 64 MiB).
    #[serde(default = "default_kdf_memory_cost")]
    pub kdf_memory_cost: u32,

    /// Argon2id iteration count (default: 3).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Argon2id parallelism lanes (default: 4).
    #[serde(default = "default_kdf_parallelism")]
    pub kdf_parallelism: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_memory_cost: default_kdf_memory_cost(),
            kdf_iterations: default_kdf_iterations(),
            kdf_parallelism: default_kdf_parallelism(),
        }
    }
}

fn default_kdf_memory_cost() -> u32 {
    65536 // 64 MiB per OWASP recommendation
}

fn default_kdf_iterations() -> u32 {
    3
}

fn default_kdf_parallelism() -> u32 {
    4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = PasskeepConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(config.storage.database_path.ends_with("passkeep.db"));
        assert_eq!(config.vault.kdf_memory_cost, 65536);
        assert_eq!(config.vault.kdf_iterations, 3);
        assert_eq!(config.vault.kdf_parallelism, 4);
    }

    #[test]
    fn config_serde_roundtrip() {
        let config = PasskeepConfig::default();
        let json = serde_json::to_string(&config).expect("should serialize");
        let parsed: PasskeepConfig = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(parsed.vault.kdf_memory_cost, config.vault.kdf_memory_cost);
        assert_eq!(parsed.storage.database_path, config.storage.database_path);
    }
}
