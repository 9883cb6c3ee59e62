// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id key derivation from the master passphrase.
//!
//! Derives a 32-byte key using Argon2id (Algorithm::Argon2id, Version::V0x13).
//! The cost parameters are deliberately expensive (hundreds of milliseconds)
//! so a stolen vault file resists offline brute force; they must not be
//! lowered outside tests. The parameters a vault was sealed under are
//! persisted next to the salt, so unlocking never depends on current config.

use passkeep_config::model::VaultConfig;
use passkeep_core::PasskeepError;
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Length of the Argon2id salt in bytes.
pub const SALT_LEN: usize = 16;
/// Length of the derived key in bytes.
pub const KEY_LEN: usize = 32;

/// Argon2id cost parameters, as persisted in vault metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    /// Iteration count.
    pub iterations: u32,
    /// Parallelism lanes.
    pub parallelism: u32,
}

impl From<&VaultConfig> for KdfParams {
    fn from(config: &VaultConfig) -> Self {
        Self {
            memory_cost: config.kdf_memory_cost,
            iterations: config.kdf_iterations,
            parallelism: config.kdf_parallelism,
        }
    }
}

impl KdfParams {
    /// Serialize for the `kdf_params` metadata slot.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PasskeepError> {
        serde_json::to_vec(self)
            .map_err(|e| PasskeepError::Internal(format!("failed to encode KDF params: {e}")))
    }

    /// Parse the `kdf_params` metadata slot. Unreadable parameters mean the
    /// vault cannot be unlocked by anyone; that is corruption, not a typo.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PasskeepError> {
        serde_json::from_slice(bytes)
            .map_err(|e| PasskeepError::CorruptVault(format!("unreadable KDF params: {e}")))
    }
}

/// Derive a 32-byte key from the passphrase using Argon2id.
///
/// Deterministic: the same passphrase, salt, and parameters always yield the
/// same key. The returned key is wrapped in [`Zeroizing`] for automatic
/// memory zeroing on drop.
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8; SALT_LEN],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; KEY_LEN]>, PasskeepError> {
    let argon_params = argon2::Params::new(
        params.memory_cost,
        params.iterations,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| PasskeepError::Crypto(format!("invalid Argon2id parameters: {e}")))?;

    let argon2 = argon2::Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon_params,
    );

    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(passphrase, salt, output.as_mut())
        .map_err(|e| PasskeepError::Crypto(format!("Argon2id key derivation failed: {e}")))?;

    Ok(output)
}

/// Generate a random 16-byte salt for Argon2id.
pub fn generate_salt() -> Result<[u8; SALT_LEN], PasskeepError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| PasskeepError::Crypto("failed to generate random salt".to_string()))?;
    Ok(salt)
}
