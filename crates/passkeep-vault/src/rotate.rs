// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase rotation: re-derive, re-canary, re-encrypt everything, commit
//! once.
//!
//! The dangerous pattern here would be rewriting entries in place one at a
//! time with an early return on failure -- that can strand a vault with some
//! entries under the old key and some under the new. Rotation therefore
//! stages every re-encrypted entry in memory and hands the complete set to
//! the storage layer's single-transaction commit. Before the commit nothing
//! is written; after it everything is. The salt is never rotated.

use passkeep_config::model::VaultConfig;
use passkeep_core::{PasskeepError, SealedEntry};
use passkeep_storage::Database;
use passkeep_storage::queries::{entries, meta, rekey};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::{self, KEY_LEN, NONCE_LEN};
use crate::kdf::{self, KdfParams, SALT_LEN};
use crate::canary;

/// Rotate the vault from `old_passphrase` to `new_passphrase`.
///
/// Returns the new session key after a successful commit. Failure modes:
/// - [`PasskeepError::WrongPassphrase`]: the canary rejected the old
///   passphrase; no entry was read or written.
/// - [`PasskeepError::RotationAborted`]: some entry failed to decrypt under
///   the old key; nothing was written.
pub(crate) async fn run(
    db: &Database,
    old_passphrase: &SecretString,
    new_passphrase: &SecretString,
    config: &VaultConfig,
) -> Result<Zeroizing<[u8; KEY_LEN]>, PasskeepError> {
    // Step 1: authenticate the old passphrase against the stored canary
    // before touching any entry.
    let salt = read_salt(db).await?;
    let stored_params_bytes = meta::get_value(db, meta::KEY_KDF_PARAMS)
        .await?
        .ok_or_else(|| PasskeepError::CorruptVault("kdf params missing".to_string()))?;
    let stored_params = KdfParams::from_bytes(&stored_params_bytes)?;
    let canary_nonce: [u8; NONCE_LEN] = meta::get_value(db, meta::KEY_CANARY_NONCE)
        .await?
        .ok_or_else(|| PasskeepError::CorruptVault("canary nonce missing".to_string()))?
        .try_into()
        .map_err(|_| {
            PasskeepError::CorruptVault(format!("canary nonce must be {NONCE_LEN} bytes"))
        })?;
    let canary_ciphertext = meta::get_value(db, meta::KEY_CANARY_CIPHERTEXT)
        .await?
        .ok_or_else(|| PasskeepError::CorruptVault("canary ciphertext missing".to_string()))?;

    let old_key = kdf::derive_key(
        old_passphrase.expose_secret().as_bytes(),
        &salt,
        &stored_params,
    )?;
    canary::verify(&old_key, &canary_nonce, &canary_ciphertext)?;

    // Step 2: derive the new key. The salt stays; KDF cost parameters are
    // refreshed from config and ride in the same commit.
    let new_params = KdfParams::from(config);
    let new_key = kdf::derive_key(
        new_passphrase.expose_secret().as_bytes(),
        &salt,
        &new_params,
    )?;

    // Steps 3-4: decrypt every entry under the old key and re-seal it under
    // the new key, entirely in memory. Any decrypt failure aborts with the
    // store untouched.
    let sealed = entries::load_all(db).await?;
    let mut staged = Vec::with_capacity(sealed.len());
    for entry in sealed {
        let aad = entry.identity.aad();
        let nonce: [u8; NONCE_LEN] = entry.nonce.try_into().map_err(|_| {
            PasskeepError::RotationAborted(format!(
                "entry {} has a malformed nonce",
                entry.identity
            ))
        })?;
        let plaintext = crypto::open(&old_key, &aad, &nonce, &entry.ciphertext)
            .map(Zeroizing::new)
            .map_err(|_| {
                PasskeepError::RotationAborted(format!(
                    "entry {} failed to decrypt under the current key",
                    entry.identity
                ))
            })?;

        let (ciphertext, new_nonce) = crypto::seal(&new_key, &aad, &plaintext)?;
        staged.push(SealedEntry {
            identity: entry.identity,
            nonce: new_nonce.to_vec(),
            ciphertext,
        });
    }
    debug!(entries = staged.len(), "all entries re-encrypted, committing");

    // Step 5: reseal the canary under the new key.
    let (new_canary_nonce, new_canary_ciphertext) = canary::seal(&new_key)?;

    // Step 6: one atomic commit across metadata and entries.
    rekey::commit_rekey(
        db,
        new_params.to_bytes()?,
        new_canary_nonce.to_vec(),
        new_canary_ciphertext,
        staged,
    )
    .await?;

    Ok(new_key)
}

async fn read_salt(db: &Database) -> Result<[u8; SALT_LEN], PasskeepError> {
    meta::get_value(db, meta::KEY_KDF_SALT)
        .await?
        .ok_or(PasskeepError::NotInitialized)?
        .try_into()
        .map_err(|_| PasskeepError::CorruptVault(format!("salt must be {SALT_LEN} bytes")))
}
