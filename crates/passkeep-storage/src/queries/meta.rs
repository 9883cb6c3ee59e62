// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault metadata operations.
//!
//! `vault_meta` is a key/value table holding the salt, KDF parameters, and
//! the sealed canary. Initialization writes all of them in one transaction
//! so a vault is never observable with salt but no canary.

use passkeep_core::PasskeepError;
use rusqlite::params;

use crate::database::Database;

/// Argon2id salt (16 bytes).
pub const KEY_KDF_SALT: &str = "kdf_salt";
/// JSON-encoded Argon2id parameters the vault was sealed under.
pub const KEY_KDF_PARAMS: &str = "kdf_params";
/// Nonce of the sealed canary (12 bytes).
pub const KEY_CANARY_NONCE: &str = "canary_nonce";
/// Ciphertext of the sealed canary (marker + tag).
pub const KEY_CANARY_CIPHERTEXT: &str = "canary_ciphertext";

/// Read a metadata value by key.
pub async fn get_value(
    db: &Database,
    key: &'static str,
) -> Result<Option<Vec<u8>>, PasskeepError> {
    db.connection()
        .call(move |conn| -> Result<Option<Vec<u8>>, rusqlite::Error> {
            let result = conn.query_row(
                "SELECT value FROM vault_meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            );
            match result {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Write a metadata value, replacing any existing one.
pub async fn put_value(
    db: &Database,
    key: &'static str,
    value: Vec<u8>,
) -> Result<(), PasskeepError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT OR REPLACE INTO vault_meta (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Write the complete initial metadata set in a single transaction.
///
/// A crash can only leave the store fully uninitialized or fully sealed;
/// the salt-without-canary intermediate never hits disk.
pub async fn init_vault_meta(
    db: &Database,
    salt: Vec<u8>,
    kdf_params: Vec<u8>,
    canary_nonce: Vec<u8>,
    canary_ciphertext: Vec<u8>,
) -> Result<(), PasskeepError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT OR REPLACE INTO vault_meta (key, value) VALUES (?1, ?2)",
                params![KEY_KDF_SALT, salt],
            )?;
            tx.execute(
                "INSERT OR REPLACE INTO vault_meta (key, value) VALUES (?1, ?2)",
                params![KEY_KDF_PARAMS, kdf_params],
            )?;
            tx.execute(
                "INSERT OR REPLACE INTO vault_meta (key, value) VALUES (?1, ?2)",
                params![KEY_CANARY_NONCE, canary_nonce],
            )?;
            tx.execute(
                "INSERT OR REPLACE INTO vault_meta (key, value) VALUES (?1, ?2)",
                params![KEY_CANARY_CIPHERTEXT, canary_ciphertext],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
