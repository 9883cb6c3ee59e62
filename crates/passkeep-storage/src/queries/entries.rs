// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential entry CRUD operations.

use passkeep_core::PasskeepError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{EntryId, SealedEntry};

/// Insert or replace the sealed payload for an identity.
///
/// An existing `(username, platform)` row has its nonce and ciphertext
/// replaced in place; no duplicate row is ever created.
pub async fn upsert(
    db: &Database,
    id: &EntryId,
    nonce: Vec<u8>,
    ciphertext: Vec<u8>,
) -> Result<(), PasskeepError> {
    let id = id.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO entries (username, platform, nonce, ciphertext)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (username, platform) DO UPDATE SET
                     nonce = excluded.nonce,
                     ciphertext = excluded.ciphertext,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                params![id.username, id.platform, nonce, ciphertext],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch the sealed `(nonce, ciphertext)` pair for an identity.
pub async fn get(
    db: &Database,
    id: &EntryId,
) -> Result<Option<(Vec<u8>, Vec<u8>)>, PasskeepError> {
    let id = id.clone();
    type NonceCipher = (Vec<u8>, Vec<u8>);
    db.connection()
        .call(move |conn| -> Result<Option<NonceCipher>, rusqlite::Error> {
            let result = conn.query_row(
                "SELECT nonce, ciphertext FROM entries
                 WHERE username = ?1 AND platform = ?2",
                params![id.username, id.platform],
                |row| Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, Vec<u8>>(1)?)),
            );
            match result {
                Ok(entry) => Ok(Some(entry)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete an entry. Returns `false` if the identity was never stored.
pub async fn delete(db: &Database, id: &EntryId) -> Result<bool, PasskeepError> {
    let id = id.clone();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let changed = conn.execute(
                "DELETE FROM entries WHERE username = ?1 AND platform = ?2",
                params![id.username, id.platform],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all identities, ordered by username then platform.
pub async fn list_identities(db: &Database) -> Result<Vec<EntryId>, PasskeepError> {
    db.connection()
        .call(|conn| -> Result<Vec<EntryId>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT username, platform FROM entries ORDER BY username, platform",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(EntryId {
                    username: row.get(0)?,
                    platform: row.get(1)?,
                })
            })?;
            let mut ids = Vec::new();
            for row in rows {
                ids.push(row?);
            }
            Ok(ids)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Load every sealed entry, ordered by username then platform.
///
/// Used by rotation, which must rewrite the full entry set.
pub async fn load_all(db: &Database) -> Result<Vec<SealedEntry>, PasskeepError> {
    db.connection()
        .call(|conn| -> Result<Vec<SealedEntry>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT username, platform, nonce, ciphertext FROM entries
                 ORDER BY username, platform",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(SealedEntry {
                    identity: EntryId {
                        username: row.get(0)?,
                        platform: row.get(1)?,
                    },
                    nonce: row.get(2)?,
                    ciphertext: row.get(3)?,
                })
            })?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
