// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The atomic commit phase of passphrase rotation.
//!
//! Rotation stages every re-encrypted entry in memory first; this module
//! writes the new canary, the new KDF parameters, and all entries inside
//! one SQLite transaction. A crash at any point leaves either the complete
//! old vault or the complete new vault -- a mixed-key state cannot hit disk.

use passkeep_core::PasskeepError;
use rusqlite::params;
use tracing::info;

use crate::database::Database;
use crate::models::SealedEntry;

/// Commit a completed rotation: new KDF params, resealed canary, and the
/// full re-encrypted entry set, all-or-nothing.
pub async fn commit_rekey(
    db: &Database,
    kdf_params: Vec<u8>,
    canary_nonce: Vec<u8>,
    canary_ciphertext: Vec<u8>,
    entries: Vec<SealedEntry>,
) -> Result<(), PasskeepError> {
    let entry_count = entries.len();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT OR REPLACE INTO vault_meta (key, value) VALUES ('kdf_params', ?1)",
                params![kdf_params],
            )?;
            tx.execute(
                "INSERT OR REPLACE INTO vault_meta (key, value) VALUES ('canary_nonce', ?1)",
                params![canary_nonce],
            )?;
            tx.execute(
                "INSERT OR REPLACE INTO vault_meta (key, value)
                 VALUES ('canary_ciphertext', ?1)",
                params![canary_ciphertext],
            )?;
            for entry in entries {
                tx.execute(
                    "UPDATE entries SET
                         nonce = ?1,
                         ciphertext = ?2,
                         updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                     WHERE username = ?3 AND platform = ?4",
                    params![
                        entry.nonce,
                        entry.ciphertext,
                        entry.identity.username,
                        entry.identity.platform,
                    ],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    info!(entries = entry_count, "rekey committed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryId;
    use crate::queries::{entries, meta};
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn commit_rewrites_meta_and_entries_together() {
        let (db, _dir) = setup_db().await;
        let id_a = EntryId::new("a", "x");
        let id_b = EntryId::new("b", "y");

        meta::init_vault_meta(&db, vec![1u8; 16], b"old-params".to_vec(), vec![2u8; 12], b"old-canary".to_vec())
            .await
            .unwrap();
        entries::upsert(&db, &id_a, vec![3u8; 12], b"old-a".to_vec()).await.unwrap();
        entries::upsert(&db, &id_b, vec![4u8; 12], b"old-b".to_vec()).await.unwrap();

        commit_rekey(
            &db,
            b"new-params".to_vec(),
            vec![5u8; 12],
            b"new-canary".to_vec(),
            vec![
                SealedEntry {
                    identity: id_a.clone(),
                    nonce: vec![6u8; 12],
                    ciphertext: b"new-a".to_vec(),
                },
                SealedEntry {
                    identity: id_b.clone(),
                    nonce: vec![7u8; 12],
                    ciphertext: b"new-b".to_vec(),
                },
            ],
        )
        .await
        .unwrap();

        // Salt is untouched; everything else reflects the new key.
        assert_eq!(
            meta::get_value(&db, meta::KEY_KDF_SALT).await.unwrap(),
            Some(vec![1u8; 16])
        );
        assert_eq!(
            meta::get_value(&db, meta::KEY_KDF_PARAMS).await.unwrap(),
            Some(b"new-params".to_vec())
        );
        assert_eq!(
            meta::get_value(&db, meta::KEY_CANARY_CIPHERTEXT).await.unwrap(),
            Some(b"new-canary".to_vec())
        );

        let stored_a = entries::get(&db, &id_a).await.unwrap().unwrap();
        assert_eq!(stored_a.1, b"new-a".to_vec());
        let stored_b = entries::get(&db, &id_b).await.unwrap().unwrap();
        assert_eq!(stored_b.1, b"new-b".to_vec());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn commit_with_no_entries_still_rewrites_canary() {
        let (db, _dir) = setup_db().await;
        meta::init_vault_meta(&db, vec![1u8; 16], b"p".to_vec(), vec![2u8; 12], b"c1".to_vec())
            .await
            .unwrap();

        commit_rekey(&db, b"p2".to_vec(), vec![8u8; 12], b"c2".to_vec(), Vec::new())
            .await
            .unwrap();

        assert_eq!(
            meta::get_value(&db, meta::KEY_CANARY_CIPHERTEXT).await.unwrap(),
            Some(b"c2".to_vec())
        );
        db.close().await.unwrap();
    }
}
