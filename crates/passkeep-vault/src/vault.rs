// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault lifecycle: open, unlock, save, retrieve, list, delete, and rotate.
//!
//! A [`Vault`] is an authenticated session: it exists only after the canary
//! has accepted the passphrase-derived key, and it owns that key for its
//! lifetime. There is no process-global key; independent vaults in one
//! process cannot interfere. Every stored password is sealed under the
//! session key with the entry's identity as associated data.

use passkeep_config::model::VaultConfig;
use passkeep_core::{EntryId, PasskeepError};
use passkeep_storage::Database;
use passkeep_storage::queries::{entries, meta};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::crypto::{self, KEY_LEN, NONCE_LEN};
use crate::kdf::{self, KdfParams, SALT_LEN};
use crate::{canary, rotate};

/// An open vault session, holding the derived key in memory.
///
/// Debug output intentionally omits the key.
pub struct Vault {
    /// The passphrase-derived key -- only in memory, never on disk.
    key: Zeroizing<[u8; KEY_LEN]>,
    /// Handle to the backing store.
    db: Database,
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault").field("key", &"[REDACTED]").finish()
    }
}

/// The decoded metadata of a sealed vault.
struct VaultMeta {
    salt: [u8; SALT_LEN],
    params: KdfParams,
    canary_nonce: [u8; NONCE_LEN],
    canary_ciphertext: Vec<u8>,
}

/// Read and decode vault metadata.
///
/// `Ok(None)` means a fresh store with no vault at all. Partially present
/// metadata -- salt without canary, canary without salt, or malformed field
/// lengths -- is corruption and is never repaired here.
async fn load_meta(db: &Database) -> Result<Option<VaultMeta>, PasskeepError> {
    let salt = meta::get_value(db, meta::KEY_KDF_SALT).await?;
    let params = meta::get_value(db, meta::KEY_KDF_PARAMS).await?;
    let canary_nonce = meta::get_value(db, meta::KEY_CANARY_NONCE).await?;
    let canary_ciphertext = meta::get_value(db, meta::KEY_CANARY_CIPHERTEXT).await?;

    match (salt, params, canary_nonce, canary_ciphertext) {
        (None, None, None, None) => Ok(None),
        (Some(salt), Some(params), Some(canary_nonce), Some(canary_ciphertext)) => {
            let salt: [u8; SALT_LEN] = salt.try_into().map_err(|_| {
                PasskeepError::CorruptVault(format!("salt must be {SALT_LEN} bytes"))
            })?;
            let canary_nonce: [u8; NONCE_LEN] = canary_nonce.try_into().map_err(|_| {
                PasskeepError::CorruptVault(format!("canary nonce must be {NONCE_LEN} bytes"))
            })?;
            let params = KdfParams::from_bytes(&params)?;
            Ok(Some(VaultMeta {
                salt,
                params,
                canary_nonce,
                canary_ciphertext,
            }))
        }
        _ => Err(PasskeepError::CorruptVault(
            "metadata is partially present (salt or canary missing)".to_string(),
        )),
    }
}

impl Vault {
    /// Check whether a vault has been created in this store.
    pub async fn exists(db: &Database) -> Result<bool, PasskeepError> {
        Ok(meta::get_value(db, meta::KEY_CANARY_CIPHERTEXT)
            .await?
            .is_some())
    }

    /// Open a vault: unlock an existing one, or create a fresh one if the
    /// store holds no vault yet.
    ///
    /// On a fresh store the salt, KDF parameters, and sealed canary are
    /// written in a single transaction, so no partial metadata can ever be
    /// observed. On an existing store the canary decides: a rejected tag is
    /// [`PasskeepError::WrongPassphrase`].
    pub async fn open(
        db: Database,
        passphrase: &SecretString,
        config: &VaultConfig,
    ) -> Result<Self, PasskeepError> {
        match load_meta(&db).await? {
            None => Self::create(db, passphrase, config).await,
            Some(vault_meta) => Self::unlock_with(db, passphrase, vault_meta).await,
        }
    }

    /// Unlock an existing vault only; a store without a vault yields
    /// [`PasskeepError::NotInitialized`].
    pub async fn unlock(db: Database, passphrase: &SecretString) -> Result<Self, PasskeepError> {
        match load_meta(&db).await? {
            None => Err(PasskeepError::NotInitialized),
            Some(vault_meta) => Self::unlock_with(db, passphrase, vault_meta).await,
        }
    }

    /// First-time vault creation.
    async fn create(
        db: Database,
        passphrase: &SecretString,
        config: &VaultConfig,
    ) -> Result<Self, PasskeepError> {
        let salt = kdf::generate_salt()?;
        let params = KdfParams::from(config);
        let key = kdf::derive_key(passphrase.expose_secret().as_bytes(), &salt, &params)?;
        let (canary_nonce, canary_ciphertext) = canary::seal(&key)?;

        meta::init_vault_meta(
            &db,
            salt.to_vec(),
            params.to_bytes()?,
            canary_nonce.to_vec(),
            canary_ciphertext,
        )
        .await?;

        info!("vault created");
        Ok(Self { key, db })
    }

    /// Derive a candidate key and test it against the canary.
    async fn unlock_with(
        db: Database,
        passphrase: &SecretString,
        vault_meta: VaultMeta,
    ) -> Result<Self, PasskeepError> {
        let key = kdf::derive_key(
            passphrase.expose_secret().as_bytes(),
            &vault_meta.salt,
            &vault_meta.params,
        )?;

        canary::verify(
            &key,
            &vault_meta.canary_nonce,
            &vault_meta.canary_ciphertext,
        )?;

        debug!("vault unlocked");
        Ok(Self { key, db })
    }

    /// Store a password for `(username, platform)`, sealed under the session
    /// key with the identity as associated data.
    ///
    /// Saving to an existing identity replaces its sealed payload (upsert);
    /// no duplicate entry is created.
    pub async fn save_entry(
        &self,
        username: &str,
        platform: &str,
        password: &str,
    ) -> Result<(), PasskeepError> {
        let id = EntryId::new(username, platform);
        let (ciphertext, nonce) = crypto::seal(&self.key, &id.aad(), password.as_bytes())?;
        entries::upsert(&self.db, &id, nonce.to_vec(), ciphertext).await?;
        debug!(identity = %id, "entry stored");
        Ok(())
    }

    /// Retrieve and decrypt the password for `(username, platform)`.
    ///
    /// `Ok(None)` if the identity was never stored. A stored entry whose tag
    /// check fails -- tampering, or ciphertext moved from another identity --
    /// is [`PasskeepError::AuthenticationFailed`], never a best-guess
    /// plaintext.
    pub async fn get_entry(
        &self,
        username: &str,
        platform: &str,
    ) -> Result<Option<SecretString>, PasskeepError> {
        let id = EntryId::new(username, platform);
        let Some((nonce, ciphertext)) = entries::get(&self.db, &id).await? else {
            return Ok(None);
        };

        let nonce: [u8; NONCE_LEN] = nonce.try_into().map_err(|_| {
            PasskeepError::CorruptVault(format!("entry {id} nonce must be {NONCE_LEN} bytes"))
        })?;
        let plaintext = crypto::open(&self.key, &id.aad(), &nonce, &ciphertext)?;
        let password = String::from_utf8(plaintext)
            .map_err(|e| PasskeepError::Internal(format!("decrypted value is not UTF-8: {e}")))?;

        Ok(Some(SecretString::from(password)))
    }

    /// Delete an entry. Returns `false` if the identity was never stored;
    /// nothing is mutated in that case.
    pub async fn delete_entry(
        &self,
        username: &str,
        platform: &str,
    ) -> Result<bool, PasskeepError> {
        let id = EntryId::new(username, platform);
        let deleted = entries::delete(&self.db, &id).await?;
        if deleted {
            debug!(identity = %id, "entry deleted");
        }
        Ok(deleted)
    }

    /// List all stored identities, ordered by username then platform.
    /// Plaintext never appears here; nothing is decrypted.
    pub async fn list_entries(&self) -> Result<Vec<EntryId>, PasskeepError> {
        entries::list_identities(&self.db).await
    }

    /// Rotate the master passphrase.
    ///
    /// Delegates to [`rotate::run`], which verifies the old passphrase,
    /// re-encrypts every entry under the new key in memory, and commits the
    /// whole result -- entries, canary, KDF parameters -- in one
    /// transaction. Only after that commit does this session start using
    /// the new key. On any failure the vault is byte-for-byte unchanged and
    /// the session keeps its current key.
    pub async fn rotate_passphrase(
        &mut self,
        old_passphrase: &SecretString,
        new_passphrase: &SecretString,
        config: &VaultConfig,
    ) -> Result<(), PasskeepError> {
        let new_key = rotate::run(&self.db, old_passphrase, new_passphrase, config).await?;
        self.key = new_key;
        info!("vault passphrase rotated");
        Ok(())
    }

    /// Close the session. The derived key is zeroized on drop.
    pub async fn close(self) -> Result<(), PasskeepError> {
        self.db.close().await
    }

    /// Returns a handle to the backing store.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Test-specific VaultConfig with low cost for fast tests.
    fn test_config() -> VaultConfig {
        VaultConfig {
            kdf_memory_cost: 32768,
            kdf_iterations: 2,
            kdf_parallelism: 1,
        }
    }

    async fn open_test_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test_vault.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn create_and_unlock_lifecycle() {
        let (db, _dir) = open_test_db().await;
        let passphrase = SecretString::from("correct-horse".to_string());

        assert!(!Vault::exists(&db).await.unwrap());

        let vault = Vault::open(db.clone(), &passphrase, &test_config())
            .await
            .unwrap();
        assert!(Vault::exists(&db).await.unwrap());

        vault
            .save_entry("alice", "example.com", "p@ss1")
            .await
            .unwrap();

        // Drop vault (simulates process restart).
        drop(vault);

        let vault2 = Vault::open(db, &passphrase, &test_config()).await.unwrap();
        let retrieved = vault2.get_entry("alice", "example.com").await.unwrap();
        assert_eq!(retrieved.unwrap().expose_secret(), "p@ss1");
    }

    #[tokio::test]
    async fn wrong_passphrase_is_rejected_before_any_entry_access() {
        let (db, _dir) = open_test_db().await;
        let good = SecretString::from("correct-horse".to_string());
        let bad = SecretString::from("wrong".to_string());

        let vault = Vault::open(db.clone(), &good, &test_config()).await.unwrap();
        vault.save_entry("alice", "example.com", "p@ss1").await.unwrap();
        drop(vault);

        let result = Vault::open(db, &bad, &test_config()).await;
        assert!(matches!(result, Err(PasskeepError::WrongPassphrase)));
    }

    #[tokio::test]
    async fn unlock_without_vault_is_not_initialized() {
        let (db, _dir) = open_test_db().await;
        let passphrase = SecretString::from("anything".to_string());

        let result = Vault::unlock(db, &passphrase).await;
        assert!(matches!(result, Err(PasskeepError::NotInitialized)));
    }

    #[tokio::test]
    async fn partial_metadata_is_corrupt_not_fresh() {
        use passkeep_storage::queries::meta;

        let (db, _dir) = open_test_db().await;
        // Salt alone, no canary: must refuse, not silently re-initialize.
        meta::put_value(&db, meta::KEY_KDF_SALT, vec![0u8; 16])
            .await
            .unwrap();

        let passphrase = SecretString::from("anything".to_string());
        let result = Vault::open(db, &passphrase, &test_config()).await;
        assert!(matches!(result, Err(PasskeepError::CorruptVault(_))));
    }

    #[tokio::test]
    async fn get_missing_entry_returns_none() {
        let (db, _dir) = open_test_db().await;
        let passphrase = SecretString::from("pw".to_string());

        let vault = Vault::open(db, &passphrase, &test_config()).await.unwrap();
        let result = vault.get_entry("nobody", "nowhere").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn save_on_same_identity_overwrites() {
        let (db, _dir) = open_test_db().await;
        let passphrase = SecretString::from("pw".to_string());

        let vault = Vault::open(db, &passphrase, &test_config()).await.unwrap();
        vault.save_entry("alice", "example.com", "first").await.unwrap();
        vault.save_entry("alice", "example.com", "second").await.unwrap();

        let got = vault.get_entry("alice", "example.com").await.unwrap();
        assert_eq!(got.unwrap().expose_secret(), "second");

        let ids = vault.list_entries().await.unwrap();
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    async fn delete_entry_reports_whether_it_existed() {
        let (db, _dir) = open_test_db().await;
        let passphrase = SecretString::from("pw".to_string());

        let vault = Vault::open(db, &passphrase, &test_config()).await.unwrap();
        assert!(!vault.delete_entry("ghost", "nowhere").await.unwrap());

        vault.save_entry("alice", "example.com", "pw1").await.unwrap();
        assert!(vault.delete_entry("alice", "example.com").await.unwrap());
        assert!(vault.get_entry("alice", "example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_ordered_and_never_contains_plaintext() {
        let (db, _dir) = open_test_db().await;
        let passphrase = SecretString::from("pw".to_string());

        let vault = Vault::open(db, &passphrase, &test_config()).await.unwrap();
        vault.save_entry("bob", "a.com", "pw-b").await.unwrap();
        vault.save_entry("alice", "z.com", "pw-a2").await.unwrap();
        vault.save_entry("alice", "a.com", "pw-a1").await.unwrap();

        let ids = vault.list_entries().await.unwrap();
        assert_eq!(
            ids,
            vec![
                EntryId::new("alice", "a.com"),
                EntryId::new("alice", "z.com"),
                EntryId::new("bob", "a.com"),
            ]
        );
    }

    #[tokio::test]
    async fn swapped_ciphertext_fails_authentication() {
        use passkeep_storage::queries::entries;

        let (db, _dir) = open_test_db().await;
        let passphrase = SecretString::from("pw".to_string());

        let vault = Vault::open(db.clone(), &passphrase, &test_config())
            .await
            .unwrap();
        vault.save_entry("alice", "example.com", "alice-pw").await.unwrap();
        vault.save_entry("bob", "example.com", "bob-pw").await.unwrap();

        // Graft alice's sealed payload onto bob's identity.
        let alice = EntryId::new("alice", "example.com");
        let bob = EntryId::new("bob", "example.com");
        let (alice_nonce, alice_ct) = entries::get(&db, &alice).await.unwrap().unwrap();
        entries::upsert(&db, &bob, alice_nonce, alice_ct).await.unwrap();

        // The identity is bound as AAD: bob's slot must now fail, never
        // yield alice's password.
        let result = vault.get_entry("bob", "example.com").await;
        assert!(matches!(result, Err(PasskeepError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn tampered_entry_fails_authentication() {
        use passkeep_storage::queries::entries;

        let (db, _dir) = open_test_db().await;
        let passphrase = SecretString::from("pw".to_string());

        let vault = Vault::open(db.clone(), &passphrase, &test_config())
            .await
            .unwrap();
        vault.save_entry("alice", "example.com", "secret").await.unwrap();

        let id = EntryId::new("alice", "example.com");
        let (nonce, mut ct) = entries::get(&db, &id).await.unwrap().unwrap();
        ct[0] ^= 0x01;
        entries::upsert(&db, &id, nonce, ct).await.unwrap();

        let result = vault.get_entry("alice", "example.com").await;
        assert!(matches!(result, Err(PasskeepError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn salt_is_stable_across_reopens() {
        use passkeep_storage::queries::meta;

        let (db, _dir) = open_test_db().await;
        let passphrase = SecretString::from("pw".to_string());

        let vault = Vault::open(db.clone(), &passphrase, &test_config())
            .await
            .unwrap();
        let salt1 = meta::get_value(&db, meta::KEY_KDF_SALT).await.unwrap();
        drop(vault);

        let _vault = Vault::open(db.clone(), &passphrase, &test_config())
            .await
            .unwrap();
        let salt2 = meta::get_value(&db, meta::KEY_KDF_SALT).await.unwrap();

        assert!(salt1.is_some());
        assert_eq!(salt1, salt2);
    }

    #[tokio::test]
    async fn debug_output_redacts_the_key() {
        let (db, _dir) = open_test_db().await;
        let passphrase = SecretString::from("pw".to_string());

        let vault = Vault::open(db, &passphrase, &test_config()).await.unwrap();
        let rendered = format!("{vault:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("pw"));
    }
}
