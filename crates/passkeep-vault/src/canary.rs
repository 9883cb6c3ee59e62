// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The canary: a sealed known-plaintext marker that authenticates a
//! candidate key without decrypting any real entry.
//!
//! Sealed once at vault creation and resealed on every rotation. The GCM
//! tag check over the marker IS the passphrase test; the decrypted bytes
//! are additionally compared against the marker constant so correctness
//! never rests on the primitive alone.

use passkeep_core::PasskeepError;
use ring::constant_time;

use crate::crypto::{self, KEY_LEN, NONCE_LEN};

/// The marker plaintext. Not secret; its only job is to be known.
const CANARY_MARKER: &[u8] = b"vault-canary";

/// Associated data binding the canary ciphertext to its role, so an entry
/// ciphertext can never be passed off as a canary or vice versa.
const CANARY_AAD: &[u8] = b"passkeep-canary";

/// Seal the marker under `key` with a fresh nonce.
///
/// Called at vault creation and at the end of every rotation.
pub fn seal(key: &[u8; KEY_LEN]) -> Result<([u8; NONCE_LEN], Vec<u8>), PasskeepError> {
    let (ciphertext, nonce) = crypto::seal(key, CANARY_AAD, CANARY_MARKER)?;
    Ok((nonce, ciphertext))
}

/// Verify a candidate key against the stored canary.
///
/// Returns [`PasskeepError::WrongPassphrase`] if the tag check fails or the
/// decrypted bytes are not the marker. No partial plaintext is exposed
/// either way.
pub fn verify(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<(), PasskeepError> {
    let decrypted =
        crypto::open(key, CANARY_AAD, nonce, ciphertext).map_err(|e| match e {
            PasskeepError::AuthenticationFailed => PasskeepError::WrongPassphrase,
            other => other,
        })?;

    constant_time::verify_slices_are_equal(&decrypted, CANARY_MARKER)
        .map_err(|_| PasskeepError::WrongPassphrase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ring::rand::{SecureRandom, SystemRandom};

    fn random_key() -> [u8; KEY_LEN] {
        let rng = SystemRandom::new();
        let mut key = [0u8; KEY_LEN];
        rng.fill(&mut key).unwrap();
        key
    }

    #[test]
    fn seal_then_verify_succeeds() {
        let key = random_key();
        let (nonce, ciphertext) = seal(&key).unwrap();
        assert!(verify(&key, &nonce, &ciphertext).is_ok());
    }

    #[test]
    fn verify_with_wrong_key_reports_wrong_passphrase() {
        let key = random_key();
        let other = random_key();
        let (nonce, ciphertext) = seal(&key).unwrap();

        let result = verify(&other, &nonce, &ciphertext);
        assert!(matches!(result, Err(PasskeepError::WrongPassphrase)));
    }

    #[test]
    fn tampered_canary_reports_wrong_passphrase() {
        let key = random_key();
        let (nonce, mut ciphertext) = seal(&key).unwrap();
        ciphertext[0] ^= 0x01;

        let result = verify(&key, &nonce, &ciphertext);
        assert!(matches!(result, Err(PasskeepError::WrongPassphrase)));
    }

    #[test]
    fn entry_ciphertext_cannot_pose_as_canary() {
        // Sealed under the same key but with entry AAD, not the canary AAD.
        let key = random_key();
        let (ciphertext, nonce) = crypto::seal(&key, b"alice@example.com", CANARY_MARKER).unwrap();

        let result = verify(&key, &nonce, &ciphertext);
        assert!(matches!(result, Err(PasskeepError::WrongPassphrase)));
    }

    #[test]
    fn reseal_uses_a_fresh_nonce() {
        let key = random_key();
        let (nonce1, _) = seal(&key).unwrap();
        let (nonce2, _) = seal(&key).unwrap();
        assert_ne!(nonce1, nonce2);
    }
}
