// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations with associated data.
//!
//! Every call to [`seal`] generates a fresh random 96-bit nonce via the
//! system CSPRNG. Nonce reuse would be catastrophic for GCM security.
//!
//! The associated data is authenticated but not encrypted: a ciphertext
//! sealed under one AAD fails to open under any other. The vault passes an
//! entry's canonical identity encoding here, which is what makes moving a
//! ciphertext between identities an authentication failure instead of a
//! silent wrong-password read.

use passkeep_core::PasskeepError;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};

/// Length of the AES-256-GCM nonce in bytes (96 bits).
pub const NONCE_LEN: usize = 12;
/// Length of the AES-256-GCM key in bytes.
pub const KEY_LEN: usize = 32;

/// Encrypt plaintext with AES-256-GCM, binding `aad`, using a random nonce.
///
/// Returns `(ciphertext_with_tag, nonce_bytes)`. The caller must store both
/// the ciphertext and the nonce to be able to decrypt later.
pub fn seal(
    key: &[u8; KEY_LEN],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; NONCE_LEN]), PasskeepError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| PasskeepError::Crypto("failed to create AES-256-GCM key".to_string()))?;
    let less_safe = LessSafeKey::new(unbound);

    // Generate random 96-bit nonce.
    let rng = SystemRandom::new();
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill(&mut nonce_bytes)
        .map_err(|_| PasskeepError::Crypto("failed to generate random nonce".to_string()))?;

    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    // Seal in place: plaintext buffer is extended with the authentication tag.
    let mut in_out = plaintext.to_vec();
    less_safe
        .seal_in_place_append_tag(nonce, Aad::from(aad), &mut in_out)
        .map_err(|_| PasskeepError::Crypto("AES-256-GCM encryption failed".to_string()))?;

    Ok((in_out, nonce_bytes))
}

/// Decrypt ciphertext with AES-256-GCM under the same `aad`.
///
/// `ciphertext` must include the 16-byte authentication tag appended by
/// [`seal`]. A wrong key, wrong associated data, or tampered ciphertext all
/// surface as the same [`PasskeepError::AuthenticationFailed`] -- no partial
/// plaintext ever escapes.
pub fn open(
    key: &[u8; KEY_LEN],
    aad: &[u8],
    nonce_bytes: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, PasskeepError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| PasskeepError::Crypto("failed to create AES-256-GCM key".to_string()))?;
    let less_safe = LessSafeKey::new(unbound);

    let nonce = Nonce::assume_unique_for_key(*nonce_bytes);

    let mut in_out = ciphertext.to_vec();
    let plaintext = less_safe
        .open_in_place(nonce, Aad::from(aad), &mut in_out)
        .map_err(|_| PasskeepError::AuthenticationFailed)?;

    Ok(plaintext.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn random_key() -> [u8; KEY_LEN] {
        let rng = SystemRandom::new();
        let mut key = [0u8; KEY_LEN];
        rng.fill(&mut key).unwrap();
        key
    }

    #[test]
    fn seal_open_roundtrip() {
        let key = random_key();
        let plaintext = b"p@ssw0rd value";

        let (ciphertext, nonce) = seal(&key, b"identity", plaintext).unwrap();
        let decrypted = open(&key, b"identity", &nonce, &ciphertext).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn seal_produces_different_ciphertext_for_same_plaintext() {
        let key = random_key();
        let plaintext = b"same input twice";

        let (ct1, nonce1) = seal(&key, b"id", plaintext).unwrap();
        let (ct2, nonce2) = seal(&key, b"id", plaintext).unwrap();

        // Random nonces should differ.
        assert_ne!(nonce1, nonce2);
        // Ciphertext should differ due to different nonces.
        assert_ne!(ct1, ct2);
    }

    #[test]
    fn open_with_wrong_key_fails() {
        let key1 = random_key();
        let key2 = random_key();

        let (ciphertext, nonce) = seal(&key1, b"id", b"secret data").unwrap();
        let result = open(&key2, b"id", &nonce, &ciphertext);

        assert!(matches!(result, Err(PasskeepError::AuthenticationFailed)));
    }

    #[test]
    fn open_with_wrong_aad_fails() {
        let key = random_key();

        let (ciphertext, nonce) = seal(&key, b"alice@example.com", b"secret").unwrap();
        let result = open(&key, b"bob@example.com", &nonce, &ciphertext);

        assert!(matches!(result, Err(PasskeepError::AuthenticationFailed)));
    }

    #[test]
    fn tampered_ciphertext_fails_decryption() {
        let key = random_key();

        let (mut ciphertext, nonce) = seal(&key, b"id", b"do not tamper").unwrap();
        // Flip a bit.
        ciphertext[0] ^= 0x01;

        let result = open(&key, b"id", &nonce, &ciphertext);
        assert!(matches!(result, Err(PasskeepError::AuthenticationFailed)));
    }

    #[test]
    fn ciphertext_is_longer_than_plaintext() {
        let key = random_key();

        let (ciphertext, _) = seal(&key, b"id", b"hello").unwrap();

        // Ciphertext includes 16-byte GCM tag.
        assert_eq!(ciphertext.len(), 5 + 16);
    }

    #[test]
    fn nonces_do_not_collide_across_many_seals() {
        let key = random_key();
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let (_, nonce) = seal(&key, b"id", b"x").unwrap();
            assert!(seen.insert(nonce), "nonce collision under the same key");
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn roundtrip_holds_for_arbitrary_plaintext_and_aad(
            plaintext in proptest::collection::vec(any::<u8>(), 0..256),
            aad in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let key = random_key();
            let (ciphertext, nonce) = seal(&key, &aad, &plaintext).unwrap();
            let decrypted = open(&key, &aad, &nonce, &ciphertext).unwrap();
            prop_assert_eq!(decrypted, plaintext);
        }
    }
}
