// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Passkeep workspace.

use serde::{Deserialize, Serialize};

/// The unique identity of a stored credential: a `(username, platform)` pair.
///
/// No two entries in a vault share both fields. The identity is also the
/// associated data bound into each entry's ciphertext, so a ciphertext
/// moved to a different identity fails authentication instead of decrypting
/// to the wrong password.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId {
    pub username: String,
    pub platform: String,
}

impl EntryId {
    pub fn new(username: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            platform: platform.into(),
        }
    }

    /// Canonical byte encoding of the identity, used as AEAD associated data.
    ///
    /// Each field is length-prefixed (little-endian u32) rather than joined
    /// with a separator, so no two distinct identities can encode to the
    /// same bytes regardless of field content.
    pub fn aad(&self) -> Vec<u8> {
        let username = self.username.as_bytes();
        let platform = self.platform.as_bytes();
        let mut out = Vec::with_capacity(8 + username.len() + platform.len());
        out.extend_from_slice(&(username.len() as u32).to_le_bytes());
        out.extend_from_slice(username);
        out.extend_from_slice(&(platform.len() as u32).to_le_bytes());
        out.extend_from_slice(platform);
        out
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.username, self.platform)
    }
}

/// One stored credential as it exists on disk: identity plus the sealed
/// `(nonce, ciphertext)` pair. The plaintext password never appears here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedEntry {
    pub identity: EntryId,
    pub nonce: Vec<u8>,
    pub ciphertext: Vec<u8>,
}
