// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM encrypted vault engine for the Passkeep credential vault.
//!
//! The master passphrase is stretched into a 32-byte key via Argon2id; a
//! sealed known-plaintext canary authenticates a candidate key before any
//! real entry is touched. Each stored password is sealed with its own
//! identity as associated data, and passphrase rotation re-encrypts every
//! entry inside one atomic commit.

pub mod canary;
pub mod crypto;
pub mod kdf;
pub mod prompt;
pub mod rotate;
pub mod vault;

pub use prompt::{get_vault_passphrase, get_vault_passphrase_with_confirm};
pub use vault::Vault;
