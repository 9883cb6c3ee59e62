// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Passkeep credential vault.

use thiserror::Error;

/// The primary error type used across all Passkeep crates.
///
/// The first five variants are the vault's failure taxonomy; callers can
/// match on them to distinguish a mistyped passphrase from tampered data
/// or an inconsistent store. The remaining variants cover configuration,
/// persistence, and crypto-primitive failures.
#[derive(Debug, Error)]
pub enum PasskeepError {
    /// The canary rejected the candidate key. The passphrase is wrong;
    /// the caller may re-prompt.
    #[error("wrong passphrase")]
    WrongPassphrase,

    /// An individual entry's authentication tag check failed. The record
    /// was tampered with or encrypted under a different key.
    #[error("entry authentication failed: ciphertext rejected")]
    AuthenticationFailed,

    /// Vault metadata is present but inconsistent (e.g. salt without a
    /// canary). Fatal; no automatic repair is attempted.
    #[error("corrupt vault: {0}")]
    CorruptVault(String),

    /// A passphrase rotation failed mid-flight and was fully rolled back.
    /// All entries and metadata are unchanged.
    #[error("rotation aborted: {0}")]
    RotationAborted(String),

    /// A vault operation was attempted before any vault exists.
    #[error("vault not initialized")]
    NotInitialized,

    /// Configuration errors (invalid TOML, missing fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Crypto primitive setup failures (bad key length, RNG failure).
    /// Distinct from [`PasskeepError::AuthenticationFailed`], which is a
    /// verdict about data, not a malfunction.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
