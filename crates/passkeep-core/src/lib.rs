// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Passkeep credential vault.
//!
//! Provides the error taxonomy and the shared domain types used throughout
//! the Passkeep workspace.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PasskeepError;
pub use types::{EntryId, SealedEntry};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_has_all_vault_variants() {
        // Verify the vault failure taxonomy can be constructed and matched.
        let variants = [
            PasskeepError::WrongPassphrase,
            PasskeepError::AuthenticationFailed,
            PasskeepError::CorruptVault("salt without canary".into()),
            PasskeepError::RotationAborted("entry failed to decrypt".into()),
            PasskeepError::NotInitialized,
        ];
        for v in &variants {
            assert!(!v.to_string().is_empty());
        }

        let _config = PasskeepError::Config("test".into());
        let _storage = PasskeepError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _crypto = PasskeepError::Crypto("test".into());
        let _internal = PasskeepError::Internal("test".into());
    }

    #[test]
    fn wrong_passphrase_message_leaks_nothing() {
        let err = PasskeepError::WrongPassphrase;
        assert_eq!(err.to_string(), "wrong passphrase");
    }
}
