// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase acquisition via TTY prompt or PASSKEEP_VAULT_KEY environment
//! variable.

use passkeep_core::PasskeepError;
use secrecy::SecretString;

/// The environment variable name for providing the vault passphrase.
pub const VAULT_KEY_ENV_VAR: &str = "PASSKEEP_VAULT_KEY";

/// Get the vault passphrase from environment variable or interactive TTY
/// prompt.
///
/// Priority:
/// 1. `PASSKEEP_VAULT_KEY` environment variable (for scripts/CI)
/// 2. Interactive TTY prompt via `rpassword` (for human operators)
///
/// Returns an error if neither source is available.
pub fn get_vault_passphrase() -> Result<SecretString, PasskeepError> {
    // Check env var first.
    if let Ok(key) = std::env::var(VAULT_KEY_ENV_VAR)
        && !key.is_empty()
    {
        return Ok(SecretString::from(key));
    }

    // Try interactive prompt.
    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        eprint!("Vault passphrase: ");
        let passphrase = rpassword::read_password()
            .map_err(|e| PasskeepError::Internal(format!("failed to read passphrase: {e}")))?;
        if passphrase.is_empty() {
            return Err(PasskeepError::Config(
                "empty passphrase not allowed".to_string(),
            ));
        }
        return Ok(SecretString::from(passphrase));
    }

    Err(PasskeepError::Config(
        "No passphrase provided. Set PASSKEEP_VAULT_KEY environment variable or run interactively."
            .to_string(),
    ))
}

/// Get the vault passphrase with a confirmation prompt (for vault creation
/// and rotation).
///
/// Prompts twice and verifies the passphrases match. Only works in
/// interactive TTY mode; falls back to the env var if not a terminal.
pub fn get_vault_passphrase_with_confirm(prompt: &str) -> Result<SecretString, PasskeepError> {
    // Env var does not need confirmation.
    if let Ok(key) = std::env::var(VAULT_KEY_ENV_VAR)
        && !key.is_empty()
    {
        return Ok(SecretString::from(key));
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        eprint!("{prompt}: ");
        let pass1 = rpassword::read_password()
            .map_err(|e| PasskeepError::Internal(format!("failed to read passphrase: {e}")))?;
        eprint!("Confirm {}: ", lowercase_first(prompt));
        let pass2 = rpassword::read_password()
            .map_err(|e| PasskeepError::Internal(format!("failed to read passphrase: {e}")))?;

        if pass1 != pass2 {
            return Err(PasskeepError::Config("passphrases do not match".to_string()));
        }
        if pass1.is_empty() {
            return Err(PasskeepError::Config(
                "empty passphrase not allowed".to_string(),
            ));
        }
        return Ok(SecretString::from(pass1));
    }

    Err(PasskeepError::Config(
        "No passphrase provided. Set PASSKEEP_VAULT_KEY environment variable or run interactively."
            .to_string(),
    ))
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
