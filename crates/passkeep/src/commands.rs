// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One function per subcommand. Each opens its own session against the
//! configured store and closes it before returning.

use colored::Colorize;
use passkeep_config::PasskeepConfig;
use passkeep_core::PasskeepError;
use passkeep_storage::Database;
use passkeep_vault::{Vault, prompt};
use secrecy::ExposeSecret;

use crate::generate::{self, GeneratorOptions};
use crate::strength;

/// Open the store and unlock the vault with a prompted passphrase.
async fn open_session(config: &PasskeepConfig) -> Result<Vault, PasskeepError> {
    let db = Database::open(&config.storage.database_path).await?;
    if !Vault::exists(&db).await? {
        return Err(PasskeepError::NotInitialized);
    }
    let passphrase = prompt::get_vault_passphrase()?;
    Vault::unlock(db, &passphrase).await
}

/// Read a password from the terminal without echo.
fn read_password(prompt_text: &str) -> Result<String, PasskeepError> {
    eprint!("{prompt_text}: ");
    rpassword::read_password()
        .map_err(|e| PasskeepError::Internal(format!("failed to read password: {e}")))
}

/// `passkeep init` - create a fresh vault.
pub async fn cmd_init(config: &PasskeepConfig) -> Result<(), PasskeepError> {
    let db = Database::open(&config.storage.database_path).await?;
    if Vault::exists(&db).await? {
        println!(
            "A vault already exists at {}.",
            config.storage.database_path
        );
        return db.close().await;
    }

    let passphrase = prompt::get_vault_passphrase_with_confirm("New vault passphrase")?;
    let vault = Vault::open(db, &passphrase, &config.vault).await?;
    vault.close().await?;
    println!("Vault created at {}.", config.storage.database_path);
    Ok(())
}

/// `passkeep add` - store one credential.
pub async fn cmd_add(
    config: &PasskeepConfig,
    username: &str,
    platform: &str,
    generate_password: bool,
    length: usize,
) -> Result<(), PasskeepError> {
    if username.trim().is_empty() || platform.trim().is_empty() {
        return Err(PasskeepError::Config(
            "username and platform must not be empty".to_string(),
        ));
    }

    let vault = open_session(config).await?;

    let password = if generate_password {
        let password = generate::generate(&GeneratorOptions {
            length,
            ..GeneratorOptions::default()
        });
        println!("Generated password: {}", password.yellow());
        password
    } else {
        let password = read_password(&format!("Password for {username}@{platform}"))?;
        if password.is_empty() {
            return Err(PasskeepError::Config("password must not be empty".to_string()));
        }
        password
    };

    println!("Strength: {}", strength::classify(&password));
    vault.save_entry(username, platform, &password).await?;
    vault.close().await?;
    println!("Saved {username}@{platform}.");
    Ok(())
}

/// `passkeep get` - print one stored password.
pub async fn cmd_get(
    config: &PasskeepConfig,
    username: &str,
    platform: &str,
) -> Result<(), PasskeepError> {
    let vault = open_session(config).await?;
    let entry = vault.get_entry(username, platform).await?;
    vault.close().await?;

    match entry {
        Some(password) => {
            println!("{}", password.expose_secret());
            Ok(())
        }
        None => {
            eprintln!("No entry for {username}@{platform}.");
            Ok(())
        }
    }
}

/// `passkeep list` - tabulate stored identities.
pub async fn cmd_list(config: &PasskeepConfig) -> Result<(), PasskeepError> {
    let vault = open_session(config).await?;
    let ids = vault.list_entries().await?;
    vault.close().await?;

    if ids.is_empty() {
        println!("No entries saved yet.");
        return Ok(());
    }

    println!("{:<32} {}", "USERNAME".bold(), "PLATFORM".bold());
    for id in ids {
        println!("{:<32} {}", id.username, id.platform);
    }
    Ok(())
}

/// `passkeep delete` - remove one entry.
pub async fn cmd_delete(
    config: &PasskeepConfig,
    username: &str,
    platform: &str,
) -> Result<(), PasskeepError> {
    let vault = open_session(config).await?;
    let deleted = vault.delete_entry(username, platform).await?;
    vault.close().await?;

    if deleted {
        println!("Deleted {username}@{platform}.");
    } else {
        eprintln!("No entry for {username}@{platform}.");
    }
    Ok(())
}

/// `passkeep rotate` - change the master passphrase.
///
/// Prompts are always interactive here: the env var fallback would feed the
/// same value as both old and new passphrase.
pub async fn cmd_rotate(config: &PasskeepConfig) -> Result<(), PasskeepError> {
    let db = Database::open(&config.storage.database_path).await?;
    if !Vault::exists(&db).await? {
        return Err(PasskeepError::NotInitialized);
    }

    let old = secrecy::SecretString::from(read_password("Current vault passphrase")?);
    let mut vault = Vault::unlock(db, &old).await?;

    let new1 = read_password("New vault passphrase")?;
    let new2 = read_password("Confirm new vault passphrase")?;
    if new1 != new2 {
        return Err(PasskeepError::Config("passphrases do not match".to_string()));
    }
    if new1.is_empty() {
        return Err(PasskeepError::Config(
            "empty passphrase not allowed".to_string(),
        ));
    }
    let new = secrecy::SecretString::from(new1);

    vault.rotate_passphrase(&old, &new, &config.vault).await?;
    vault.close().await?;
    println!("Passphrase rotated; all entries re-encrypted.");
    Ok(())
}

/// `passkeep generate` - stateless password generation.
pub fn cmd_generate(
    length: usize,
    no_upper: bool,
    no_lower: bool,
    no_digits: bool,
    no_symbols: bool,
) -> Result<(), PasskeepError> {
    let options = GeneratorOptions {
        length,
        uppercase: !no_upper,
        lowercase: !no_lower,
        digits: !no_digits,
        symbols: !no_symbols,
    };
    let password = generate::generate(&options);
    println!("{password}");
    eprintln!("Strength: {}", strength::classify(&password));
    Ok(())
}
