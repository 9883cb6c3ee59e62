// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `passkeep shell` - the interactive menu.
//!
//! One vault session per shell invocation, with a numbered menu over the
//! same operations the subcommands expose. Errors inside a menu action are
//! printed and the menu continues; only I/O-level failures end the shell.

use colored::Colorize;
use passkeep_config::PasskeepConfig;
use passkeep_core::PasskeepError;
use passkeep_storage::Database;
use passkeep_vault::{Vault, prompt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use secrecy::{ExposeSecret, SecretString};

use crate::generate::{self, GeneratorOptions};
use crate::strength;

/// Runs the interactive menu loop.
pub async fn run_shell(config: &PasskeepConfig) -> Result<(), PasskeepError> {
    let db = Database::open(&config.storage.database_path).await?;

    let passphrase = if Vault::exists(&db).await? {
        prompt::get_vault_passphrase()?
    } else {
        println!(
            "No vault found; creating one at {}.",
            config.storage.database_path
        );
        prompt::get_vault_passphrase_with_confirm("New vault passphrase")?
    };
    let mut vault = Vault::open(db, &passphrase, &config.vault).await?;

    let mut rl = DefaultEditor::new()
        .map_err(|e| PasskeepError::Internal(format!("readline init failed: {e}")))?;

    loop {
        print_menu();
        let line = match rl.readline("passkeep> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(PasskeepError::Internal(format!("readline error: {e}"))),
        };

        let action = match line.trim() {
            "" => continue,
            "1" => generate_flow(&mut rl, &vault).await,
            "2" => save_flow(&mut rl, &vault).await,
            "3" => list_flow(&vault).await,
            "4" => reveal_flow(&mut rl, &vault).await,
            "5" => delete_flow(&mut rl, &vault).await,
            "6" => rotate_flow(&mut vault, &config.vault).await,
            "7" | "q" | "quit" | "exit" => break,
            other => {
                println!("Unknown option `{other}`; choose 1-7.");
                Ok(())
            }
        };

        // A failed action (wrong passphrase on rotate, tampered entry, ...)
        // should not kill the session.
        if let Err(e) = action {
            eprintln!("{}", format!("error: {e}").red());
        }
    }

    println!("Goodbye.");
    vault.close().await
}

fn print_menu() {
    println!();
    println!("{}", "passkeep - local credential vault".bold());
    println!("  1. Generate a random password");
    println!("  2. Save a password");
    println!("  3. List saved entries");
    println!("  4. Reveal a password");
    println!("  5. Delete an entry");
    println!("  6. Change master passphrase");
    println!("  7. Quit");
}

/// Read a line, re-prompting until it is non-empty. `None` means the user
/// cancelled with Ctrl-C/Ctrl-D.
fn read_nonempty(rl: &mut DefaultEditor, prompt_text: &str) -> Result<Option<String>, PasskeepError> {
    loop {
        match rl.readline(&format!("{prompt_text}: ")) {
            Ok(line) => {
                let trimmed = line.trim().to_string();
                if trimmed.is_empty() {
                    println!("Answer must not be empty.");
                    continue;
                }
                return Ok(Some(trimmed));
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(None),
            Err(e) => return Err(PasskeepError::Internal(format!("readline error: {e}"))),
        }
    }
}

fn read_hidden(prompt_text: &str) -> Result<String, PasskeepError> {
    eprint!("{prompt_text}: ");
    rpassword::read_password()
        .map_err(|e| PasskeepError::Internal(format!("failed to read password: {e}")))
}

async fn generate_flow(rl: &mut DefaultEditor, vault: &Vault) -> Result<(), PasskeepError> {
    let length = match rl.readline("Password length (default 16): ") {
        Ok(line) => {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                16
            } else {
                match trimmed.parse::<usize>() {
                    Ok(n) if n > 0 => n,
                    _ => {
                        println!("Length must be a positive integer.");
                        return Ok(());
                    }
                }
            }
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(()),
        Err(e) => return Err(PasskeepError::Internal(format!("readline error: {e}"))),
    };

    let password = generate::generate(&GeneratorOptions {
        length,
        ..GeneratorOptions::default()
    });
    println!("Generated: {}", password.yellow());
    println!("Strength: {}", strength::classify(&password));

    match rl.readline("Save it? (y/N): ") {
        Ok(answer) if answer.trim().eq_ignore_ascii_case("y") => {
            let Some(username) = read_nonempty(rl, "Username or email")? else {
                return Ok(());
            };
            let Some(platform) = read_nonempty(rl, "Platform (e.g. example.com)")? else {
                return Ok(());
            };
            vault.save_entry(&username, &platform, &password).await?;
            println!("Saved {username}@{platform}.");
        }
        Ok(_) => {}
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {}
        Err(e) => return Err(PasskeepError::Internal(format!("readline error: {e}"))),
    }
    Ok(())
}

async fn save_flow(rl: &mut DefaultEditor, vault: &Vault) -> Result<(), PasskeepError> {
    let Some(username) = read_nonempty(rl, "Username or email")? else {
        return Ok(());
    };
    let Some(platform) = read_nonempty(rl, "Platform (e.g. example.com)")? else {
        return Ok(());
    };
    let password = read_hidden("Password")?;
    if password.is_empty() {
        println!("Password must not be empty.");
        return Ok(());
    }

    println!("Strength: {}", strength::classify(&password));
    vault.save_entry(&username, &platform, &password).await?;
    println!("Saved {username}@{platform}.");
    Ok(())
}

async fn list_flow(vault: &Vault) -> Result<(), PasskeepError> {
    let ids = vault.list_entries().await?;
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

async fn reveal_flow(rl: &mut DefaultEditor, vault: &Vault) -> Result<(), PasskeepError> {
    let Some(username) = read_nonempty(rl, "Username or email")? else {
        return Ok(());
    };
    let Some(platform) = read_nonempty(rl, "Platform")? else {
        return Ok(());
    };

    match vault.get_entry(&username, &platform).await? {
        Some(password) => println!("{}", password.expose_secret().yellow()),
        None => println!("No entry for {username}@{platform}."),
    }
    Ok(())
}

async fn delete_flow(rl: &mut DefaultEditor, vault: &Vault) -> Result<(), PasskeepError> {
    let Some(username) = read_nonempty(rl, "Username or email")? else {
        return Ok(());
    };
    let Some(platform) = read_nonempty(rl, "Platform")? else {
        return Ok(());
    };

    if vault.delete_entry(&username, &platform).await? {
        println!("Deleted {username}@{platform}.");
    } else {
        println!("No entry for {username}@{platform}.");
    }
    Ok(())
}

async fn rotate_flow(
    vault: &mut Vault,
    config: &passkeep_config::model::VaultConfig,
) -> Result<(), PasskeepError> {
    let old = SecretString::from(read_hidden("Current vault passphrase")?);
    let new1 = read_hidden("New vault passphrase")?;
    let new2 = read_hidden("Confirm new vault passphrase")?;
    if new1 != new2 {
        return Err(PasskeepError::Config("passphrases do not match".to_string()));
    }
    if new1.is_empty() {
        return Err(PasskeepError::Config(
            "empty passphrase not allowed".to_string(),
        ));
    }

    vault
        .rotate_passphrase(&old, &SecretString::from(new1), config)
        .await?;
    println!("Passphrase rotated; all entries re-encrypted.");
    Ok(())
}
