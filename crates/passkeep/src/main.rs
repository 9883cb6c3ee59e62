// SPDX-FileCopyrightText: 2026 Passkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passkeep - a local credential vault.
//!
//! This is the binary entry point. Vault semantics live in
//! `passkeep-vault`; this crate is prompting, argument parsing, and output.

use clap::{Parser, Subcommand};

mod commands;
mod generate;
mod shell;
mod strength;

/// Passkeep - a local credential vault.
#[derive(Parser, Debug)]
#[command(name = "passkeep", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new vault.
    Init,
    /// Save a password for a username/platform pair.
    Add {
        username: String,
        platform: String,
        /// Generate the password instead of prompting for one.
        #[arg(long)]
        generate: bool,
        /// Length of the generated password.
        #[arg(long, default_value_t = 16)]
        length: usize,
    },
    /// Print the password stored for a username/platform pair.
    Get { username: String, platform: String },
    /// List stored identities (never passwords).
    List,
    /// Delete the entry for a username/platform pair.
    Delete { username: String, platform: String },
    /// Change the master passphrase, re-encrypting every entry.
    Rotate,
    /// Generate a random password without touching the vault.
    Generate {
        /// Password length.
        #[arg(long, default_value_t = 16)]
        length: usize,
        /// Exclude uppercase letters.
        #[arg(long)]
        no_upper: bool,
        /// Exclude lowercase letters.
        #[arg(long)]
        no_lower: bool,
        /// Exclude digits.
        #[arg(long)]
        no_digits: bool,
        /// Exclude symbols.
        #[arg(long)]
        no_symbols: bool,
    },
    /// Launch the interactive menu.
    Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match passkeep_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            passkeep_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log_level);

    let result = match cli.command {
        Some(Commands::Init) => commands::cmd_init(&config).await,
        Some(Commands::Add {
            username,
            platform,
            generate,
            length,
        }) => commands::cmd_add(&config, &username, &platform, generate, length).await,
        Some(Commands::Get { username, platform }) => {
            commands::cmd_get(&config, &username, &platform).await
        }
        Some(Commands::List) => commands::cmd_list(&config).await,
        Some(Commands::Delete { username, platform }) => {
            commands::cmd_delete(&config, &username, &platform).await
        }
        Some(Commands::Rotate) => commands::cmd_rotate(&config).await,
        Some(Commands::Generate {
            length,
            no_upper,
            no_lower,
            no_digits,
            no_symbols,
        }) => commands::cmd_generate(length, no_upper, no_lower, no_digits, no_symbols),
        Some(Commands::Shell) => shell::run_shell(&config).await,
        None => shell::run_shell(&config).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("passkeep={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_add_with_generate() {
        let cli = Cli::try_parse_from([
            "passkeep", "add", "alice", "example.com", "--generate", "--length", "24",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add {
                username,
                platform,
                generate,
                length,
            }) => {
                assert_eq!(username, "alice");
                assert_eq!(platform, "example.com");
                assert!(generate);
                assert_eq!(length, 24);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_defaults_to_shell() {
        let cli = Cli::try_parse_from(["passkeep"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed).
        let config = passkeep_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.log_level, "info");
    }
}
