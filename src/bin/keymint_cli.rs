// ABOUTME: Keymint CLI - command-line tool for minting and verifying M2M API keys
// ABOUTME: Also exposes the raw uniform random generators for scripting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Usage:
//! ```bash
//! # Generate a signing secret for KEYMINT_SIGNING_SECRET
//! keymint-cli secret generate
//!
//! # Mint a new API key (requires KEYMINT_SIGNING_SECRET)
//! keymint-cli key mint --name "My Pokemon API"
//!
//! # Verify a bearer token
//! keymint-cli key verify <token>
//!
//! # Draw a uniform random integer in [0, 100)
//! keymint-cli rand int 100
//!
//! # Draw a 32-character random string (or the legacy repeated-block form)
//! keymint-cli rand string 32
//! keymint-cli rand string 2 --legacy
//! ```

use clap::{Parser, Subcommand};
use keymint::api_keys::{ApiKeyManager, CreateApiKeyRequest};
use keymint::auth::ApiTokenManager;
use keymint::config::AppConfig;
use keymint::errors::{AppError, AppResult};
use keymint::logging::LoggingConfig;
use keymint::random::{self, StringMode};
use rand::rngs::OsRng;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "keymint-cli",
    about = "Keymint M2M key management CLI",
    long_about = "Command-line tool for generating signing secrets, minting and verifying machine-to-machine API keys, and drawing uniform random values."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Signing secret commands
    Secret {
        #[command(subcommand)]
        action: SecretCommand,
    },

    /// API key commands
    Key {
        #[command(subcommand)]
        action: KeyCommand,
    },

    /// Raw random generation commands
    Rand {
        #[command(subcommand)]
        action: RandCommand,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum SecretCommand {
    /// Generate a new HMAC signing secret
    Generate,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum KeyCommand {
    /// Mint a new API key and its bearer token
    Mint {
        /// Human-readable key name
        #[arg(long)]
        name: String,

        /// Optional description
        #[arg(long)]
        description: Option<String>,

        /// Expiration in days from now (defaults to 30)
        #[arg(long)]
        expires_in_days: Option<i64>,
    },

    /// Verify a bearer token and print its claims
    Verify {
        /// The token to verify
        token: String,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum RandCommand {
    /// Draw a uniform random integer in [0, max)
    Int {
        /// Exclusive upper bound
        max: u64,
    },

    /// Draw a random alphanumeric string
    String {
        /// Number of characters (legacy mode repeats the full block this many times)
        length: usize,

        /// Use the legacy repeated-block form instead of uniform characters
        #[arg(long)]
        legacy: bool,
    },
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging.level = "debug".into();
    }
    logging
        .init()
        .map_err(|e| AppError::internal(format!("Failed to initialize logging: {e}")))?;

    match cli.command {
        Command::Secret { action } => match action {
            SecretCommand::Generate => {
                let secret = ApiTokenManager::generate_signing_secret()?;
                println!("{secret}");
            }
        },
        Command::Key { action } => match action {
            KeyCommand::Mint {
                name,
                description,
                expires_in_days,
            } => {
                let config = AppConfig::from_env()?;
                let key_manager = ApiKeyManager::new();
                let token_manager = ApiTokenManager::from_config(&config.auth);

                let (record, full_key) = key_manager.create_api_key(CreateApiKeyRequest {
                    name,
                    description,
                    expires_in_days,
                })?;
                let token = token_manager.mint(&record.key_id)?;

                info!(key_id = %record.key_id, "API key minted");

                let output = serde_json::json!({
                    "record": record,
                    "api_key": full_key,
                    "token": token,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            KeyCommand::Verify { token } => {
                let config = AppConfig::from_env()?;
                let token_manager = ApiTokenManager::from_config(&config.auth);

                let claims = token_manager.validate(&token)?;
                println!("{}", serde_json::to_string_pretty(&claims)?);
            }
        },
        Command::Rand { action } => match action {
            RandCommand::Int { max } => {
                println!("{}", random::random_int(max)?);
            }
            RandCommand::String { length, legacy } => {
                let mode = if legacy {
                    StringMode::Legacy
                } else {
                    StringMode::Corrected
                };
                println!("{}", random::random_string_with(&mut OsRng, length, mode)?);
            }
        },
    }

    Ok(())
}
