//! Environment-based bot configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial creation with env var parsing

use anyhow::{anyhow, Result};

/// Runtime configuration, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Discord bot token (required)
    pub discord_token: String,
    /// Path to the SQLite database file
    pub database_path: String,
    /// Default log filter when RUST_LOG is not set
    pub log_level: String,
    /// Optional guild ID for guild-scoped command registration (faster for development)
    pub discord_guild_id: Option<String>,
    /// Optional bot owner; gates global settings commands
    pub owner_id: Option<u64>,
}

impl Config {
    /// Build a Config from environment variables.
    ///
    /// `DISCORD_TOKEN` is required; everything else has a default or is optional.
    pub fn from_env() -> Result<Self> {
        let discord_token = std::env::var("DISCORD_TOKEN")
            .map_err(|_| anyhow!("DISCORD_TOKEN environment variable is required"))?;

        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| "jotter.db".to_string());

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let discord_guild_id = std::env::var("DISCORD_GUILD_ID").ok().filter(|s| !s.is_empty());

        let owner_id = match std::env::var("OWNER_ID") {
            Ok(raw) if !raw.is_empty() => Some(
                raw.parse::<u64>()
                    .map_err(|_| anyhow!("OWNER_ID must be a numeric Discord user ID"))?,
            ),
            _ => None,
        };

        Ok(Config {
            discord_token,
            database_path,
            log_level,
            discord_guild_id,
            owner_id,
        })
    }
}
