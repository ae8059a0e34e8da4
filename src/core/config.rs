//! Bot configuration from environment variables
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Validate REMINDER_INTERVAL_MINUTES instead of silently defaulting
//! - 1.0.0: Initial creation with token, data file, and interval

use anyhow::{Context, Result};

/// Default path for the durable reminder snapshot
pub const DEFAULT_DATA_FILE: &str = "reminders.json";

/// Default broadcast cadence in minutes
pub const DEFAULT_INTERVAL_MINUTES: u64 = 60;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token (required)
    pub discord_token: String,
    /// Path to the JSON reminder snapshot
    pub data_file: String,
    /// How often to re-send outstanding reminders
    pub broadcast_interval_minutes: u64,
    /// env_logger filter default (overridable via RUST_LOG)
    pub log_level: String,
    /// Guild for instant command registration during development
    pub discord_guild_id: Option<String>,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// `DISCORD_TOKEN` is the only required variable; everything else has a
    /// default. Call `dotenvy::dotenv()` first if a `.env` file should be
    /// honored.
    pub fn from_env() -> Result<Self> {
        let discord_token = std::env::var("DISCORD_TOKEN")
            .context("DISCORD_TOKEN must be set (see SETUP instructions)")?;

        let data_file =
            std::env::var("DATA_FILE").unwrap_or_else(|_| DEFAULT_DATA_FILE.to_string());

        let broadcast_interval_minutes =
            parse_interval_minutes(std::env::var("REMINDER_INTERVAL_MINUTES").ok())?;

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let discord_guild_id = std::env::var("DISCORD_GUILD_ID").ok().filter(|v| !v.is_empty());

        Ok(Config {
            discord_token,
            data_file,
            broadcast_interval_minutes,
            log_level,
            discord_guild_id,
        })
    }
}

/// Parse the broadcast interval, defaulting when the variable is unset.
fn parse_interval_minutes(raw: Option<String>) -> Result<u64> {
    match raw {
        None => Ok(DEFAULT_INTERVAL_MINUTES),
        Some(value) => {
            let minutes: u64 = value
                .trim()
                .parse()
                .with_context(|| format!("REMINDER_INTERVAL_MINUTES is not a number: '{value}'"))?;
            if minutes == 0 {
                anyhow::bail!("REMINDER_INTERVAL_MINUTES must be at least 1");
            }
            Ok(minutes)
        }
    }
}
