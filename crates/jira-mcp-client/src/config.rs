//! Connection settings
//!
//! Settings come from the process environment, optionally seeded from a `.env`
//! file in the working directory. Variables already present in the environment
//! take precedence over the file.

use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

use crate::{Error, Result};

pub const ENV_URL: &str = "JIRA_URL";
pub const ENV_USERNAME: &str = "JIRA_USERNAME";
pub const ENV_API_TOKEN: &str = "JIRA_API_TOKEN";
pub const ENV_TIMEOUT: &str = "JIRA_TIMEOUT";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

static SETTINGS: OnceLock<Settings> = OnceLock::new();

#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub username: String,
    pub api_token: String,
    pub timeout_seconds: u64,
}

impl Settings {
    /// Load `.env` (if present) and then read the environment.
    pub fn load() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded settings overrides from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(Error::Config(format!("Failed to read .env file: {}", e))),
        }
        Self::from_env()
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::Config(format!("{} must be set and non-empty", key)))
        };

        let base_url = required(ENV_URL)?;
        let username = required(ENV_USERNAME)?;
        let api_token = required(ENV_API_TOKEN)?;

        let timeout_seconds = match lookup(ENV_TIMEOUT).map(|v| v.trim().to_string()) {
            None => DEFAULT_TIMEOUT_SECONDS,
            Some(raw) if raw.is_empty() => DEFAULT_TIMEOUT_SECONDS,
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                Error::Config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_TIMEOUT, raw
                ))
            })?,
        };

        let settings = Self {
            base_url,
            username,
            api_token,
            timeout_seconds,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::Config(format!("{} cannot be empty", ENV_URL)));
        }
        if self.username.trim().is_empty() {
            return Err(Error::Config(format!("{} cannot be empty", ENV_USERNAME)));
        }
        if self.api_token.trim().is_empty() {
            return Err(Error::Config(format!("{} cannot be empty", ENV_API_TOKEN)));
        }
        if self.timeout_seconds == 0 {
            return Err(Error::Config(format!(
                "{} must be greater than 0",
                ENV_TIMEOUT
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("api_token", &"<redacted>")
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Process-wide settings, loaded on first use.
///
/// A failed load is not cached, so the next call tries again. Once loaded the
/// value never changes for the life of the process.
pub fn get_settings() -> Result<&'static Settings> {
    if let Some(settings) = SETTINGS.get() {
        return Ok(settings);
    }
    let settings = Settings::load()?;
    Ok(SETTINGS.get_or_init(|| settings))
}
