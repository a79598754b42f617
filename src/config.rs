//! Bot configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BOT_TOKEN` - Chat platform bot token
//!
//! ## Optional
//!
//! Unparsable values are logged and replaced by their default; only a missing token is fatal.
//!
//! - `OWNER_CHAT_ID` - Chat that receives order notifications (disabled when unset or invalid)
//! - `SESSION_SHARDS` - Number of session actor shards (default: 8)
//! - `NOTIFY_MAX_ATTEMPTS` - Delivery attempts per order notification (default: 3)
//! - `NOTIFY_QUEUE_CAPACITY` - Pending order notifications kept in memory (default: 64)

use crate::notifier::OperatorChat;
use secrecy::{ExposeSecret, SecretString};
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

const DEFAULT_SESSION_SHARDS: usize = 8;
const DEFAULT_NOTIFY_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_NOTIFY_QUEUE_CAPACITY: usize = 64;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Runtime settings.
///
/// Implements `Debug` manually to redact the bot token.
#[derive(Clone)]
pub struct Settings {
    pub bot_token: SecretString,
    pub owner_chat_id: Option<OperatorChat>,
    pub session_shards: usize,
    pub notify_max_attempts: u32,
    pub notify_queue_capacity: usize,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("bot_token", &"[REDACTED]")
            .field("owner_chat_id", &self.owner_chat_id)
            .field("session_shards", &self.session_shards)
            .field("notify_max_attempts", &self.notify_max_attempts)
            .field("notify_queue_capacity", &self.notify_queue_capacity)
            .finish()
    }
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `BOT_TOKEN` is missing or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bot_token = get("BOT_TOKEN")
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("BOT_TOKEN".to_string()))?;
        let owner_chat_id = get("OWNER_CHAT_ID").and_then(|value| match value.parse::<i64>() {
            Ok(id) => Some(OperatorChat(id)),
            Err(e) => {
                warn!(
                    value = %value,
                    error = %e,
                    "OWNER_CHAT_ID is not a chat id, order notifications disabled"
                );
                None
            }
        });
        let session_shards = parse_or(
            "SESSION_SHARDS",
            get("SESSION_SHARDS"),
            DEFAULT_SESSION_SHARDS,
        );
        let notify_max_attempts = parse_or(
            "NOTIFY_MAX_ATTEMPTS",
            get("NOTIFY_MAX_ATTEMPTS"),
            DEFAULT_NOTIFY_MAX_ATTEMPTS,
        );
        let notify_queue_capacity = parse_or(
            "NOTIFY_QUEUE_CAPACITY",
            get("NOTIFY_QUEUE_CAPACITY"),
            DEFAULT_NOTIFY_QUEUE_CAPACITY,
        );

        Ok(Self {
            bot_token,
            owner_chat_id,
            session_shards,
            notify_max_attempts,
            notify_queue_capacity,
        })
    }

    /// Token length only, never the token itself, for startup logs.
    pub fn bot_token_len(&self) -> usize {
        self.bot_token.expose_secret().len()
    }
}

/// Parses a positive number, falling back to `default` with a warning.
fn parse_or<T>(key: &str, value: Option<String>, default: T) -> T
where
    T: FromStr + PartialOrd + From<u8> + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    let Some(value) = value else {
        return default;
    };
    match value.parse::<T>() {
        Ok(parsed) if parsed >= T::from(1) => parsed,
        Ok(_) => {
            warn!(key, value = %value, default = %default, "Must be at least 1, using default");
            default
        }
        Err(e) => {
            warn!(
                key,
                value = %value,
                error = %e,
                default = %default,
                "Unparsable, using default"
            );
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_only_token() {
        let settings = settings(&[("BOT_TOKEN", "123:abc")]).unwrap();
        assert_eq!(settings.bot_token.expose_secret(), "123:abc");
        assert_eq!(settings.owner_chat_id, None);
        assert_eq!(settings.session_shards, 8);
        assert_eq!(settings.notify_max_attempts, 3);
        assert_eq!(settings.notify_queue_capacity, 64);
    }

    #[test]
    fn test_missing_or_blank_token_is_fatal() {
        assert_eq!(
            settings(&[]).unwrap_err(),
            ConfigError::MissingEnvVar("BOT_TOKEN".to_string())
        );
        assert_eq!(
            settings(&[("BOT_TOKEN", "   ")]).unwrap_err(),
            ConfigError::MissingEnvVar("BOT_TOKEN".to_string())
        );
    }

    #[test]
    fn test_owner_chat_id() {
        let settings_ok = settings(&[("BOT_TOKEN", "t"), ("OWNER_CHAT_ID", "-100200")]).unwrap();
        assert_eq!(settings_ok.owner_chat_id, Some(OperatorChat(-100200)));

        let blank = settings(&[("BOT_TOKEN", "t"), ("OWNER_CHAT_ID", "")]).unwrap();
        assert_eq!(blank.owner_chat_id, None);

        // a non-numeric chat only disables notifications
        let named = settings(&[("BOT_TOKEN", "t"), ("OWNER_CHAT_ID", "owner")]).unwrap();
        assert_eq!(named.owner_chat_id, None);
    }

    #[test]
    fn test_bad_numbers_fall_back_to_defaults() {
        let fallback = settings(&[
            ("BOT_TOKEN", "t"),
            ("SESSION_SHARDS", "0"),
            ("NOTIFY_MAX_ATTEMPTS", "many"),
            ("NOTIFY_QUEUE_CAPACITY", "-5"),
        ])
        .unwrap();
        assert_eq!(fallback.session_shards, 8);
        assert_eq!(fallback.notify_max_attempts, 3);
        assert_eq!(fallback.notify_queue_capacity, 64);

        let custom = settings(&[
            ("BOT_TOKEN", "t"),
            ("SESSION_SHARDS", "2"),
            ("NOTIFY_MAX_ATTEMPTS", "5"),
        ])
        .unwrap();
        assert_eq!(custom.session_shards, 2);
        assert_eq!(custom.notify_max_attempts, 5);
    }

    #[test]
    fn test_debug_redacts_token() {
        let settings = settings(&[("BOT_TOKEN", "super-secret-token")]).unwrap();
        let debug = format!("{settings:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret-token"));
    }
}
