//! Bot configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SLACK_ACCESS_TOKEN` - Slack bot token (xoxb-...)
//! - `APPROVERS_CHANNEL` - Channel ID that receives announcement requests
//! - `SLACK_SIGNING_SECRET` - Slack app signing secret (server only)
//!
//! ## Optional
//! - `SLACK_API_URL` - Web API base URL (default: <https://slack.com/api>)
//! - `HERALD_MAX_PAGES` - Page limit when listing channels (default: 100)
//! - `HERALD_HOST` - Bind address (default: 127.0.0.1)
//! - `HERALD_PORT` - Listen port (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry traces sample rate (default: 1.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use herald_core::ChannelId;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::slack::{DEFAULT_MAX_PAGES, SLACK_API_BASE, SlackClient};

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Slack credentials and API settings shared by the bot and the CLI.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct SlackConfig {
    /// Slack bot token (xoxb-...).
    pub access_token: SecretString,
    /// Channel that receives announcement requests.
    pub approvers_channel: ChannelId,
    /// Web API base URL.
    pub api_url: String,
    /// Page limit when listing channels.
    pub max_pages: usize,
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("access_token", &"[REDACTED]")
            .field("approvers_channel", &self.approvers_channel)
            .field("api_url", &self.api_url)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

impl SlackConfig {
    /// Load Slack configuration from the process environment.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_source(&|key| std::env::var(key).ok())
    }

    /// Load Slack configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_source(get: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let access_token = get_required(get, "SLACK_ACCESS_TOKEN")?;
        if let Err(e) = validate_secret_strength(&access_token, "SLACK_ACCESS_TOKEN") {
            tracing::warn!("SLACK_ACCESS_TOKEN validation warning: {e}");
        }

        let approvers_channel = ChannelId::new(get_required(get, "APPROVERS_CHANNEL")?);

        let api_url = get_or_default(get, "SLACK_API_URL", SLACK_API_BASE);
        Url::parse(&api_url)
            .map_err(|e| ConfigError::InvalidEnvVar("SLACK_API_URL".to_string(), e.to_string()))?;

        let max_pages = get_or_default(get, "HERALD_MAX_PAGES", &DEFAULT_MAX_PAGES.to_string())
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar("HERALD_MAX_PAGES".to_string(), e.to_string()))?;
        if max_pages == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "HERALD_MAX_PAGES".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            access_token: SecretString::from(access_token),
            approvers_channel,
            api_url,
            max_pages,
        })
    }

    /// Build a Web API client from this configuration.
    #[must_use]
    pub fn client(&self, signing_secret: Option<SecretString>) -> SlackClient {
        SlackClient::new(
            self.access_token.clone(),
            signing_secret,
            self.api_url.as_str(),
        )
    }
}

/// Webhook server configuration.
#[derive(Clone)]
pub struct BotConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Slack credentials and API settings
    pub slack: SlackConfig,
    /// Slack app signing secret for webhook verification
    pub signing_secret: SecretString,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("slack", &self.slack)
            .field("signing_secret", &"[REDACTED]")
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .finish_non_exhaustive()
    }
}

impl BotConfig {
    /// Load server configuration from the process environment.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_source(&|key| std::env::var(key).ok())
    }

    /// Load server configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_source(get: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let slack = SlackConfig::from_source(get)?;

        let signing_secret = get_required(get, "SLACK_SIGNING_SECRET")?;
        if let Err(e) = validate_secret_strength(&signing_secret, "SLACK_SIGNING_SECRET") {
            tracing::warn!("SLACK_SIGNING_SECRET validation warning: {e}");
        }

        let host = get_or_default(get, "HERALD_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HERALD_HOST".to_string(), e.to_string()))?;
        let port = get_or_default(get, "HERALD_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("HERALD_PORT".to_string(), e.to_string()))?;

        let sentry_sample_rate = get("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            slack,
            signing_secret: SecretString::from(signing_secret),
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Build a Web API client that can also verify webhooks.
    #[must_use]
    pub fn client(&self) -> SlackClient {
        self.slack.client(Some(self.signing_secret.clone()))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required variable.
fn get_required(get: &dyn Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    get(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a variable with a default value.
fn get_or_default(get: &dyn Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get(key).unwrap_or_else(|| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Check that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}
