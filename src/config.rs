//! Configuration types for apexlog-dl
//!
//! Configuration comes from the process environment (optionally seeded from a
//! `.env` file). Every value is checked here, before any network call is made.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Environment variable holding the Salesforce instance host
pub const ENV_INSTANCE_HOST: &str = "INSTANCE_HOST";
/// Environment variable holding the session token
pub const ENV_AUTH_TOKEN: &str = "AUTH_TOKEN";
/// Environment variable holding the minimum log size in bytes
pub const ENV_MIN_LOG_LENGTH: &str = "MIN_LOG_LENGTH";
/// Environment variable overriding the REST API version
pub const ENV_API_VERSION: &str = "API_VERSION";
/// Environment variable overriding the output directory
pub const ENV_OUTPUT_DIR: &str = "OUTPUT_DIR";
/// Environment variable overriding the log file extension
pub const ENV_LOG_FILE_EXTENSION: &str = "LOG_FILE_EXTENSION";
/// Environment variable overriding the per-request timeout, in seconds
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";

/// Older variable names, read when the primary name is unset
const LEGACY_ALIASES: &[(&str, &str)] = &[
    (ENV_INSTANCE_HOST, "SALESFORCE_INSTANCE"),
    (ENV_AUTH_TOKEN, "SALESFORCE_TOKEN"),
    (ENV_MIN_LOG_LENGTH, "LOG_LENGTH"),
];

/// Settings for one run
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Salesforce instance host, e.g. "acme.my.salesforce.com"
    ///
    /// HTTPS is assumed unless the value carries an explicit `http://` or
    /// `https://` scheme.
    pub instance_host: String,

    /// Bearer token (session id) used for every request
    #[serde(skip_serializing)]
    pub auth_token: String,

    /// Only logs strictly larger than this many bytes are downloaded
    pub min_log_length: u64,

    /// REST API version (default: "62.0")
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Directory logs are written to (default: "./apexlogs")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Extension of written log files, without the dot (default: "log")
    #[serde(default = "default_file_extension")]
    pub file_extension: String,

    /// Timeout applied to every HTTP request (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("instance_host", &self.instance_host)
            .field("auth_token", &"<redacted>")
            .field("min_log_length", &self.min_log_length)
            .field("api_version", &self.api_version)
            .field("output_dir", &self.output_dir)
            .field("file_extension", &self.file_extension)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Config {
    /// Create a config with the three required values and defaults for the rest
    pub fn new(
        instance_host: impl Into<String>,
        auth_token: impl Into<String>,
        min_log_length: u64,
    ) -> Self {
        Self {
            instance_host: instance_host.into(),
            auth_token: auth_token.into(),
            min_log_length,
            api_version: default_api_version(),
            output_dir: default_output_dir(),
            file_extension: default_file_extension(),
            request_timeout: default_request_timeout(),
        }
    }

    /// Load configuration from the process environment
    ///
    /// A `.env` file in the working directory (or a parent) is loaded first if
    /// present; variables already set in the environment win.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| -> Option<String> {
            let value = lookup(key).or_else(|| {
                LEGACY_ALIASES
                    .iter()
                    .find(|(primary, _)| *primary == key)
                    .and_then(|(_, alias)| lookup(*alias))
            })?;
            let value = value.trim().to_string();
            (!value.is_empty()).then_some(value)
        };
        let require = |key: &str| -> Result<String> {
            get(key).ok_or_else(|| Error::config(key, format!("{key} is not set")))
        };

        let instance_host = require(ENV_INSTANCE_HOST)?;
        let auth_token = require(ENV_AUTH_TOKEN)?;
        let min_log_length = parse_min_log_length(&require(ENV_MIN_LOG_LENGTH)?)?;

        let mut config = Config::new(instance_host, auth_token, min_log_length);

        if let Some(version) = get(ENV_API_VERSION) {
            config.api_version = version;
        }
        if let Some(dir) = get(ENV_OUTPUT_DIR) {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(ext) = get(ENV_LOG_FILE_EXTENSION) {
            config.file_extension = ext.trim_start_matches('.').to_string();
        }
        if let Some(secs) = get(ENV_REQUEST_TIMEOUT_SECS) {
            let secs: u64 = secs.parse().map_err(|_| {
                Error::config(
                    ENV_REQUEST_TIMEOUT_SECS,
                    format!("{ENV_REQUEST_TIMEOUT_SECS} must be a whole number of seconds, got {secs:?}"),
                )
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check values that cannot be expressed in the type system
    pub fn validate(&self) -> Result<()> {
        if self.instance_host.trim().is_empty() {
            return Err(Error::config(ENV_INSTANCE_HOST, "instance host is empty"));
        }
        if self.auth_token.trim().is_empty() {
            return Err(Error::config(ENV_AUTH_TOKEN, "auth token is empty"));
        }
        if !is_api_version(&self.api_version) {
            return Err(Error::config(
                ENV_API_VERSION,
                format!(
                    "API version must look like \"62.0\", got {:?}",
                    self.api_version
                ),
            ));
        }
        if self.file_extension.is_empty()
            || !self.file_extension.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(Error::config(
                ENV_LOG_FILE_EXTENSION,
                format!(
                    "file extension must be alphanumeric, got {:?}",
                    self.file_extension
                ),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(Error::config(
                ENV_REQUEST_TIMEOUT_SECS,
                "request timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Decimal digits with an optional leading `+`
fn parse_min_log_length(raw: &str) -> Result<u64> {
    raw.parse::<u64>().map_err(|_| {
        Error::config(
            ENV_MIN_LOG_LENGTH,
            format!("{ENV_MIN_LOG_LENGTH} must be a non-negative integer, got {raw:?}"),
        )
    })
}

fn is_api_version(version: &str) -> bool {
    match version.split_once('.') {
        Some((major, minor)) => {
            !major.is_empty()
                && !minor.is_empty()
                && major.chars().all(|c| c.is_ascii_digit())
                && minor.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

fn default_api_version() -> String {
    "62.0".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./apexlogs")
}

fn default_file_extension() -> String {
    "log".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
