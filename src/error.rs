//! Error types for apexlog-dl
//!
//! This module groups failures by the phase of a run that produced them:
//! - Configuration problems detected before any network call
//! - Authentication failures (fatal, nothing else runs)
//! - Log listing failures (fatal for the run)
//! - Per-record download failures (recoverable, collected in the run summary)
//! - Filesystem failures while preparing the output directory or writing logs

use std::path::PathBuf;
use thiserror::Error;

use crate::types::LogId;

/// Result type alias for apexlog-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for apexlog-dl
///
/// Each variant carries enough context to be logged on its own. Every kind except
/// [`Error::Download`] ends the run.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The environment variable that caused the error (e.g., "MIN_LOG_LENGTH")
        key: Option<String>,
    },

    /// Login or token validation failed
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The Apex log query failed
    #[error("log query error: {0}")]
    List(#[from] ListError),

    /// A single log could not be downloaded
    #[error("download error: {0}")]
    Download(#[from] DownloadError),

    /// Creating the output directory or writing a log file failed
    #[error("filesystem error at {path}: {source}")]
    Filesystem {
        /// The path being created or written
        path: PathBuf,
        /// The underlying OS error
        #[source]
        source: std::io::Error,
    },
}

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// The instance host does not form a usable URL
    #[error("invalid instance host {host:?}: {reason}")]
    InvalidInstance {
        /// The configured instance host
        host: String,
        /// Why it was rejected
        reason: String,
    },

    /// The token contains characters that cannot be sent in an HTTP header
    #[error("session token is not a valid HTTP header value")]
    MalformedToken,

    /// Could not build the HTTP client or reach the instance
    #[error("could not reach {host}: {source}")]
    Network {
        /// The instance host that was contacted
        host: String,
        /// The underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The instance rejected the bearer token (401/403)
    #[error("instance rejected the session token (HTTP {status})")]
    InvalidToken {
        /// HTTP status code returned by the validation call
        status: u16,
    },

    /// The validation call returned an unexpected status
    #[error("session validation failed with HTTP {status}: {message}")]
    ValidationFailed {
        /// HTTP status code returned by the validation call
        status: u16,
        /// Error message reported by the API, if any
        message: String,
    },

    /// The validation call succeeded but its body could not be understood
    #[error("invalid session validation response: {0}")]
    InvalidResponse(String),
}

/// Log listing errors
#[derive(Debug, Error)]
pub enum ListError {
    /// The query request could not be sent or its body could not be read
    #[error("query request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("query rejected with HTTP {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message reported by the API (errorCode: message)
        message: String,
    },

    /// The response body was not a valid query result
    #[error("invalid query response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// Download errors; every variant names the log it belongs to
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The request could not be sent (connection refused, timeout, ...)
    #[error("request for log {id} failed: {source}")]
    Request {
        /// The log that was being downloaded
        id: LogId,
        /// The underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The download endpoint answered with a non-success status
    #[error("log {id} download returned HTTP {status}")]
    HttpStatus {
        /// The log that was being downloaded
        id: LogId,
        /// HTTP status code
        status: u16,
    },

    /// The response body could not be read to the end
    #[error("failed to read body of log {id}: {source}")]
    Body {
        /// The log that was being downloaded
        id: LogId,
        /// The underlying transport error
        #[source]
        source: reqwest::Error,
    },
}

impl DownloadError {
    /// The log this error belongs to
    pub fn log_id(&self) -> &LogId {
        match self {
            DownloadError::Request { id, .. }
            | DownloadError::HttpStatus { id, .. }
            | DownloadError::Body { id, .. } => id,
        }
    }
}

impl Error {
    /// Build a configuration error for a specific environment variable
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Build a filesystem error for a path
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Whether this error aborts the run
    ///
    /// Only per-record download failures are recoverable.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Download(_))
    }

    /// Process exit code for a run that ended with this error
    ///
    /// Fatal kinds exit with 1. A download error only reaches the caller when
    /// it chose to propagate one, and the skipped log does not fail the run.
    pub fn exit_code(&self) -> u8 {
        if self.is_fatal() { 1 } else { 0 }
    }

    /// Machine-readable error code, stable across releases
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Auth(e) => match e {
                AuthError::InvalidInstance { .. } => "auth_invalid_instance",
                AuthError::MalformedToken => "auth_malformed_token",
                AuthError::Network { .. } => "auth_network_error",
                AuthError::InvalidToken { .. } => "auth_invalid_token",
                AuthError::ValidationFailed { .. } => "auth_validation_failed",
                AuthError::InvalidResponse(_) => "auth_invalid_response",
            },
            Error::List(e) => match e {
                ListError::Network(_) => "query_network_error",
                ListError::Api { .. } => "query_rejected",
                ListError::InvalidResponse(_) => "query_invalid_response",
            },
            Error::Download(e) => match e {
                DownloadError::Request { .. } => "download_request_failed",
                DownloadError::HttpStatus { .. } => "download_http_status",
                DownloadError::Body { .. } => "download_body_failed",
            },
            Error::Filesystem { .. } => "filesystem_error",
        }
    }
}
