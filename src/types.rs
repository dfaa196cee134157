//! Core types for apexlog-dl

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Salesforce record id of an Apex log
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogId(pub String);

impl LogId {
    /// Create a new LogId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LogId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for LogId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<&str> for LogId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for LogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One Apex log descriptor as returned by the `ApexLog` query
///
/// Field names follow the Salesforce API. Anything else in the record
/// (`attributes` and friends) is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Record id
    #[serde(rename = "Id")]
    pub id: LogId,

    /// When the traced transaction started
    #[serde(rename = "StartTime", deserialize_with = "deserialize_sf_datetime")]
    pub start_time: DateTime<FixedOffset>,

    /// Where the log was generated (e.g. "SystemLog", "Monitoring")
    #[serde(rename = "Location")]
    pub location: String,

    /// Size of the log body in bytes
    #[serde(rename = "LogLength")]
    pub length: u64,
}

/// Salesforce datetimes look like `2025-04-17T09:43:13.000+0000`, which is not RFC 3339
fn deserialize_sf_datetime<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_sf_datetime(&raw).map_err(serde::de::Error::custom)
}

/// Parse a Salesforce API datetime, accepting RFC 3339 as well
pub fn parse_sf_datetime(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
}

/// A log that could not be downloaded
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DownloadFailure {
    /// The log that failed
    pub id: LogId,
    /// Rendered error message
    pub error: String,
}

/// End-of-run counters
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DownloadSummary {
    /// Number of logs a download was attempted for
    pub attempted: usize,
    /// Number of logs downloaded and written
    pub succeeded: usize,
    /// Logs skipped because the download failed
    pub failures: Vec<DownloadFailure>,
    /// Total bytes written to disk
    pub bytes_written: u64,
    /// Files written, in download order
    pub files: Vec<PathBuf>,
}

impl DownloadSummary {
    /// Number of failed downloads
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True when every attempted download succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.succeeded == self.attempted
    }
}

/// What a run ended with
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The query matched no logs; nothing was written
    NothingToDownload,
    /// Logs were processed; see the summary for per-record results
    Completed(DownloadSummary),
}
