//! # apexlog-dl
//!
//! Fetch today's large Salesforce Apex debug logs and store each one as a
//! local file.
//!
//! A run is strictly linear:
//! 1. **Login** - build a [`Session`] from the instance host and bearer token and
//!    confirm the token with one cheap query
//! 2. **List** - query `ApexLog` for records created today that are larger than
//!    the threshold, largest first
//! 3. **Download** - fetch each log body and write it to
//!    `<output_dir>/apex_log-<id>.<ext>`
//!
//! A failed download is skipped and reported in the run summary; every other
//! failure ends the run.
//!
//! ## Quick Start
//!
//! ```no_run
//! use apexlog_dl::{Config, RunOutcome, run};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::new("acme.my.salesforce.com", "00D...!AQ0AQ...", 500);
//!
//!     match run(&config).await? {
//!         RunOutcome::NothingToDownload => println!("nothing to do"),
//!         RunOutcome::Completed(summary) => {
//!             println!("{} of {} logs saved", summary.succeeded, summary.attempted);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Log body download and persistence
pub mod downloader;
/// Error types
pub mod error;
/// Apex log query
pub mod query;
/// Full export run
pub mod runner;
/// Authenticated REST session
pub mod session;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use downloader::{download, write_log};
pub use error::{AuthError, DownloadError, Error, ListError, Result};
pub use query::list_logs;
pub use runner::{run, run_with_session};
pub use session::Session;
pub use types::{DownloadFailure, DownloadSummary, LogId, LogRecord, RunOutcome};
