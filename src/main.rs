//! apexlog-dl command line entry point.
//!
//! Reads configuration from the environment (and `.env`), runs one export and
//! maps the outcome to the process exit code: 0 on success, including when
//! there was nothing to download, 1 on any fatal error.

use std::process::ExitCode;

use apexlog_dl::{Config, RunOutcome, run};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(code = e.error_code(), error = %e, "invalid configuration");
            return ExitCode::from(e.exit_code());
        }
    };
    tracing::debug!(?config, "configuration loaded");

    match run(&config).await {
        Ok(RunOutcome::NothingToDownload) => {
            tracing::info!("finished, nothing to download");
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Completed(summary)) => {
            if summary.is_complete() {
                tracing::info!(downloaded = summary.succeeded, "finished");
            } else {
                tracing::warn!(
                    downloaded = summary.succeeded,
                    failed = summary.failed(),
                    "finished with skipped logs"
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(code = e.error_code(), error = %e, "run aborted");
            ExitCode::from(e.exit_code())
        }
    }
}
