//! One full export run: login, list, download, write, summarize.
//!
//! Download failures for individual logs are logged, recorded in the
//! [`DownloadSummary`] and skipped. Everything else ends the run with an
//! error.

use crate::config::Config;
use crate::downloader::{download, write_log};
use crate::error::Result;
use crate::query::list_logs;
use crate::session::Session;
use crate::types::{DownloadFailure, DownloadSummary, LogRecord, RunOutcome};
use crate::utils::{ensure_dir, format_bytes};

/// Run the whole export with the given configuration
pub async fn run(config: &Config) -> Result<RunOutcome> {
    config.validate()?;

    let session = Session::login(config).await?;
    tracing::info!(
        instance = %session.instance_host(),
        api_version = %session.api_version(),
        sandbox = session.is_sandbox(),
        "logged into Salesforce"
    );

    run_with_session(&session, config).await
}

/// Run the export with an already authenticated session
pub async fn run_with_session(session: &Session, config: &Config) -> Result<RunOutcome> {
    let records = list_logs(session, config.min_log_length).await?;
    if records.is_empty() {
        tracing::info!(
            min_length = config.min_log_length,
            "no Apex logs found for today"
        );
        return Ok(RunOutcome::NothingToDownload);
    }
    tracing::info!(
        count = records.len(),
        min_length = config.min_log_length,
        "found Apex logs"
    );

    if ensure_dir(&config.output_dir).await? {
        tracing::info!(dir = %config.output_dir.display(), "created output directory");
    } else {
        tracing::info!(dir = %config.output_dir.display(), "output directory already exists");
    }

    let summary = download_all(session, config, &records).await?;
    log_summary(&summary);

    Ok(RunOutcome::Completed(summary))
}

/// Download and write each record in order, skipping failed downloads
async fn download_all(
    session: &Session,
    config: &Config,
    records: &[LogRecord],
) -> Result<DownloadSummary> {
    let mut summary = DownloadSummary::default();

    for (index, record) in records.iter().enumerate() {
        summary.attempted += 1;

        let content = match download(session, &record.id).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(log_id = %record.id, error = %e, "download failed, skipping");
                summary.failures.push(DownloadFailure {
                    id: record.id.clone(),
                    error: e.to_string(),
                });
                continue;
            }
        };

        let written = write_log(
            &config.output_dir,
            &record.id,
            &config.file_extension,
            &content,
        )
        .await;
        let path = match written {
            Ok(path) => path,
            Err(e) => {
                tracing::error!(log_id = %record.id, error = %e, "write failed, aborting run");
                log_summary(&summary);
                return Err(e);
            }
        };

        tracing::info!(
            log_id = %record.id,
            n = index + 1,
            of = records.len(),
            location = %record.location,
            started = %record.start_time,
            size = %format_bytes(content.len() as u64),
            path = %path.display(),
            "downloaded Apex log"
        );

        summary.succeeded += 1;
        summary.bytes_written += content.len() as u64;
        summary.files.push(path);
    }

    Ok(summary)
}

fn log_summary(summary: &DownloadSummary) {
    tracing::info!(
        attempted = summary.attempted,
        succeeded = summary.succeeded,
        failed = summary.failed(),
        written = %format_bytes(summary.bytes_written),
        "download finished"
    );
    for failure in &summary.failures {
        tracing::warn!(log_id = %failure.id, error = %failure.error, "not downloaded");
    }
}
