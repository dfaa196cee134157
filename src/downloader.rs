//! Apex log body download and persistence.

use std::path::{Path, PathBuf};

use crate::error::{DownloadError, Error, Result};
use crate::session::Session;
use crate::types::LogId;
use crate::utils::log_file_path;

/// Path of the trace download page, relative to the instance root
pub const TRACE_DOWNLOAD_PATH: &str = "/apexdebug/traceDownload.apexp";

/// URL serving the raw body of one log
pub fn download_url(session: &Session, id: &LogId) -> String {
    let base = session.base_url().as_str().trim_end_matches('/');
    format!(
        "{base}{TRACE_DOWNLOAD_PATH}?id={}",
        urlencoding::encode(id.as_str())
    )
}

/// Fetch the raw content of one log
///
/// The whole body is buffered; there is no size cap.
pub async fn download(
    session: &Session,
    id: &LogId,
) -> std::result::Result<Vec<u8>, DownloadError> {
    let url = download_url(session, id);
    tracing::debug!(log_id = %id, url = %url, "downloading log");

    let response = session
        .client()
        .get(&url)
        .send()
        .await
        .map_err(|source| DownloadError::Request {
            id: id.clone(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::HttpStatus {
            id: id.clone(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(|source| DownloadError::Body {
        id: id.clone(),
        source,
    })?;

    Ok(body.to_vec())
}

/// Write a downloaded log to `<dir>/apex_log-<id>.<extension>`
///
/// Existing files are overwritten.
pub async fn write_log(
    dir: &Path,
    id: &LogId,
    extension: &str,
    content: &[u8],
) -> Result<PathBuf> {
    let path = log_file_path(dir, id, extension)?;
    tokio::fs::write(&path, content)
        .await
        .map_err(|e| Error::filesystem(&path, e))?;
    Ok(path)
}
