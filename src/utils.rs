//! Utility functions for the output directory and log file naming

use crate::error::{Error, Result};
use crate::types::LogId;
use std::path::{Path, PathBuf};

/// Prefix of every written log file
pub const LOG_FILE_PREFIX: &str = "apex_log-";

/// Create the output directory if it does not exist yet
///
/// Returns `true` when the directory was created and `false` when it already
/// existed. Missing parent directories are created too. An existing path that
/// is not a directory is an error, as is any other OS failure.
///
/// # Examples
///
/// ```no_run
/// # async fn demo() -> apexlog_dl::Result<()> {
/// use apexlog_dl::utils::ensure_dir;
/// use std::path::Path;
///
/// let created = ensure_dir(Path::new("apexlogs")).await?;
/// let again = ensure_dir(Path::new("apexlogs")).await?;
/// assert!(!again);
/// # let _ = created;
/// # Ok(())
/// # }
/// ```
pub async fn ensure_dir(path: &Path) -> Result<bool> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_dir() => Ok(false),
        Ok(_) => Err(Error::filesystem(
            path,
            std::io::Error::other("path exists and is not a directory"),
        )),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tokio::fs::create_dir_all(path)
                .await
                .map_err(|e| Error::filesystem(path, e))?;
            Ok(true)
        }
        Err(e) => Err(Error::filesystem(path, e)),
    }
}

/// File name for a downloaded log: `apex_log-<id>.<extension>`
///
/// Ids come from the remote API; anything that could escape the output
/// directory is refused.
pub fn log_file_name(id: &LogId, extension: &str) -> Result<String> {
    let raw = id.as_str();
    let unsafe_id = raw.is_empty()
        || raw == "."
        || raw == ".."
        || raw
            .chars()
            .any(|c| c == '/' || c == '\\' || c == '\0' || c.is_control());
    if unsafe_id {
        return Err(Error::filesystem(
            raw,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("log id {raw:?} is not usable as a file name"),
            ),
        ));
    }
    Ok(format!("{LOG_FILE_PREFIX}{raw}.{extension}"))
}

/// Full path of a downloaded log inside `dir`
pub fn log_file_path(dir: &Path, id: &LogId, extension: &str) -> Result<PathBuf> {
    Ok(dir.join(log_file_name(id, extension)?))
}

/// Human-readable byte count for log lines
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
