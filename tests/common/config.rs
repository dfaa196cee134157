//! Test configuration helpers for mock and live orgs

use apexlog_dl::Config;
use tempfile::TempDir;

use super::mock_org::{MockOrg, TEST_TOKEN};

/// Config pointing at a mock org, writing into a fresh temp directory
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub fn mock_config(org: &MockOrg, min_length: u64) -> (Config, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = Config::new(org.host(), TEST_TOKEN, min_length);
    config.output_dir = temp_dir.path().join("apexlogs");
    (config, temp_dir)
}

/// Check if live org credentials are available
pub fn has_live_credentials() -> bool {
    dotenvy::dotenv().ok();
    std::env::var("INSTANCE_HOST").is_ok() && std::env::var("AUTH_TOKEN").is_ok()
}

/// Load a live config from the environment, writing into a temp directory
pub fn live_config() -> Result<(Config, TempDir), String> {
    let mut config = Config::from_env().map_err(|e| e.to_string())?;
    let temp_dir = tempfile::tempdir().map_err(|e| format!("Failed to create temp dir: {e}"))?;
    config.output_dir = temp_dir.path().join("apexlogs");
    Ok((config, temp_dir))
}
