use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "installer.log";
const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper=warn";

pub fn logs_dir(root: &Path) -> PathBuf {
    root.join(".runtime").join("logs")
}

/// Opens `<root>/.runtime/logs/installer.log` for appending and routes
/// `tracing` output into it. A second call keeps the first subscriber.
pub fn init(root: &Path) -> Result<PathBuf> {
    let dir = logs_dir(root);
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    let log_path = dir.join(LOG_FILE_NAME);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("open {}", log_path.display()))?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(DEFAULT_FILTER))
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
        .try_init()
        .is_ok();
    if installed {
        tracing::info!(log = %log_path.display(), "logging initialized");
    }
    Ok(log_path)
}
