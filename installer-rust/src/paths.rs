use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::{config, error::ForgeError};

pub fn self_path() -> Result<PathBuf> {
    std::env::current_exe().context("current_exe")
}

pub fn root_dir() -> Result<PathBuf> {
    let exe = self_path()?;
    Ok(exe.parent().context("exe has no parent")?.to_path_buf())
}

/// Creates a fresh work directory under `base` and detaches it from
/// `tempfile`'s cleanup, so the directory outlives the run.
pub fn create_work_dir(base: &Path) -> Result<PathBuf, ForgeError> {
    let dir = tempfile::Builder::new()
        .prefix(config::WORK_DIR_PREFIX)
        .tempdir_in(base)
        .map_err(|err| ForgeError::io(format!("create work dir in {}", base.display()), err))?;
    Ok(dir.keep())
}

pub fn script_path(work_dir: &Path) -> PathBuf {
    work_dir.join(config::SCRIPT_FILE_NAME)
}

pub fn accelerator_dir(work_dir: &Path) -> PathBuf {
    work_dir.join(config::ACCELERATOR_DIR_NAME)
}

pub fn accelerator_path(work_dir: &Path) -> PathBuf {
    accelerator_dir(work_dir).join(config::ACCELERATOR_FILE_NAME)
}
