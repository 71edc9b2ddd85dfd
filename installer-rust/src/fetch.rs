use std::{fs, path::Path, time::Duration};

use crate::{
    config,
    error::ForgeError,
    fs_ops::{self, StreamError},
};

/// Blocking HTTP downloader shared by both downloads of a run.
pub struct Fetcher {
    client: reqwest::blocking::Client,
}

impl Fetcher {
    pub fn new() -> Result<Self, ForgeError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config::user_agent())
            .connect_timeout(Duration::from_secs(30))
            .timeout(None)
            .build()
            .map_err(|err| ForgeError::network("<client>", err))?;
        Ok(Self { client })
    }

    /// GETs `url` and writes the body to `dest`. The status is checked
    /// before anything touches the filesystem.
    pub fn download(&self, url: &str, dest: &Path) -> Result<u64, ForgeError> {
        tracing::info!(%url, dest = %dest.display(), "downloading");
        let mut resp = self
            .client
            .get(url)
            .send()
            .map_err(|err| ForgeError::network(url, err))?
            .error_for_status()
            .map_err(|err| ForgeError::http_status(url, err))?;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| ForgeError::io(format!("create {}", parent.display()), err))?;
        }

        let written = fs_ops::write_stream_atomic(dest, &mut resp).map_err(|err| match err {
            StreamError::Read(err) => ForgeError::network(url, err),
            StreamError::Write(err) => ForgeError::io(format!("write {}", dest.display()), err),
        })?;
        tracing::info!(%url, bytes = written, "download complete");
        Ok(written)
    }
}
