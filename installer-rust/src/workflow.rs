use std::{
    fs, io,
    path::{Path, PathBuf},
    process::{Command, Output},
    sync::mpsc,
};

use serde::Serialize;

use crate::{
    config::{Channel, Endpoints},
    error::ForgeError,
    fetch::Fetcher,
    locate, mount, paths, runner,
};

pub const MOUNTED_MESSAGE: &str =
    "✅ ISO Mounted. Run setup.exe from mounted drive to continue installation.";
pub const FAILURE_PREFIX: &str = "❌ Error: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    Downloading,
    GeneratingImage,
    Locating,
    Mounting,
    Done,
    Failed,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub stage: Stage,
    pub message: String,
    pub finished: bool,
    pub error_kind: Option<&'static str>,
}

impl StatusUpdate {
    pub fn progress(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
            finished: false,
            error_kind: None,
        }
    }

    pub fn done() -> Self {
        Self {
            stage: Stage::Done,
            message: MOUNTED_MESSAGE.to_string(),
            finished: true,
            error_kind: None,
        }
    }

    pub fn failed(err: &ForgeError) -> Self {
        Self {
            stage: Stage::Failed,
            message: format!("{FAILURE_PREFIX}{err}"),
            finished: true,
            error_kind: Some(err.kind()),
        }
    }
}

/// Receives status posts from the worker. Implementations must hand the
/// update to the owning thread instead of touching its state directly.
pub trait StatusSink {
    fn post(&self, update: StatusUpdate);
}

impl StatusSink for mpsc::Sender<StatusUpdate> {
    fn post(&self, update: StatusUpdate) {
        let _ = self.send(update);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub channel: Channel,
    pub work_dir: PathBuf,
    pub image: PathBuf,
}

/// Runs one build against the real network, `cmd.exe` and PowerShell,
/// with the work directory under the system temp dir.
pub fn run(channel: Channel, sink: &(impl StatusSink + ?Sized)) -> Result<RunReport, ForgeError> {
    let fetcher = match Fetcher::new() {
        Ok(fetcher) => fetcher,
        Err(err) => {
            tracing::error!(error = %err, "http client setup failed");
            sink.post(StatusUpdate::failed(&err));
            return Err(err);
        }
    };
    run_with_deps(
        channel,
        &Endpoints::for_channel(channel),
        &std::env::temp_dir(),
        sink,
        |url, dest| fetcher.download(url, dest).map(|_| ()),
        runner::exec_captured,
    )
}

/// Drives the build through its stages and posts exactly one terminal
/// status (`Done` or `Failed`) before returning.
pub fn run_with_deps(
    channel: Channel,
    endpoints: &Endpoints,
    work_root: &Path,
    sink: &(impl StatusSink + ?Sized),
    mut download_fn: impl FnMut(&str, &Path) -> Result<(), ForgeError>,
    mut exec: impl FnMut(&mut Command) -> io::Result<Output>,
) -> Result<RunReport, ForgeError> {
    let span = tracing::info_span!("build", channel = %channel);
    let _enter = span.enter();

    let result = (|| -> Result<RunReport, ForgeError> {
        sink.post(StatusUpdate::progress(
            Stage::Downloading,
            format!("Preparing to download {channel} script..."),
        ));
        let work_dir = paths::create_work_dir(work_root)?;
        tracing::info!(work_dir = %work_dir.display(), "work dir created");

        sink.post(StatusUpdate::progress(
            Stage::Downloading,
            "Downloading UUP Dump script...",
        ));
        let script = paths::script_path(&work_dir);
        download_fn(&endpoints.script_url, &script)?;

        let files_dir = paths::accelerator_dir(&work_dir);
        fs::create_dir_all(&files_dir)
            .map_err(|err| ForgeError::io(format!("create {}", files_dir.display()), err))?;
        sink.post(StatusUpdate::progress(
            Stage::Downloading,
            "Downloading aria2c.exe for UUP Dump...",
        ));
        download_fn(&endpoints.accelerator_url, &paths::accelerator_path(&work_dir))?;

        sink.post(StatusUpdate::progress(
            Stage::GeneratingImage,
            "Generating ISO (this may take a while)...",
        ));
        runner::run_script(&script, &work_dir, &mut exec)?;

        sink.post(StatusUpdate::progress(
            Stage::Locating,
            "Locating generated ISO...",
        ));
        let image = locate::find_image(&work_dir)?;
        tracing::info!(image = %image.display(), "image located");

        sink.post(StatusUpdate::progress(Stage::Mounting, "Mounting ISO..."));
        mount::mount_image(&image, &mut exec)?;

        Ok(RunReport {
            channel,
            work_dir,
            image,
        })
    })();

    match &result {
        Ok(report) => {
            tracing::info!(image = %report.image.display(), "build finished");
            sink.post(StatusUpdate::done());
        }
        Err(err) => {
            tracing::error!(kind = err.kind(), error = %err, "build failed");
            sink.post(StatusUpdate::failed(err));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_stages() {
        assert!(Stage::Done.is_terminal());
        assert!(Stage::Failed.is_terminal());
        assert!(!Stage::Idle.is_terminal());
        assert!(!Stage::Mounting.is_terminal());
    }

    #[test]
    fn failed_status_is_prefixed() {
        let update = StatusUpdate::failed(&ForgeError::Selection("Nightly".to_string()));
        assert_eq!(update.message, "❌ Error: Invalid build selection: Nightly");
        assert_eq!(update.error_kind, Some("SelectionError"));
        assert!(update.finished);
    }

    #[test]
    fn status_serializes_for_the_ui() {
        let json = serde_json::to_value(StatusUpdate::progress(
            Stage::GeneratingImage,
            "Generating ISO (this may take a while)...",
        ))
        .unwrap();
        assert_eq!(json["stage"], "generating_image");
        assert_eq!(json["finished"], false);
        assert!(json["error_kind"].is_null());
    }

    #[test]
    fn channel_sender_is_a_sink() {
        let (tx, rx) = mpsc::channel::<StatusUpdate>();
        tx.post(StatusUpdate::done());
        assert_eq!(rx.recv().unwrap().stage, Stage::Done);
    }
}
