use std::path::PathBuf;

use thiserror::Error;

/// Everything that can end a build run.
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("Invalid build selection: {0}")]
    Selection(String),

    #[error("download of {url} failed: {source}")]
    Network {
        url: String,
        status: Option<u16>,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Script failed (exit {code:?}): {stderr}")]
    ScriptExecution { code: Option<i32>, stderr: String },

    #[error("ISO generation failed. Check the UUP Dump script logs. (no .{extension} file in {dir})")]
    NotFound { dir: PathBuf, extension: &'static str },

    #[error("Mounting failed for {image}: {detail}")]
    MountFailure { image: PathBuf, detail: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ForgeError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ForgeError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn network(
        url: &str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        ForgeError::Network {
            url: url.to_string(),
            status: None,
            source: source.into(),
        }
    }

    pub fn http_status(url: &str, source: reqwest::Error) -> Self {
        ForgeError::Network {
            url: url.to_string(),
            status: source.status().map(|s| s.as_u16()),
            source: Box::new(source),
        }
    }

    /// Short name of the failure kind, used in logs and by the UI.
    pub fn kind(&self) -> &'static str {
        match self {
            ForgeError::Selection(_) => "SelectionError",
            ForgeError::Network { .. } => "NetworkError",
            ForgeError::ScriptExecution { .. } => "ScriptExecutionError",
            ForgeError::NotFound { .. } => "NotFoundError",
            ForgeError::MountFailure { .. } => "MountFailureError",
            ForgeError::Io { .. } => "IoError",
        }
    }
}
