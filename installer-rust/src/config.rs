use serde::Serialize;
use std::{fmt, str::FromStr};

use crate::error::ForgeError;

pub const PRODUCT_NAME: &str = "Flames ISO Installer";
pub const WINDOW_TITLE: &str = "Flames NT ISO Installer";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const SCRIPT_FILE_NAME: &str = "uup_download_windows.cmd";
pub const ACCELERATOR_DIR_NAME: &str = "files";
pub const ACCELERATOR_FILE_NAME: &str = "aria2c.exe";
pub const ACCELERATOR_URL: &str = "https://github.com/eladkarako/aria2c_win/raw/master/patched_official_aria2-1.36.0-win-64bit-build1/aria2c.exe";

pub const IMAGE_EXTENSION: &str = "iso";
pub const WORK_DIR_PREFIX: &str = "flames-iso-";

pub const INITIAL_STATUS: &str = "Select a build to begin.";

pub fn user_agent() -> String {
    format!("flames-iso-installer/{VERSION}")
}

/// Windows release track offered in the build selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Channel {
    #[default]
    Canary,
    Dev,
    Beta,
    Stable,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Canary, Channel::Dev, Channel::Beta, Channel::Stable];

    pub const fn label(self) -> &'static str {
        match self {
            Channel::Canary => "Canary Channel",
            Channel::Dev => "Dev Channel",
            Channel::Beta => "Beta Channel",
            Channel::Stable => "Stable Release",
        }
    }

    pub const fn script_url(self) -> &'static str {
        match self {
            Channel::Canary => "https://raw.githubusercontent.com/uup-dump/api/master/scripts/19045.3031/uup_download_windows.cmd",
            Channel::Dev => "https://raw.githubusercontent.com/uup-dump/api/master/scripts/23403.1000/uup_download_windows.cmd",
            Channel::Beta => "https://raw.githubusercontent.com/uup-dump/api/master/scripts/22621.1702/uup_download_windows.cmd",
            Channel::Stable => "https://raw.githubusercontent.com/uup-dump/api/master/scripts/22000.194/uup_download_windows.cmd",
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.label()).collect()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Channel {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label() == wanted)
            .ok_or_else(|| ForgeError::Selection(wanted.to_string()))
    }
}

/// Remote locations one run downloads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub script_url: String,
    pub accelerator_url: String,
}

impl Endpoints {
    pub fn for_channel(channel: Channel) -> Self {
        Self {
            script_url: channel.script_url().to_string(),
            accelerator_url: ACCELERATOR_URL.to_string(),
        }
    }
}
