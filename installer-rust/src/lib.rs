//! Builds a Windows installation ISO from a UUP dump script and mounts it.
//!
//! The desktop shell lives in `tauri-ui-rust/webview-installer-rust`; this
//! crate holds everything it drives: downloads, the vendor script run,
//! image lookup, mounting and the single-run session.

pub mod config;
pub mod error;
pub mod fetch;
pub mod fs_ops;
pub mod locate;
pub mod logging;
pub mod mount;
pub mod paths;
pub mod runner;
pub mod session;
pub mod workflow;

pub use config::{Channel, Endpoints};
pub use error::ForgeError;
pub use session::{Session, SessionError};
pub use workflow::{RunReport, Stage, StatusSink, StatusUpdate};
