use flames_installer::{config, logging, paths, Channel, ForgeError, Session, StatusSink, StatusUpdate};
use serde::Serialize;
use tauri::{AppHandle, Emitter, Manager};

const STATUS_EVENT: &str = "build-status";
const START_LABEL: &str = "Download & Install ISO 💾";

#[derive(Clone, Serialize)]
struct BuildUiInfo {
    title: &'static str,
    channels: Vec<&'static str>,
    default_channel: &'static str,
    initial_status: &'static str,
    start_label: &'static str,
}

/// Posts worker updates as window events; the web view applies them on its
/// own loop, in the order they were emitted.
struct WindowSink {
    app: AppHandle,
}

impl StatusSink for WindowSink {
    fn post(&self, update: StatusUpdate) {
        if let Err(err) = self.app.emit(STATUS_EVENT, update) {
            tracing::warn!(error = %err, "failed to deliver status to window");
        }
    }
}

#[tauri::command]
fn get_ui_info() -> BuildUiInfo {
    BuildUiInfo {
        title: config::WINDOW_TITLE,
        channels: Channel::labels(),
        default_channel: Channel::default().label(),
        initial_status: config::INITIAL_STATUS,
        start_label: START_LABEL,
    }
}

#[tauri::command]
fn is_build_running(session: tauri::State<'_, Session>) -> bool {
    session.is_running()
}

#[tauri::command]
fn start_build(
    app: AppHandle,
    session: tauri::State<'_, Session>,
    label: String,
) -> Result<(), String> {
    let channel: Channel = label.parse().map_err(|err: ForgeError| {
        tracing::error!(kind = err.kind(), error = %err, "rejected build selection");
        err.to_string()
    })?;
    session
        .start_build(channel, WindowSink { app })
        .map(|_worker| ())
        .map_err(|err| err.to_string())
}

fn init_logging() -> anyhow::Result<()> {
    let root = paths::root_dir()?;
    logging::init(&root)?;
    Ok(())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    if let Err(err) = init_logging() {
        eprintln!("warning: logging unavailable: {err:#}");
    }
    tracing::info!(version = config::VERSION, "{} starting", config::PRODUCT_NAME);

    tauri::Builder::default()
        .manage(Session::new())
        .setup(|app| {
            if let Some(window) = app.get_webview_window("main") {
                let _ = window.set_title(config::WINDOW_TITLE);
                let _ = window.center();
            }
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            get_ui_info,
            is_build_running,
            start_build
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
