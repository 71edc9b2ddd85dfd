#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    flames_installer_ui_lib::run()
}
