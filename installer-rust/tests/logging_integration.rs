use flames_installer::logging;

#[test]
fn logging_init_creates_file_under_runtime_logs() {
    let tmp = tempfile::tempdir().unwrap();
    let log_path = logging::init(tmp.path()).expect("logging init should succeed");
    assert!(log_path.exists());
    assert!(log_path.starts_with(tmp.path().join(".runtime").join("logs")));
}
