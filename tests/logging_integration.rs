//! Rolling file logging
//!
//! Installs the global subscriber, so it lives in its own test binary.

use persona_streams::config::LoggingSettings;
use persona_streams::logging::{self, LOG_FILE_PREFIX};
use persona_streams::StreamsError;
use serial_test::serial;

#[test]
#[serial]
fn test_file_logging_and_double_init() {
    let dir = tempfile::tempdir().unwrap();
    let settings = LoggingSettings {
        enabled: true,
        level: "info".to_string(),
        directory: Some(dir.path().to_path_buf()),
    };

    let guard = logging::init(&settings).unwrap();
    assert!(guard.is_some());

    tracing::info!("written to the rolling file");
    drop(guard);

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(LOG_FILE_PREFIX))
        .collect();
    assert_eq!(files.len(), 1);

    let contents = std::fs::read_to_string(files[0].path()).unwrap();
    assert!(contents.contains("written to the rolling file"));

    // The global subscriber can only be installed once
    let again = logging::init(&LoggingSettings::default());
    assert!(matches!(again, Err(StreamsError::Logging(_))));
}
