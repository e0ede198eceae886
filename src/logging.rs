//! Process-wide logging for the desktop shell.
//!
//! Logs go to size-rotated files under `<root>/logs` and are duplicated to
//! stderr. Initialization happens once; later calls with the same directory
//! are no-ops.

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode,
};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

pub fn resolve_desktop_log_dir(root_dir: Option<PathBuf>) -> PathBuf {
    root_dir
        .unwrap_or_else(std::env::temp_dir)
        .join("logs")
}

pub fn init_logging(level: &str, log_dir: &Path, basename: &str) -> Result<(), String> {
    let level = normalize_level(level)?;

    if let Some(state) = LOGGING_STATE.get() {
        if state.log_dir == log_dir {
            return Ok(());
        }
        return Err(format!(
            "logging already initialized at {}; refusing to switch to {}",
            state.log_dir.display(),
            log_dir.display()
        ));
    }

    LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, String> {
        std::fs::create_dir_all(log_dir).map_err(|error| {
            format!(
                "Failed to create log directory {}: {}",
                log_dir.display(),
                error
            )
        })?;

        let logger = Logger::try_with_str(level)
            .map_err(|error| format!("Invalid log level {level}: {error}"))?
            .log_to_file(FileSpec::default().directory(log_dir).basename(basename))
            .duplicate_to_stderr(Duplicate::Info)
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .map_err(|error| format!("Failed to start logger: {error}"))?;

        Ok(LoggingState {
            log_dir: log_dir.to_path_buf(),
            _logger: logger,
        })
    })?;

    Ok(())
}

pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

pub(crate) fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level '{other}'; expected trace|debug|info|warn|error"
        )),
    }
}

pub fn append_desktop_log(message: &str) {
    log::info!(target: "desktop", "{message}");
}

pub fn append_startup_log(message: &str) {
    log::info!(target: "startup", "{message}");
}

pub fn append_presence_log(message: &str) {
    log::info!(target: "presence", "{message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_level_accepts_known_values() {
        assert_eq!(normalize_level(" WARNING "), Ok("warn"));
        assert_eq!(normalize_level("Info"), Ok("info"));
    }

    #[test]
    fn normalize_level_rejects_unknown_values() {
        let error = normalize_level("verbose").expect_err("unknown level must be rejected");
        assert!(error.contains("verbose"));
    }

    #[test]
    fn resolve_desktop_log_dir_uses_root_logs_subdir() {
        let root = PathBuf::from("/opt/uedp");
        assert_eq!(
            resolve_desktop_log_dir(Some(root)),
            PathBuf::from("/opt/uedp/logs")
        );
    }

    #[test]
    fn init_logging_is_idempotent_for_same_dir() {
        let temp = tempfile::tempdir().expect("temp dir");
        let log_dir = temp.path().join("logs");

        init_logging("info", &log_dir, "uedp-test").expect("first init should succeed");
        init_logging("info", &log_dir, "uedp-test").expect("same dir should be idempotent");
        assert!(log_dir.is_dir());

        let other = temp.path().join("other");
        let error = init_logging("info", &other, "uedp-test")
            .expect_err("switching directories should fail");
        assert!(error.contains("refusing to switch"));
    }
}
