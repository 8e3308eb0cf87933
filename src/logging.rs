//! Tracing goes to a file; the terminal belongs to the UI.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The path has no file name component
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Directory the log file lives in; a bare file name means the working
/// directory
fn log_directory(log_path: &Path) -> &Path {
    match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        Some(_) | None => Path::new("."),
    }
}

/// Install the global subscriber writing to `log_path`. `RUST_LOG` picks the
/// filter, defaulting to `info`.
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    let file_name = log_path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    let directory = log_directory(log_path);
    std::fs::create_dir_all(directory).map_err(|source| {
        LoggingError::DirectoryCreation {
            path: directory.to_path_buf(),
            source,
        }
    })?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file_appender)
        .with_ansi(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serial_test::serial;

    use super::*;

    #[test]
    fn test_bare_file_name_logs_to_working_directory() {
        assert_eq!(log_directory(Path::new("deskboard.log")), Path::new("."));
        assert_eq!(
            log_directory(Path::new("/var/log/deskboard.log")),
            Path::new("/var/log")
        );
    }

    #[test]
    fn test_path_without_file_name_is_rejected() {
        assert!(matches!(
            init(Path::new("/")),
            Err(LoggingError::InvalidPath(_))
        ));
    }

    #[test]
    #[serial(tracing_init)]
    fn test_init_creates_log_directory() {
        let dir = std::env::temp_dir()
            .join(format!("deskboard-logs-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        // A second subscriber in the same process is refused; the directory
        // is created either way.
        let _ = init(&dir.join("nested").join("test.log"));
        assert!(dir.join("nested").exists());

        let _ = fs::remove_dir_all(&dir);
    }
}
