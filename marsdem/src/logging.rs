//! Tracing subscriber setup.
//!
//! Logs go to stderr, and optionally to a file as well. The filter comes from
//! `RUST_LOG` when set, otherwise from [`LoggingConfig::default_directive`].

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "marsdem=info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log file path: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("Failed to create log directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Where and how verbosely to log.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub default_directive: String,
    pub log_file: Option<PathBuf>,
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_directive: DEFAULT_DIRECTIVE.to_string(),
            log_file: None,
            ansi: true,
        }
    }
}

impl LoggingConfig {
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.default_directive = directive.into();
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.default_directive))
    }
}

/// Splits a log file path into its directory and file name.
fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf), LoggingError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(path.to_path_buf()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, PathBuf::from(file_name)))
}

/// Installs the global subscriber.
///
/// When a log file is configured the returned guard must be held until
/// shutdown; dropping it flushes and stops the background writer.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi)
        .with_target(false);

    match &config.log_file {
        Some(path) => {
            let (dir, file_name) = split_log_path(path)?;
            std::fs::create_dir_all(&dir).map_err(|source| LoggingError::CreateDir {
                path: dir.clone(),
                source,
            })?;
            let appender = tracing_appender::rolling::never(&dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_timer(LocalTime::rfc_3339());

            tracing_subscriber::registry()
                .with(config.filter())
                .with(stderr_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(config.filter())
                .with(stderr_layer)
                .try_init()
                .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;
            Ok(None)
        }
    }
}
