use std::path::PathBuf;

use thiserror::Error;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, Error)]
pub enum LogSetupError {
    #[error("Invalid log filter '{filter}': {source}")]
    Filter {
        filter: String,
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("Failed to create log directory {}: {source}", dir.display())]
    Directory {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create log file appender: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),

    #[error("A global subscriber is already installed")]
    AlreadyInitialized,
}

/// Where and how much to log. Console output is always on; warnings and
/// errors go to stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Filter used when `RUST_LOG` is unset, e.g. `"info"` or `"seiya=debug"`.
    pub level: String,
    /// Daily rolling file `<dir>/<file_prefix>.<date>.log`, when set.
    pub file_dir: Option<PathBuf>,
    pub file_prefix: String,
    pub max_files: usize,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_dir: None,
            file_prefix: "seiya".to_string(),
            max_files: 5,
        }
    }
}

impl LogSettings {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_file(mut self, dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        self.file_dir = Some(dir.into());
        self.file_prefix = prefix.into();
        self
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    fn filter(&self) -> Result<EnvFilter, LogSetupError> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .map_err(|source| LogSetupError::Filter {
                filter: self.level.clone(),
                source,
            })
    }
}

/// Installs the global subscriber for a binary or demo. Libraries only emit
/// events.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// lifetime of the program. `None` when no file output was requested.
pub fn setup_logging(settings: &LogSettings) -> Result<Option<WorkerGuard>, LogSetupError> {
    let env_filter = settings.filter()?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stdout.and(std::io::stderr.with_min_level(Level::WARN)));

    let (file_layer, guard) = match &settings.file_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| LogSetupError::Directory {
                dir: dir.clone(),
                source,
            })?;
            let appender = tracing_appender::rolling::Builder::new()
                .rotation(tracing_appender::rolling::Rotation::DAILY)
                .filename_prefix(&settings.file_prefix)
                .filename_suffix("log")
                .max_log_files(settings.max_files.max(1))
                .build(dir)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|_| LogSetupError::AlreadyInitialized)?;

    Ok(guard)
}
