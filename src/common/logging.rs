//! Logging setup.
//!
//! Nothing here installs a global subscriber. [`LogSettings`] is resolved
//! from the [`Environment`] snapshot and the `logging` config section, then
//! turned into a [`LogHandle`] whose dispatch is entered as a scoped default
//! for the current thread. With no sink configured every event is dropped,
//! and stdout is never written because it carries the status line itself.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::dispatcher::{self, DefaultGuard, Dispatch};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::common::environment::Environment;
use crate::common::error::StatusLineError;
use crate::common::result::StatusLineResult;
use crate::domain::entities::settings::LoggingConfig;

const LOG_FILE_NAME: &str = "status-line.log";
const APP_NAME: &str = "cc-status-line";

/// Severity threshold, using the names accepted in `CCSL_LOG_LEVEL`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Parse a level name, case-insensitively. Unknown names yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "WARNING" | "WARN" => Some(Self::Warning),
            "ERROR" => Some(Self::Error),
            "CRITICAL" => Some(Self::Critical),
            _ => None,
        }
    }

    fn directive(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            // tracing has no level above error
            Self::Error | Self::Critical => "error",
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Warning
    }
}

/// Fully resolved logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LogLevel,
    pub stderr: bool,
    pub file: Option<PathBuf>,
}

impl LogSettings {
    /// Settings derived from the environment alone, used before config is loaded
    pub fn from_environment(env: &Environment) -> Self {
        Self::resolve(env, &LoggingConfig::default())
    }

    /// Environment overrides first, then the `logging` config section, then defaults
    pub fn resolve(env: &Environment, config: &LoggingConfig) -> Self {
        let level = env
            .log_level
            .as_deref()
            .and_then(LogLevel::parse)
            .or_else(|| config.level.as_deref().and_then(LogLevel::parse))
            .unwrap_or_default();

        let stderr = env.debug || config.stderr_enabled.unwrap_or(false);

        let file = match &env.log_file {
            Some(path) => Some(env.expand_home(path)),
            None if config.file_enabled.unwrap_or(false) => Some(
                config
                    .file_path
                    .as_deref()
                    .map(|p| env.expand_home(p))
                    .unwrap_or_else(|| default_log_file(env)),
            ),
            None => None,
        };

        Self {
            level,
            stderr,
            file,
        }
    }

    /// Build the dispatch. Fails only when the log file cannot be opened.
    pub fn build(&self) -> StatusLineResult<LogHandle> {
        let filter = EnvFilter::new(self.level.directive());

        let stderr_layer = self.stderr.then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .without_time()
        });

        let file_layer = match &self.file {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).map_err(|e| {
                        StatusLineError::logging_error(format!(
                            "cannot create log directory {}: {}",
                            parent.display(),
                            e
                        ))
                    })?;
                }
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| {
                        StatusLineError::logging_error(format!(
                            "cannot open log file {}: {}",
                            path.display(),
                            e
                        ))
                    })?;
                Some(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(true),
                )
            }
            None => None,
        };

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .with(file_layer);

        Ok(LogHandle {
            dispatch: Dispatch::new(subscriber),
        })
    }
}

/// An owned logging dispatch, entered explicitly by whoever holds it
#[derive(Clone)]
pub struct LogHandle {
    dispatch: Dispatch,
}

impl LogHandle {
    /// A handle that discards every event
    pub fn disabled() -> Self {
        Self {
            dispatch: Dispatch::none(),
        }
    }

    /// Make this dispatch the default for the current thread until the guard drops
    pub fn enter(&self) -> DefaultGuard {
        dispatcher::set_default(&self.dispatch)
    }
}

impl std::fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogHandle").finish_non_exhaustive()
    }
}

fn default_log_file(env: &Environment) -> PathBuf {
    if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME)
            .join("logs")
            .join(LOG_FILE_NAME)
    } else if cfg!(target_os = "macos") {
        env.home_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Library")
            .join("Logs")
            .join(APP_NAME)
            .join(LOG_FILE_NAME)
    } else {
        let state_dir = match &env.xdg_state_home {
            Some(dir) => PathBuf::from(dir),
            None => env
                .home_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".local")
                .join("state"),
        };
        state_dir.join(APP_NAME).join(LOG_FILE_NAME)
    }
}
