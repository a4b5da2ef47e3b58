//! Tracing setup: stderr for humans, an optional rolling file for later
//!
//! `RUO_LOG` controls the stderr filter, `RUO_LOG_DIR` the log file location.

use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory of the daily log file, `None` disables file logging
    pub log_dir: Option<PathBuf>,
    pub file_level: LevelFilter,
    /// Default stderr filter when `RUO_LOG` is unset
    pub stderr_filter: String,
    /// Emit JSON lines into the log file
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            file_level: LevelFilter::DEBUG,
            stderr_filter: "warn".into(),
            json: false,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("RUO_LOG_DIR") {
            config.log_dir = if dir.is_empty() { None } else { Some(PathBuf::from(dir)) };
        }
        if let Ok(filter) = std::env::var("RUO_LOG") {
            config.stderr_filter = filter;
        }
        config.json = std::env::var("RUO_LOG_JSON").is_ok_and(|v| v == "1" || v == "true");

        config
    }

    /// Apply the `log_level` value of the configuration file
    pub fn with_file_level(mut self, level: Option<&str>) -> Self {
        match level {
            Some(level) if level.eq_ignore_ascii_case("off") => self.log_dir = None,
            Some(level) => {
                if let Ok(level) = level.parse() {
                    self.file_level = level;
                }
            },
            None => {},
        }
        self
    }

    /// Raise the stderr filter to `debug` for the crate
    pub fn verbose(mut self, enabled: bool) -> Self {
        if enabled {
            self.stderr_filter = "ruo=debug,info".into();
        }
        self
    }
}

fn default_log_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ruo").map(|dirs| dirs.data_local_dir().join("logs"))
}

/// Install the global subscriber; keep the guard alive until exit so the file writer flushes
pub fn init_logging(
    config: LoggingConfig,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync>> {
    let stderr_filter = EnvFilter::try_new(&config.stderr_filter)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_filter);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, "ruo.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = if config.json {
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_filter(config.file_level)
                    .boxed()
            } else {
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(config.file_level)
                    .boxed()
            };
            (Some(layer), Some(guard))
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
