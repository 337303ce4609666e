// External crates
use anyhow::{Context, Result};
use std::io::IsTerminal;
use std::panic;
use tracing::error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_error::ErrorLayer;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*, registry::Registry};

/// Level used when neither `RUST_LOG` nor the config file sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// How log lines are filtered and rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingOptions {
    /// `EnvFilter` directive, overridden by `RUST_LOG` when set.
    pub level: String,
    /// Emit JSON lines instead of human readable text.
    pub json: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json: false,
        }
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays free.
///
/// The returned guard flushes buffered log lines when dropped and must be held
/// for the lifetime of the run.
pub fn init_tracing(options: &LoggingOptions) -> Result<WorkerGuard> {
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&options.level)
            .with_context(|| format!("Invalid log level {:?}", options.level))?,
    };

    let ansi = std::io::stderr().is_terminal();

    let fmt_layer = (!options.json).then(|| {
        fmt::layer()
            .with_ansi(ansi)
            .with_writer(non_blocking_writer.clone())
            .with_target(false)
            .with_timer(fmt::time::UtcTime::rfc_3339())
    });

    let json_layer = options.json.then(|| {
        fmt::layer()
            .json()
            .with_writer(non_blocking_writer.clone())
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .with_timer(fmt::time::UtcTime::rfc_3339())
    });

    let error_layer = ErrorLayer::default();

    let subscriber = Registry::default()
        .with(filter)
        .with(fmt_layer)
        .with(json_layer)
        .with(error_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set global tracing subscriber")?;

    Ok(guard)
}

pub fn init_panic_handler() {
    panic::set_hook(Box::new(|panic_info| {
        let msg = match panic_info.payload().downcast_ref::<&str>() {
            Some(s) => *s,
            None => match panic_info.payload().downcast_ref::<String>() {
                Some(s) => s.as_str(),
                None => "Unknown panic",
            },
        };

        let location = panic_info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown location".to_string());

        error!(
            panic_message = %msg,
            location = %location,
            "dogcmd panicked!"
        );
    }));
}
