// Local crates
use crate::{
    cli::cli::Cli,
    client::datadog::{ApiKey, DatadogOptions},
    helpers::load_config::Config,
    instrumentation::tracing::LoggingOptions,
    interpreter::context::{Namespace, RunContext, parse_tags},
};

// External crates
use std::time::Duration;
use tracing::instrument;

/// Startup failures that happen before any command runs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to get hostname")]
    Hostname(#[source] std::io::Error),
    #[error("hostname {0:?} is not valid UTF-8")]
    InvalidHostname(String),
}

/// Everything a run needs, merged from flags, the config file and defaults.
#[derive(Debug)]
pub struct Settings {
    pub context: RunContext,
    pub host: String,
    pub api_key: Option<ApiKey>,
    pub dry_run: bool,
    pub datadog: DatadogOptions,
    pub logging: LoggingOptions,
}

impl Settings {
    /// Merge flags over file values over defaults. The host falls back to the
    /// local hostname when neither source names one.
    #[instrument(
        name = "dogcmd_settings::resolve",
        target = "cli::settings",
        skip_all,
        level = "trace"
    )]
    pub fn resolve(cli: &Cli, file: Option<&Config>) -> Result<Self, ConfigError> {
        let file = file.cloned().unwrap_or_default();

        let namespace = cli.namespace.clone().or(file.namespace).unwrap_or_default();
        let tags = cli.tags.clone().or(file.tags).unwrap_or_default();

        let host = match cli.host.clone().or(file.host) {
            Some(host) => host,
            None => local_hostname()?,
        };

        let defaults = DatadogOptions::default();
        let datadog = DatadogOptions {
            api_url: cli
                .api_url
                .clone()
                .or(file.datadog.api_url)
                .unwrap_or(defaults.api_url),
            timeout: file
                .datadog
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
        };

        let logging = LoggingOptions {
            level: file
                .logging
                .level
                .unwrap_or_else(|| LoggingOptions::default().level),
            json: cli.log_json || file.logging.json.unwrap_or(false),
        };

        Ok(Self {
            context: RunContext::new(Namespace::new(namespace), parse_tags(&tags)),
            host,
            api_key: cli.api_key.clone(),
            dry_run: cli.dry_run,
            datadog,
            logging,
        })
    }
}

fn local_hostname() -> Result<String, ConfigError> {
    hostname::get()
        .map_err(ConfigError::Hostname)?
        .into_string()
        .map_err(|raw| ConfigError::InvalidHostname(raw.to_string_lossy().into_owned()))
}
