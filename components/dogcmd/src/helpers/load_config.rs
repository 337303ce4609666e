// External crates
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::instrument;

/// Optional configuration file. Every field may be omitted; command line flags
/// take precedence over anything set here.
///
/// ```toml
/// namespace = "app"
/// tags = "env:prod, team:core"
/// host = "web-01"
///
/// [datadog]
/// api_url = "https://api.datadoghq.eu"
/// timeout_ms = 5000
///
/// [logging]
/// level = "debug"
/// json = false
/// ```
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub namespace: Option<String>,
    pub tags: Option<String>,
    pub host: Option<String>,
    pub datadog: DatadogConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DatadogConfig {
    pub api_url: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl Config {
    /// Load and parse the configuration file
    #[instrument(
        name = "config_loader",
        target = "helpers::load_config",
        level = "trace",
        skip_all
    )]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        tracing::trace!(
            configuration_file_path = %path_ref.display(),
            "Loading dogcmd configuration file"
        );

        let config_str = fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read config file at {:?}", path_ref))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse TOML from {:?}", path_ref))?;

        tracing::trace!(
            configuration_file_path = %path_ref.display(),
            "dogcmd configuration file loaded successfully"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_all_sections() {
        let file = write_config(
            r#"
namespace = "app"
tags = "env:prod, team:core"
host = "web-01"

[datadog]
api_url = "https://api.datadoghq.eu"
timeout_ms = 2500

[logging]
level = "debug"
json = true
"#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.namespace.as_deref(), Some("app"));
        assert_eq!(config.tags.as_deref(), Some("env:prod, team:core"));
        assert_eq!(config.host.as_deref(), Some("web-01"));
        assert_eq!(
            config.datadog.api_url.as_deref(),
            Some("https://api.datadoghq.eu")
        );
        assert_eq!(config.datadog.timeout_ms, Some(2500));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.json, Some(true));
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let file = write_config("");
        assert_eq!(Config::load(file.path()).unwrap(), Config::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_config("namespce = \"typo\"\n");
        let err = Config::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse TOML"));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = Config::load("/nonexistent/dogcmd.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dogcmd.toml"));
    }
}
