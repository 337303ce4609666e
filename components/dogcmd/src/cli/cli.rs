// Local crates
use crate::{
    cli::settings::Settings,
    client::{
        client::MetricsClient,
        datadog::{ApiKey, DatadogClient},
        dry_run::DryRunClient,
    },
    helpers::load_config::Config,
    instrumentation,
    interpreter::{
        context::RunContext,
        interpreter::{Interpreter, RunSummary},
    },
};

// External crates
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "dogcmd",
    long_about = "dogcmd reads a flat list of commands from its arguments and sends the matching metrics to Datadog, one command at a time, stopping at the first error.",
    about = "Emit Datadog metrics from the command line",
    version,
    term_width = 100,
    after_help = "\
    COMMANDS:
        gauge|g <name> <value>    set a gauge
        count|c <name> <value>    add <value> to a counter
        incr|i <name>             add one to a counter
        decr|d <name>             subtract one from a counter
        sleep|s <duration>        pause, e.g. 500ms, 2s, 1m30s
        flush|f                   deliver buffered metrics

    EXAMPLES:
        dogcmd --namespace=deploy --tags=env:prod gauge duration 12.5 incr count flush
        dogcmd gauge queue.depth 10 sleep 1s gauge queue.depth 4 flush"
)]
pub struct Cli {
    /// Prefix applied to every metric name, a trailing '.' is added if missing
    #[arg(long, value_name = "PREFIX")]
    pub namespace: Option<String>,

    /// Comma separated tags attached to every metric
    #[arg(long, value_name = "CSV")]
    pub tags: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Host reported with every metric, defaults to the local hostname
    #[arg(long)]
    pub host: Option<String>,

    /// Datadog API key
    #[arg(long, env = "DD_API_KEY", hide_env_values = true)]
    pub api_key: Option<ApiKey>,

    /// Datadog API base URL
    #[arg(long, env = "DD_API_URL")]
    pub api_url: Option<String>,

    /// Log commands without sending anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Commands to run, in order
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    pub commands: Vec<String>,
}

/// Entry function for CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let file = cli
        .config
        .as_deref()
        .map(Config::load)
        .transpose()?;
    let settings = Settings::resolve(&cli, file.as_ref())?;

    let _guard = instrumentation::tracing::init_tracing(&settings.logging)?;
    instrumentation::tracing::init_panic_handler();

    if !settings.context.namespace.is_empty() {
        tracing::info!(namespace = %settings.context.namespace.as_str(), "setting namespace");
    }
    if !settings.context.tags.is_empty() {
        tracing::info!(tags = ?settings.context.tags, "setting tags");
    }

    let Settings {
        context,
        host,
        api_key,
        dry_run,
        datadog,
        ..
    } = settings;

    let mut client: Box<dyn MetricsClient> = if dry_run {
        Box::new(DryRunClient::new(host))
    } else {
        let api_key = api_key.unwrap_or_else(|| ApiKey::new(""));
        Box::new(DatadogClient::new(host, api_key, datadog).context("unable to create metrics client")?)
    };

    let summary = execute(&context, client.as_mut(), &cli.commands).await?;
    tracing::debug!(dispatched = summary.dispatched, "dogcmd finished");
    Ok(())
}

/// Run `tokens` and close the client afterwards, on success and on failure.
///
/// A command failure takes precedence over a failure to close.
pub async fn execute(
    context: &RunContext,
    client: &mut dyn MetricsClient,
    tokens: &[String],
) -> Result<RunSummary> {
    let outcome = Interpreter::new(context, &mut *client).run(tokens).await;
    let closed = client.close().await;

    match (outcome, closed) {
        (Ok(summary), Ok(())) => Ok(summary),
        (Ok(_), Err(e)) => Err(e).context("unable to close metrics client"),
        (Err(e), Ok(())) => Err(e.into()),
        (Err(e), Err(close_err)) => {
            tracing::warn!(error = %close_err, "unable to close metrics client after failure");
            Err(e.into())
        }
    }
}
