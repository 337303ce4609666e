//! Datadog client - responsibility and behavior
//!
//! The Datadog client buffers gauge and counter points in memory and submits them
//! to the Datadog series API (`POST /api/v1/series`) when asked to.
//!
//! Key responsibilities:
//! - Keep one pending point per (metric type, name, tags). Gauges keep the most
//! recent value and its timestamp, counters accumulate from the first timestamp.
//! - Refuse non-finite values, which the series API cannot represent.
//! - Serialize pending points into a single series submission on `flush()`.
//! - Surface transport failures and non-success responses as `ClientError`s.
//!
//! Important design notes:
//! - There is no background delivery and no retry. A point is delivered only by an
//! explicit `flush()` or by `close()`.
//! - Pending points are dropped once a submission has been attempted, whether or not
//! it succeeded; a failed submission ends the run anyway.

// Local crates
use crate::client::client::{ClientError, MetricsClient};

// External crates
use async_trait::async_trait;
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::convert::Infallible;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Public Datadog API endpoint (US1 site).
pub const DEFAULT_API_URL: &str = "https://api.datadoghq.com";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const SERIES_PATH: &str = "/api/v1/series";

/// Datadog API key. Cheap to clone; never printed by `Debug`.
#[derive(Debug, Clone)]
pub struct ApiKey(Arc<SecretString>);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Arc::new(SecretString::new(key.into())))
    }

    fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl FromStr for ApiKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Connection options for [`DatadogClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatadogOptions {
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for DatadogOptions {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum MetricKind {
    Gauge,
    Count,
}

#[derive(Debug, Clone, PartialEq)]
struct PendingPoint {
    kind: MetricKind,
    metric: String,
    tags: Vec<String>,
    timestamp: i64,
    value: f64,
}

/// Request body of a series submission.
#[derive(Debug, Serialize)]
struct SeriesPayload<'a> {
    series: Vec<Series<'a>>,
}

#[derive(Debug, Serialize)]
struct Series<'a> {
    metric: &'a str,
    #[serde(rename = "type")]
    kind: MetricKind,
    points: [(i64, f64); 1],
    host: &'a str,
    tags: &'a [String],
}

/// Buffering client for the Datadog series API.
#[derive(Debug)]
pub struct DatadogClient {
    http: reqwest::Client,
    series_url: String,
    api_key: ApiKey,
    host: String,
    pending: Vec<PendingPoint>,
    closed: bool,
}

impl DatadogClient {
    /// Create a client reporting as `host`.
    ///
    /// Fails when the API key is blank or the HTTP client cannot be built.
    #[instrument(
        name = "dogcmd_datadog::create",
        target = "client::datadog::DatadogClient",
        skip_all,
        level = "debug"
    )]
    pub fn new(
        host: impl Into<String>,
        api_key: ApiKey,
        options: DatadogOptions,
    ) -> Result<Self, ClientError> {
        if api_key.expose().trim().is_empty() {
            return Err(ClientError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(concat!("dogcmd/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Build)?;

        let series_url = format!("{}{}", options.api_url.trim_end_matches('/'), SERIES_PATH);
        let host = host.into();

        tracing::debug!(
            series_url = %series_url,
            host = %host,
            timeout_ms = options.timeout.as_millis() as u64,
            "Created Datadog client"
        );

        Ok(Self {
            http,
            series_url,
            api_key,
            host,
            pending: Vec::new(),
            closed: false,
        })
    }

    /// Number of points waiting for the next flush.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn record(
        &mut self,
        kind: MetricKind,
        name: &str,
        value: f64,
        tags: &[String],
    ) -> Result<(), ClientError> {
        if self.closed {
            return Err(ClientError::Closed);
        }
        if !value.is_finite() {
            return Err(ClientError::NonFinite {
                metric: name.to_string(),
            });
        }

        let now = Utc::now().timestamp();
        if let Some(point) = self
            .pending
            .iter_mut()
            .find(|p| p.kind == kind && p.metric == name && p.tags == tags)
        {
            match kind {
                MetricKind::Gauge => {
                    point.value = value;
                    point.timestamp = now;
                }
                MetricKind::Count => point.value += value,
            }
        } else {
            self.pending.push(PendingPoint {
                kind,
                metric: name.to_string(),
                tags: tags.to_vec(),
                timestamp: now,
                value,
            });
        }

        tracing::trace!(
            metric = %name,
            pending = self.pending.len(),
            "Buffered Datadog point"
        );
        Ok(())
    }

    async fn submit(&mut self) -> Result<(), ClientError> {
        if self.pending.is_empty() {
            tracing::debug!("Nothing buffered, skipping Datadog submission");
            return Ok(());
        }

        let points = std::mem::take(&mut self.pending);
        let payload = SeriesPayload {
            series: points
                .iter()
                .map(|p| Series {
                    metric: &p.metric,
                    kind: p.kind,
                    points: [(p.timestamp, p.value)],
                    host: &self.host,
                    tags: &p.tags,
                })
                .collect(),
        };

        tracing::debug!(
            series = payload.series.len(),
            series_url = %self.series_url,
            "Submitting series to Datadog"
        );

        let response = self
            .http
            .post(&self.series_url)
            .header("DD-API-KEY", self.api_key.expose())
            .json(&payload)
            .send()
            .await
            .map_err(ClientError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %body, "Datadog rejected series submission");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(status = status.as_u16(), "Datadog accepted series submission");
        Ok(())
    }
}

#[async_trait]
impl MetricsClient for DatadogClient {
    async fn gauge(&mut self, name: &str, value: f64, tags: &[String]) -> Result<(), ClientError> {
        self.record(MetricKind::Gauge, name, value, tags)
    }

    async fn count(&mut self, name: &str, delta: f64, tags: &[String]) -> Result<(), ClientError> {
        self.record(MetricKind::Count, name, delta, tags)
    }

    #[instrument(
        name = "dogcmd_datadog::flush",
        target = "client::datadog::DatadogClient",
        skip_all,
        level = "debug"
    )]
    async fn flush(&mut self) -> Result<(), ClientError> {
        if self.closed {
            return Err(ClientError::Closed);
        }
        self.submit().await
    }

    #[instrument(
        name = "dogcmd_datadog::close",
        target = "client::datadog::DatadogClient",
        skip_all,
        level = "debug"
    )]
    async fn close(&mut self) -> Result<(), ClientError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.submit().await
    }
}
