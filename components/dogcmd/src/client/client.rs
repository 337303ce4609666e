// External crates
use async_trait::async_trait;

/// Metrics client error handling
/// - Every variant is fatal for the run; callers never retry.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("missing API key (set DD_API_KEY or pass --api-key)")]
    MissingApiKey,
    #[error("unable to build HTTP client")]
    Build(#[source] reqwest::Error),
    #[error("series submission failed")]
    Request(#[source] reqwest::Error),
    #[error("backend rejected submission with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("value for {metric:?} is not a finite number")]
    NonFinite { metric: String },
    #[error("client is closed")]
    Closed,
}

/// Sink for metric actions.
///
/// Implementations may buffer; nothing is guaranteed to be delivered until
/// [`MetricsClient::flush`] or [`MetricsClient::close`] returns `Ok`.
#[async_trait]
pub trait MetricsClient: Send {
    /// Set gauge `name` to `value`.
    async fn gauge(&mut self, name: &str, value: f64, tags: &[String]) -> Result<(), ClientError>;

    /// Add `delta` to counter `name`.
    async fn count(&mut self, name: &str, delta: f64, tags: &[String]) -> Result<(), ClientError>;

    /// Add one to counter `name`.
    async fn increment(&mut self, name: &str, tags: &[String]) -> Result<(), ClientError> {
        self.count(name, 1.0, tags).await
    }

    /// Subtract one from counter `name`.
    async fn decrement(&mut self, name: &str, tags: &[String]) -> Result<(), ClientError> {
        self.count(name, -1.0, tags).await
    }

    /// Deliver everything buffered so far.
    async fn flush(&mut self) -> Result<(), ClientError>;

    /// Deliver remaining metrics and release the client. Called once at process end.
    async fn close(&mut self) -> Result<(), ClientError>;
}
