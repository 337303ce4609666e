// Local crates
use crate::client::client::{ClientError, MetricsClient};

// External crates
use async_trait::async_trait;

/// Client used by `--dry-run`: accepts every action and delivers nothing.
///
/// The interpreter already logs each dispatched command, so this client only
/// keeps a tally for the closing summary.
#[derive(Debug, Default)]
pub struct DryRunClient {
    host: String,
    actions: usize,
    flushes: usize,
}

impl DryRunClient {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Metric actions accepted so far, flushes excluded.
    pub fn actions(&self) -> usize {
        self.actions
    }
}

#[async_trait]
impl MetricsClient for DryRunClient {
    async fn gauge(&mut self, name: &str, value: f64, _tags: &[String]) -> Result<(), ClientError> {
        tracing::trace!(metric = %name, value, "dry run: gauge not sent");
        self.actions += 1;
        Ok(())
    }

    async fn count(&mut self, name: &str, delta: f64, _tags: &[String]) -> Result<(), ClientError> {
        tracing::trace!(metric = %name, delta, "dry run: count not sent");
        self.actions += 1;
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ClientError> {
        self.flushes += 1;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ClientError> {
        tracing::debug!(
            host = %self.host,
            actions = self.actions,
            flushes = self.flushes,
            "dry run finished, nothing was delivered"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn accepts_everything() {
        let mut client = DryRunClient::new("localhost");
        client.gauge("a", 1.0, &[]).await.unwrap();
        client.increment("b", &[]).await.unwrap();
        client.decrement("b", &[]).await.unwrap();
        client.flush().await.unwrap();
        client.close().await.unwrap();
        assert_eq!(client.actions(), 3);
    }
}
