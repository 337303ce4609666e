//! In-memory client used by unit tests to observe dispatch order and timing.

use crate::client::client::{ClientError, MetricsClient};

use async_trait::async_trait;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Gauge(String, f64, Vec<String>),
    Count(String, f64, Vec<String>),
    Increment(String, Vec<String>),
    Decrement(String, Vec<String>),
    Flush,
    Close,
}

#[derive(Debug, Default)]
pub struct RecordingClient {
    pub calls: Vec<(Instant, Call)>,
    pub fail_flush: bool,
    pub fail_close: bool,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.iter().map(|(_, call)| call.clone()).collect()
    }

    fn record(&mut self, call: Call) {
        self.calls.push((Instant::now(), call));
    }
}

#[async_trait]
impl MetricsClient for RecordingClient {
    async fn gauge(&mut self, name: &str, value: f64, tags: &[String]) -> Result<(), ClientError> {
        self.record(Call::Gauge(name.to_string(), value, tags.to_vec()));
        Ok(())
    }

    async fn count(&mut self, name: &str, delta: f64, tags: &[String]) -> Result<(), ClientError> {
        self.record(Call::Count(name.to_string(), delta, tags.to_vec()));
        Ok(())
    }

    async fn increment(&mut self, name: &str, tags: &[String]) -> Result<(), ClientError> {
        self.record(Call::Increment(name.to_string(), tags.to_vec()));
        Ok(())
    }

    async fn decrement(&mut self, name: &str, tags: &[String]) -> Result<(), ClientError> {
        self.record(Call::Decrement(name.to_string(), tags.to_vec()));
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ClientError> {
        self.record(Call::Flush);
        if self.fail_flush {
            return Err(ClientError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ClientError> {
        self.record(Call::Close);
        if self.fail_close {
            return Err(ClientError::Closed);
        }
        Ok(())
    }
}
