//! Token stream interpreter.
//!
//! The interpreter has a single state, "awaiting next verb". Each iteration pops a
//! verb off the front of the stream, lets the verb's handler consume its operands,
//! and continues with whatever is left. The first failure halts the run; metrics
//! already handed to the client stay sent.
//!
//! ```text
//! [verb, operands.., verb, operands.., ...] -> Verb -> handler -> remaining tokens
//! ```

// Local crates
use crate::{
    client::client::MetricsClient,
    helpers::duration::parse_duration,
    interpreter::{
        context::RunContext,
        errors::{CommandError, InterpreterError, OperandError},
        verb::Verb,
    },
};

// External crates
use tracing::instrument;

/// Outcome of a run that consumed its whole token stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands dispatched, `sleep` and `flush` included.
    pub dispatched: usize,
}

/// Drives a token stream against a metrics client, strictly in order.
#[derive(Debug)]
pub struct Interpreter<'a, C: MetricsClient + ?Sized> {
    context: &'a RunContext,
    client: &'a mut C,
}

impl<'a, C: MetricsClient + ?Sized> Interpreter<'a, C> {
    pub fn new(context: &'a RunContext, client: &'a mut C) -> Self {
        Self { context, client }
    }

    /// Consume `tokens` left to right until they run out or a command fails.
    #[instrument(
        name = "dogcmd_interpreter::run",
        target = "interpreter::interpreter",
        skip_all,
        fields(tokens = tokens.len()),
        level = "debug"
    )]
    pub async fn run(&mut self, tokens: &[String]) -> Result<RunSummary, InterpreterError> {
        let mut remaining = tokens;
        let mut summary = RunSummary::default();

        while let Some((token, rest)) = remaining.split_first() {
            let Some(verb) = Verb::lookup(token) else {
                tracing::debug!(verb = %token, "Token does not name a command, halting");
                return Err(InterpreterError::UnknownCommand(token.clone()));
            };

            remaining = self
                .dispatch(verb, rest)
                .await
                .map_err(|source| InterpreterError::CommandFailed {
                    verb: token.clone(),
                    source,
                })?;
            summary.dispatched += 1;
        }

        tracing::debug!(dispatched = summary.dispatched, "Token stream exhausted");
        Ok(summary)
    }

    /// Run one command and hand back the tokens it did not consume.
    async fn dispatch<'t>(
        &mut self,
        verb: Verb,
        rest: &'t [String],
    ) -> Result<&'t [String], CommandError> {
        let (operands, remaining) = take_operands(verb, rest)?;
        let tags = self.context.tags.as_slice();

        match (verb, operands) {
            (Verb::Gauge, [name, raw]) => {
                let value = parse_value(raw)?;
                let metric = self.context.namespace.qualify(name);
                self.client.gauge(&metric, value, tags).await?;
                tracing::info!(verb = %verb, metric = %metric, value, "gauge");
            }
            (Verb::Count, [name, raw]) => {
                let value = parse_value(raw)?;
                let metric = self.context.namespace.qualify(name);
                self.client.count(&metric, value, tags).await?;
                tracing::info!(verb = %verb, metric = %metric, value, "count");
            }
            (Verb::Incr, [name]) => {
                let metric = self.context.namespace.qualify(name);
                self.client.increment(&metric, tags).await?;
                tracing::info!(verb = %verb, metric = %metric, "incr");
            }
            (Verb::Decr, [name]) => {
                let metric = self.context.namespace.qualify(name);
                self.client.decrement(&metric, tags).await?;
                tracing::info!(verb = %verb, metric = %metric, "decr");
            }
            (Verb::Sleep, [raw]) => {
                let duration = parse_duration(raw).map_err(OperandError::from)?;
                tracing::info!(verb = %verb, duration = ?duration, "sleep");
                tokio::time::sleep(duration).await;
            }
            (Verb::Flush, []) => {
                self.client.flush().await?;
                tracing::info!(verb = %verb, "flush");
            }
            // take_operands yields exactly verb.arity() operands
            _ => unreachable!("{verb} split into {} operands", operands.len()),
        }

        Ok(remaining)
    }
}

/// Split the verb's operands off the front of the stream.
fn take_operands(verb: Verb, rest: &[String]) -> Result<(&[String], &[String]), OperandError> {
    let expected = verb.arity();
    rest.split_at_checked(expected)
        .ok_or(OperandError::Missing {
            expected,
            found: rest.len(),
        })
}

/// Parse a gauge or count value. Only finite numbers can be submitted.
fn parse_value(token: &str) -> Result<f64, OperandError> {
    let value = token
        .parse::<f64>()
        .map_err(|source| OperandError::InvalidNumber {
            token: token.to_string(),
            source,
        })?;
    if !value.is_finite() {
        return Err(OperandError::NonFinite {
            token: token.to_string(),
        });
    }
    Ok(value)
}
