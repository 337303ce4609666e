// Local crates
use crate::client::client::ClientError;
use crate::helpers::duration::DurationError;

// External crates
use std::num::ParseFloatError;

/// Problems with the tokens following a verb.
#[derive(Debug, thiserror::Error)]
pub enum OperandError {
    #[error("missing operand: expected {expected}, found {found}")]
    Missing { expected: usize, found: usize },
    #[error("invalid value {token:?}")]
    InvalidNumber {
        token: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("value {token:?} is not a finite number")]
    NonFinite { token: String },
    #[error(transparent)]
    InvalidDuration(#[from] DurationError),
}

/// Why a single command failed.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Operand(#[from] OperandError),
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Reason a run halted. Every variant is fatal; nothing already sent is undone.
#[derive(Debug, thiserror::Error)]
pub enum InterpreterError {
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),
    #[error("cmd {verb:?} failed")]
    CommandFailed {
        verb: String,
        #[source]
        source: CommandError,
    },
}

impl InterpreterError {
    /// The token that stopped the run.
    pub fn verb(&self) -> &str {
        match self {
            InterpreterError::UnknownCommand(verb) => verb,
            InterpreterError::CommandFailed { verb, .. } => verb,
        }
    }
}
