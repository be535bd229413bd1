//! Error types for the lovejoy crate

use thiserror::Error;

/// Main error type for the lovejoy crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("target is not observable: every state sharing an observation with a target state must itself be a target")]
    TargetNotObservable,

    #[error("unsupported model: {0}")]
    Unsupported(UnsupportedFeature),

    #[error("value iteration did not converge within {iters} iterations (residual {residual:.3e})")]
    NonConverged { iters: u32, residual: f64 },

    #[error("computation cancelled")]
    Cancelled,

    #[error("internal error: {message}")]
    Internal { message: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid model: {message}")]
    InvalidModel { message: String },

    #[error("inner-bound solve failed")]
    InnerSolve {
        #[source]
        source: Box<Error>,
    },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Model features recognized but not handled by the grid engine
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum UnsupportedFeature {
    #[error("POMDPs with multiple initial states")]
    MultipleInitialStates,
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for an internal-invariant violation.
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }

    /// Wrap an I/O error with a description of the attempted operation.
    pub(crate) fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            operation: operation.into(),
            source,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
