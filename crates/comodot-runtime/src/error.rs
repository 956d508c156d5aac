//! Error types for the runtime primitives

use derive_more::{Display, Error, From};

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Failure of a runtime operation that produces or moves bytes.
///
/// Only the exported C primitives collapse these into null pointers or
/// sentinels; everything behind them propagates the error.
#[derive(Display, Debug, Error, From)]
pub enum RuntimeError {
    #[display("I/O error: {_0}")]
    #[from]
    Io(std::io::Error),

    #[display("Allocation of {requested} bytes failed")]
    Alloc { requested: usize },

    #[display("Line length exceeds the addressable size")]
    LengthOverflow,

    #[display("Invalid value for {key}: {reason}")]
    Config { key: &'static str, reason: String },
}

impl RuntimeError {
    pub(crate) fn config(key: &'static str, reason: impl std::fmt::Display) -> Self {
        RuntimeError::Config {
            key,
            reason: reason.to_string(),
        }
    }
}

/// Outcome of a scalar read that did not produce a value.
#[derive(Display, Debug, Error, From)]
pub enum ReadError {
    #[display("No value available")]
    NoValue,

    #[display("Numeric token out of range")]
    OutOfRange,

    #[display("I/O error: {_0}")]
    #[from]
    Io(std::io::Error),
}

impl ReadError {
    /// Status code reported by the checked C primitives.
    pub fn status(&self) -> i32 {
        match self {
            ReadError::NoValue | ReadError::Io(_) => crate::builtins::STATUS_NO_VALUE,
            ReadError::OutOfRange => crate::builtins::STATUS_OUT_OF_RANGE,
        }
    }
}
