// =============================================================================
// Indicator engine errors
// =============================================================================
//
// Division by zero inside `ad` and `cci` is deliberately absent from this
// list: it surfaces as NaN / ±inf in the output column instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// `stochastic_d` was handed a %K token this engine cannot honour.
    #[error("no cached %K available: {reason}")]
    PreconditionViolation { reason: &'static str },

    #[error("column '{0}' not found in indicator table")]
    MissingColumn(String),

    #[error("invalid rolling window: window {window}, min_periods {min_periods}")]
    InvalidWindow { window: usize, min_periods: usize },

    #[error("column '{name}' has {got} rows, table has {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
