//! Amount parsing errors

use thiserror::Error;

/// Errors from strict USDC amount parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount cannot be empty")]
    Empty,

    #[error("Amount cannot be negative: {0}")]
    Negative(String),

    #[error("Invalid amount: {0}")]
    Invalid(String),

    #[error("Amount has more than 6 decimal places: {0}")]
    TooManyDecimals(String),

    #[error("Amount is too large: {0}")]
    Overflow(String),
}

pub type Result<T> = std::result::Result<T, AmountError>;
