//! Plan creation error types

use pension_economics::{Usdc, ViolatedRule};
use thiserror::Error;

use crate::flow::FlowState;

/// Plan creation errors
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Monthly amount and months must be greater than zero")]
    InvalidAmounts,

    #[error("{}: {}", .0.code(), .0)]
    PolicyViolation(ViolatedRule),

    #[error("Required deposit truncates to zero")]
    ZeroDeposit,

    #[error("Plan of {months} months outside contract range {min}..={max}")]
    DurationOutOfRange { months: u64, min: u64, max: u64 },

    #[error("Deposit {deposit} below contract minimum {minimum}")]
    BelowMinDeposit { deposit: Usdc, minimum: Usdc },

    #[error("Cannot apply {event} while {state:?}")]
    InvalidTransition { state: FlowState, event: &'static str },

    #[error("Unknown flow event: {0}")]
    UnknownEvent(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;
