//! PensionFI Economics Module
//!
//! Implements the plan economics shared by the web client and the pension
//! contract:
//! - Deposit calculation (10% origination fee, truncation to whole hundreds)
//! - Total payout derived from the truncated deposit
//! - Validation gate that runs before a plan creation is submitted
//!
//! Everything here is pure integer arithmetic over USDC minor units. The
//! contract repeats the same computation and rejects any deposit that does
//! not match it exactly.

pub mod amount;
pub mod deposit;
pub mod error;
pub mod validation;

pub use amount::{FormAmount, Usdc};
pub use deposit::{compute_deposit, compute_total_payout, DepositQuote, PlanRequest};
pub use error::{AmountError, Result};
pub use validation::{
    validate_form_inputs, validate_plan_inputs, validate_plan_inputs_with, PlanBounds,
    ValidationResult, ViolatedRule,
};

/// Economic constants
pub mod constants {
    /// USDC decimal places
    pub const USDC_DECIMALS: u32 = 6;

    /// USDC minor units per whole token
    pub const USDC_UNIT: u64 = 1_000_000;

    /// Origination fee percentage, charged on top of the deposit (10%)
    pub const ORIGINATION_FEE_PERCENTAGE: u64 = 10;

    /// Deposits are truncated to whole multiples of this many USDC
    pub const DEPOSIT_GRANULARITY: u64 = 100;

    /// Payments per year of plan duration
    pub const MONTHS_PER_YEAR: u32 = 12;

    /// Smallest monthly pension the product accepts ($1)
    pub const MIN_MONTHLY_PENSION: u64 = USDC_UNIT;

    /// Largest monthly pension the product accepts ($1M)
    pub const MAX_MONTHLY_PENSION: u64 = 1_000_000 * USDC_UNIT;

    /// Shortest plan in years
    pub const MIN_YEARS: u32 = 1;

    /// Longest plan in years
    pub const MAX_YEARS: u32 = 10;
}
