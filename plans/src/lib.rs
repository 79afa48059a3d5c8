//! PensionFI Plan Creation
//!
//! Everything between the economics core and a wallet:
//! - Contract configuration and payPension call arguments
//! - Pre-flight balance and allowance checks
//! - The approve -> create transaction flow
//! - Mapping contract failures to user-facing messages
//! - Reading back plans the automation service is paying out
//!
//! No transactions are signed or sent here. Wallet and RPC access stay with
//! the caller behind `WalletSession` and plain values.

pub mod contract;
pub mod error;
pub mod failure;
pub mod flow;
pub mod preflight;
pub mod schedule;
pub mod wallet;

pub use contract::{ContractConfig, PayPensionCall, BASE_CHAIN_ID};
pub use error::{PlanError, Result};
pub use failure::{
    explorer_tx_url, format_transaction_hash, parse_contract_error, FailureKind, UserFriendlyError,
};
pub use flow::{FlowEvent, FlowState, TransactionFlow};
pub use preflight::{approval_needed, balance_sufficient, Preflight, PreflightInputs};
pub use schedule::{format_timestamp, interval_days, plans_for_beneficiary, PlanRecord};
pub use wallet::{on_expected_chain, SessionSnapshot, SharedSession, WalletSession};
