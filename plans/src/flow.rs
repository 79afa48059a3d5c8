//! Approve -> create transaction flow
//!
//! Creating a plan takes two wallet transactions: a USDC approval for the
//! deposit, then the `payPension` call. Wallet and receipt notifications are
//! fed in as `FlowEvent`s; anything that does not fit the current state is
//! refused and the state is left as it was.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{PlanError, Result};
use crate::failure::{parse_contract_error, UserFriendlyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowState {
    /// Nothing in flight
    Idle,
    /// Approval sent, waiting for its receipt
    Approving,
    /// Approval confirmed, waiting for the allowance read to catch up
    Approved,
    /// payPension sent, waiting for its receipt
    Creating,
    /// Plan created
    Success,
    /// Last transaction failed
    Error,
}

impl FlowState {
    pub fn label(&self) -> &'static str {
        match self {
            FlowState::Idle => "Ready to start",
            FlowState::Approving => "Step 1/2: Approving USDC...",
            FlowState::Approved => "USDC Approved",
            FlowState::Creating => "Step 2/2: Creating pension plan...",
            FlowState::Success => "Plan created successfully!",
            FlowState::Error => "Transaction failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// Wallet returned the approval transaction hash
    ApprovalSubmitted(String),
    /// Approval receipt confirmed
    ApprovalConfirmed,
    /// Fresh allowance read after approval
    AllowanceRefreshed { sufficient: bool },
    /// Wallet returned the payPension transaction hash
    CreateSubmitted(String),
    /// payPension receipt confirmed
    CreateConfirmed,
    /// Wallet or contract error message
    Failed(String),
    Reset,
}

impl FlowEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FlowEvent::ApprovalSubmitted(_) => "approval-submitted",
            FlowEvent::ApprovalConfirmed => "approval-confirmed",
            FlowEvent::AllowanceRefreshed { sufficient: true } => "allowance-ok",
            FlowEvent::AllowanceRefreshed { sufficient: false } => "allowance-low",
            FlowEvent::CreateSubmitted(_) => "create-submitted",
            FlowEvent::CreateConfirmed => "create-confirmed",
            FlowEvent::Failed(_) => "failed",
            FlowEvent::Reset => "reset",
        }
    }
}

/// Parses `name` or `name:argument`, using the names from `FlowEvent::name`
impl FromStr for FlowEvent {
    type Err = PlanError;

    fn from_str(text: &str) -> Result<Self> {
        let (name, argument) = match text.split_once(':') {
            Some((name, argument)) => (name, Some(argument.to_string())),
            None => (text, None),
        };
        let event = match (name, argument) {
            ("approval-submitted", Some(hash)) => FlowEvent::ApprovalSubmitted(hash),
            ("approval-confirmed", None) => FlowEvent::ApprovalConfirmed,
            ("allowance-ok", None) => FlowEvent::AllowanceRefreshed { sufficient: true },
            ("allowance-low", None) => FlowEvent::AllowanceRefreshed { sufficient: false },
            ("create-submitted", Some(hash)) => FlowEvent::CreateSubmitted(hash),
            ("create-confirmed", None) => FlowEvent::CreateConfirmed,
            ("failed", message) => FlowEvent::Failed(message.unwrap_or_default()),
            ("reset", None) => FlowEvent::Reset,
            _ => return Err(PlanError::UnknownEvent(text.to_string())),
        };
        Ok(event)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionFlow {
    state: FlowState,
    approval_tx: Option<String>,
    create_tx: Option<String>,
    failure: Option<UserFriendlyError>,
}

impl TransactionFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Idle,
            approval_tx: None,
            create_tx: None,
            failure: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn approval_tx(&self) -> Option<&str> {
        self.approval_tx.as_deref()
    }

    pub fn create_tx(&self) -> Option<&str> {
        self.create_tx.as_deref()
    }

    pub fn failure(&self) -> Option<&UserFriendlyError> {
        self.failure.as_ref()
    }

    /// A wallet transaction is waiting on its receipt
    pub fn is_busy(&self) -> bool {
        matches!(self.state, FlowState::Approving | FlowState::Creating)
    }

    pub fn apply(&mut self, event: FlowEvent) -> Result<FlowState> {
        use FlowState::*;

        let from = self.state;
        let name = event.name();
        let next = match (from, event) {
            (Idle | Error | Success, FlowEvent::ApprovalSubmitted(hash)) => {
                self.approval_tx = Some(hash);
                self.create_tx = None;
                self.failure = None;
                Approving
            }
            (Approving, FlowEvent::ApprovalConfirmed) => Approved,
            (Approved, FlowEvent::AllowanceRefreshed { sufficient }) => {
                if sufficient {
                    Idle
                } else {
                    Approved
                }
            }
            (Idle | Approved | Error, FlowEvent::CreateSubmitted(hash)) => {
                self.create_tx = Some(hash);
                self.failure = None;
                Creating
            }
            (Creating, FlowEvent::CreateConfirmed) => Success,
            (Idle | Approving | Approved | Creating | Error, FlowEvent::Failed(message)) => {
                self.failure = Some(parse_contract_error(&message));
                Error
            }
            (_, FlowEvent::Reset) => {
                *self = Self::new();
                Idle
            }
            (state, _) => {
                log::warn!("Ignoring {} while {:?}", name, state);
                return Err(PlanError::InvalidTransition { state, event: name });
            }
        };

        self.state = next;
        log::debug!("flow {:?} --{}--> {:?}", from, name, next);
        Ok(next)
    }
}

impl Default for TransactionFlow {
    fn default() -> Self {
        Self::new()
    }
}
