//! Contract and wallet failures mapped to user-facing messages

use serde::{Deserialize, Serialize};

/// Category of a failed transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    Cancelled,
    InsufficientBalance,
    ApprovalRequired,
    InvalidAmounts,
    IncorrectTotal,
    DepositTooLow,
    InvalidDuration,
    TransferFailed,
    Network,
    InsufficientGas,
    WrongNetwork,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFriendlyError {
    pub kind: FailureKind,
    pub title: String,
    pub message: String,
    pub action: Option<String>,
    pub action_url: Option<String>,
}

const BRIDGE_URL: &str = "https://www.base.org/bridge";

/// Longest raw error message shown to the user as-is
const MAX_RAW_MESSAGE_LEN: usize = 100;

struct FailureRule {
    needles: &'static [&'static str],
    kind: FailureKind,
    title: &'static str,
    message: &'static str,
    action: &'static str,
    action_url: Option<&'static str>,
}

// Checked in order; the first rule with a matching needle wins.
const RULES: &[FailureRule] = &[
    FailureRule {
        needles: &["user rejected", "User denied", "rejected"],
        kind: FailureKind::Cancelled,
        title: "Transaction Cancelled",
        message: "You cancelled the transaction in your wallet.",
        action: "Try again when ready",
        action_url: None,
    },
    FailureRule {
        needles: &["insufficient funds", "insufficient balance", "exceeds balance"],
        kind: FailureKind::InsufficientBalance,
        title: "Insufficient USDC Balance",
        message: "You do not have enough USDC in your wallet to complete this transaction.",
        action: "Get USDC on Base",
        action_url: Some(BRIDGE_URL),
    },
    FailureRule {
        needles: &[
            "insufficient allowance",
            "ERC20: transfer amount exceeds allowance",
        ],
        kind: FailureKind::ApprovalRequired,
        title: "Approval Required",
        message: "You need to approve USDC spending before creating a pension plan.",
        action: "Click \"Approve USDC\" first",
        action_url: None,
    },
    FailureRule {
        needles: &["invalid amounts"],
        kind: FailureKind::InvalidAmounts,
        title: "Invalid Amounts",
        message: "Monthly amount and months must be greater than zero.",
        action: "Check your input values",
        action_url: None,
    },
    FailureRule {
        needles: &["invalid totalPay"],
        kind: FailureKind::IncorrectTotal,
        title: "Incorrect Total Amount",
        message: "The calculated total does not match the required deposit amount.",
        action: "Verify your amounts",
        action_url: None,
    },
    FailureRule {
        needles: &["below minDeposit"],
        kind: FailureKind::DepositTooLow,
        title: "Deposit Too Low",
        message: "Your deposit is below the minimum required amount for a pension plan.",
        action: "Increase monthly amount or duration",
        action_url: None,
    },
    FailureRule {
        needles: &["duration < min", "duration > max"],
        kind: FailureKind::InvalidDuration,
        title: "Invalid Duration",
        message: "The total duration of your plan is outside the allowed range (1-10 years).",
        action: "Adjust the duration",
        action_url: None,
    },
    FailureRule {
        needles: &["transferFrom failed"],
        kind: FailureKind::TransferFailed,
        title: "Transfer Failed",
        message: "Unable to transfer USDC from your wallet to the contract.",
        action: "Check your balance and approval",
        action_url: None,
    },
    FailureRule {
        needles: &["network", "timeout", "fetch"],
        kind: FailureKind::Network,
        title: "Network Error",
        message: "Unable to connect to the blockchain network. Please check your internet connection.",
        action: "Try again",
        action_url: None,
    },
    FailureRule {
        needles: &["gas", "out of gas", "intrinsic gas too low"],
        kind: FailureKind::InsufficientGas,
        title: "Insufficient Gas",
        message: "You do not have enough ETH to pay for transaction gas fees on Base network.",
        action: "Add ETH to your wallet",
        action_url: Some(BRIDGE_URL),
    },
    FailureRule {
        needles: &["chain"],
        kind: FailureKind::WrongNetwork,
        title: "Wrong Network",
        message: "Please switch to Base network in your wallet.",
        action: "Switch to Base",
        action_url: None,
    },
];

/// Map a raw wallet or revert message to something a user can act on.
///
/// Matching is case-sensitive substring search over a fixed, ordered table.
pub fn parse_contract_error(raw: &str) -> UserFriendlyError {
    if let Some(rule) = RULES
        .iter()
        .find(|rule| rule.needles.iter().any(|needle| raw.contains(needle)))
    {
        return UserFriendlyError {
            kind: rule.kind,
            title: rule.title.to_string(),
            message: rule.message.to_string(),
            action: Some(rule.action.to_string()),
            action_url: rule.action_url.map(str::to_string),
        };
    }

    let message = if raw.chars().count() > MAX_RAW_MESSAGE_LEN {
        "An unexpected error occurred. Please try again or contact support.".to_string()
    } else if raw.is_empty() {
        "An unexpected error occurred.".to_string()
    } else {
        raw.to_string()
    };

    UserFriendlyError {
        kind: FailureKind::Unknown,
        title: "Transaction Failed".to_string(),
        message,
        action: Some("Try again".to_string()),
        action_url: None,
    }
}

/// Shorten a transaction hash for display: `0x1234...abcd`.
///
/// Any non-empty hash gets the ellipsis; short ones repeat characters.
pub fn format_transaction_hash(hash: &str) -> String {
    if hash.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = hash.chars().collect();
    let head: String = chars[..chars.len().min(6)].iter().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}

pub fn explorer_tx_url(explorer_url: &str, tx_hash: &str) -> String {
    format!("{}/tx/{}", explorer_url.trim_end_matches('/'), tx_hash)
}
