//! Pre-flight checks before the approve and create buttons are enabled

use pension_economics::{Usdc, ValidationResult};
use serde::{Deserialize, Serialize};

/// Approval is needed until an allowance read shows enough
pub fn approval_needed(deposit: Usdc, allowance: Option<Usdc>) -> bool {
    allowance.map_or(true, |allowance| allowance < deposit)
}

/// The balance is known and covers a non-zero deposit
pub fn balance_sufficient(deposit: Usdc, balance: Option<Usdc>) -> bool {
    !deposit.is_zero() && balance.is_some_and(|balance| balance >= deposit)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreflightInputs {
    pub connected: bool,
    pub on_expected_chain: bool,
    pub validation: ValidationResult,
    pub deposit: Usdc,
    pub balance: Option<Usdc>,
    pub allowance: Option<Usdc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preflight {
    pub balance_sufficient: bool,
    pub approval_needed: bool,
    pub can_approve: bool,
    pub can_create: bool,
}

impl Preflight {
    pub fn evaluate(inputs: &PreflightInputs) -> Self {
        let balance_sufficient = balance_sufficient(inputs.deposit, inputs.balance);
        let approval_needed = approval_needed(inputs.deposit, inputs.allowance);
        let ready = inputs.connected
            && inputs.on_expected_chain
            && inputs.validation.ok
            && balance_sufficient;

        Self {
            balance_sufficient,
            approval_needed,
            can_approve: ready && approval_needed,
            can_create: ready && !approval_needed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pension_economics::ViolatedRule;

    fn inputs() -> PreflightInputs {
        PreflightInputs {
            connected: true,
            on_expected_chain: true,
            validation: ValidationResult::valid(),
            deposit: Usdc::from_whole(10_900),
            balance: Some(Usdc::from_whole(20_000)),
            allowance: None,
        }
    }

    #[test]
    fn test_checks() {
        let deposit = Usdc::from_whole(100);
        assert!(approval_needed(deposit, None));
        assert!(approval_needed(deposit, Some(Usdc::from_whole(99))));
        assert!(!approval_needed(deposit, Some(deposit)));

        assert!(!balance_sufficient(deposit, None));
        assert!(!balance_sufficient(Usdc::ZERO, Some(Usdc::from_whole(5))));
        assert!(balance_sufficient(deposit, Some(deposit)));
    }

    #[test]
    fn test_approve_then_create() {
        let check = Preflight::evaluate(&inputs());
        assert!(check.can_approve);
        assert!(!check.can_create);

        let check = Preflight::evaluate(&PreflightInputs {
            allowance: Some(Usdc::from_whole(10_900)),
            ..inputs()
        });
        assert!(!check.can_approve);
        assert!(check.can_create);
    }

    #[test]
    fn test_blocked() {
        let blocked = [
            PreflightInputs { connected: false, ..inputs() },
            PreflightInputs { on_expected_chain: false, ..inputs() },
            PreflightInputs {
                validation: ValidationResult::violated(ViolatedRule::MaxPension),
                ..inputs()
            },
            PreflightInputs { balance: Some(Usdc::from_whole(1)), ..inputs() },
        ];
        for case in blocked {
            let check = Preflight::evaluate(&case);
            assert!(!check.can_approve && !check.can_create, "{:?}", case);
        }
    }
}
