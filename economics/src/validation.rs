//! Validation gate for plan creation
//!
//! Rules are checked in a fixed order and only the first failure is
//! reported. Values still being read from the chain are passed as `None`
//! and the rules that depend on them are skipped.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::amount::{FormAmount, Usdc};
use crate::constants::{
    MAX_MONTHLY_PENSION, MAX_YEARS, MIN_MONTHLY_PENSION, MIN_YEARS, MONTHS_PER_YEAR,
};
use crate::deposit::{compute_deposit, PlanRequest};

/// Which validation rule rejected the inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolatedRule {
    /// Monthly pension is positive but below the product minimum
    MinPension,
    /// Monthly pension above the product maximum
    MaxPension,
    /// Duration outside the allowed number of years
    DurationRange,
    /// Deposit exceeds the wallet's USDC balance
    InsufficientBalance,
    /// Deposit below the contract's minimum deposit
    BelowContractMinimum,
}

impl ViolatedRule {
    pub fn code(&self) -> &'static str {
        match self {
            ViolatedRule::MinPension => "MinPension",
            ViolatedRule::MaxPension => "MaxPension",
            ViolatedRule::DurationRange => "DurationRange",
            ViolatedRule::InsufficientBalance => "InsufficientBalance",
            ViolatedRule::BelowContractMinimum => "BelowContractMinimum",
        }
    }
}

impl fmt::Display for ViolatedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ViolatedRule::MinPension => "Pension is below the minimum monthly amount",
            ViolatedRule::MaxPension => "Pension exceeds the maximum monthly amount",
            ViolatedRule::DurationRange => "Duration is outside the allowed range of years",
            ViolatedRule::InsufficientBalance => "Insufficient balance for this plan",
            ViolatedRule::BelowContractMinimum => "Deposit is below minimum required",
        };
        f.write_str(message)
    }
}

/// Product policy limits, independent of anything the contract reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanBounds {
    pub min_monthly: Usdc,
    pub max_monthly: Usdc,
    pub min_years: u32,
    pub max_years: u32,
}

impl Default for PlanBounds {
    fn default() -> Self {
        Self {
            min_monthly: Usdc::from_minor(MIN_MONTHLY_PENSION),
            max_monthly: Usdc::from_minor(MAX_MONTHLY_PENSION),
            min_years: MIN_YEARS,
            max_years: MAX_YEARS,
        }
    }
}

impl PlanBounds {
    fn pension_rule(&self, monthly: FormAmount) -> Option<ViolatedRule> {
        // A zero amount is an empty field, not an error yet
        if monthly.is_positive() && monthly.below(self.min_monthly) {
            Some(ViolatedRule::MinPension)
        } else if monthly.exceeds(self.max_monthly) {
            Some(ViolatedRule::MaxPension)
        } else {
            None
        }
    }

    /// Pension and duration rules for a plan already expressed in months
    pub fn check_request(&self, request: &PlanRequest) -> Option<ViolatedRule> {
        self.pension_rule(FormAmount::exact(request.monthly_amount))
            .or_else(|| {
                let min = self.min_years.saturating_mul(MONTHS_PER_YEAR);
                let max = self.max_years.saturating_mul(MONTHS_PER_YEAR);
                (request.duration_months < min || request.duration_months > max)
                    .then_some(ViolatedRule::DurationRange)
            })
    }
}

/// Outcome of `validate_plan_inputs`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub ok: bool,
    pub violated_rule: Option<ViolatedRule>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            ok: true,
            violated_rule: None,
        }
    }

    pub fn violated(rule: ViolatedRule) -> Self {
        Self {
            ok: false,
            violated_rule: Some(rule),
        }
    }
}

/// Validate against the default product bounds
pub fn validate_plan_inputs(
    monthly_amount: Usdc,
    duration_years: u32,
    wallet_balance: Option<Usdc>,
    contract_min_deposit: Option<Usdc>,
) -> ValidationResult {
    validate_plan_inputs_with(
        &PlanBounds::default(),
        monthly_amount,
        duration_years,
        wallet_balance,
        contract_min_deposit,
    )
}

pub fn validate_plan_inputs_with(
    bounds: &PlanBounds,
    monthly_amount: Usdc,
    duration_years: u32,
    wallet_balance: Option<Usdc>,
    contract_min_deposit: Option<Usdc>,
) -> ValidationResult {
    run_rules(
        bounds,
        FormAmount::exact(monthly_amount),
        duration_years,
        wallet_balance,
        contract_min_deposit,
    )
}

/// Validate the calculator form's monthly text against the default bounds.
///
/// Unlike rounding the text to a `Usdc` first, digits below one minor unit
/// still count toward the pension bounds.
pub fn validate_form_inputs(
    monthly_text: &str,
    duration_years: u32,
    wallet_balance: Option<Usdc>,
    contract_min_deposit: Option<Usdc>,
) -> ValidationResult {
    run_rules(
        &PlanBounds::default(),
        FormAmount::parse(monthly_text),
        duration_years,
        wallet_balance,
        contract_min_deposit,
    )
}

fn run_rules(
    bounds: &PlanBounds,
    monthly: FormAmount,
    duration_years: u32,
    wallet_balance: Option<Usdc>,
    contract_min_deposit: Option<Usdc>,
) -> ValidationResult {
    if let Some(rule) = bounds.pension_rule(monthly) {
        return ValidationResult::violated(rule);
    }

    if duration_years < bounds.min_years || duration_years > bounds.max_years {
        return ValidationResult::violated(ViolatedRule::DurationRange);
    }

    let deposit = compute_deposit(
        monthly.amount,
        duration_years.saturating_mul(MONTHS_PER_YEAR),
    );

    if let Some(balance) = wallet_balance {
        if deposit > balance {
            return ValidationResult::violated(ViolatedRule::InsufficientBalance);
        }
    }

    if let Some(minimum) = contract_min_deposit {
        if deposit < minimum {
            return ValidationResult::violated(ViolatedRule::BelowContractMinimum);
        }
    }

    ValidationResult::valid()
}
