//! Deposit and payout calculations

use serde::{Deserialize, Serialize};

use crate::amount::Usdc;
use crate::constants::{
    DEPOSIT_GRANULARITY, MONTHS_PER_YEAR, ORIGINATION_FEE_PERCENTAGE, USDC_UNIT,
};

/// Smallest deposit step in minor units (100 USDC)
const DEPOSIT_STEP: u128 = DEPOSIT_GRANULARITY as u128 * USDC_UNIT as u128;

/// Fee-inclusive multiplier over 100: deposit * 110 / 100 == payout
const FEE_INCLUSIVE: u128 = 100 + ORIGINATION_FEE_PERCENTAGE as u128;

/// Largest representable deposit that still respects the step
const MAX_DEPOSIT: u64 = (u64::MAX as u128 / DEPOSIT_STEP * DEPOSIT_STEP) as u64;

/// Deposit the contract expects for `number_of_months` payments of
/// `monthly_amount`.
///
/// In whole tokens this is `floor((monthly * months * 100 / 110) / 100) * 100`.
/// Both floors collapse into a single integer division, so the result is
/// exact and always a multiple of 100 USDC. Zero inputs give a zero deposit.
pub fn compute_deposit(monthly_amount: Usdc, number_of_months: u32) -> Usdc {
    let total_to_receive = u128::from(monthly_amount.minor()) * u128::from(number_of_months);
    let deposit = total_to_receive * 100 / (FEE_INCLUSIVE * DEPOSIT_STEP) * DEPOSIT_STEP;
    u64::try_from(deposit)
        .map(Usdc::from_minor)
        .unwrap_or(Usdc::from_minor(MAX_DEPOSIT))
}

/// Total paid out over the life of a plan: the deposit plus the 10% fee.
///
/// Always derived from the truncated deposit, never from the requested
/// monthly total, so the two figures shown to the user agree. Exactly
/// `deposit * 11 / 10` up to `Usdc::MAX`; larger results saturate there,
/// which only happens far outside the product bounds.
pub fn compute_total_payout(required_deposit: Usdc) -> Usdc {
    let payout = u128::from(required_deposit.minor()) * FEE_INCLUSIVE / 100;
    u64::try_from(payout)
        .map(Usdc::from_minor)
        .unwrap_or(Usdc::MAX)
}

/// Desired pension terms before anything touches the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub monthly_amount: Usdc,
    pub duration_months: u32,
}

/// Deposit and payout derived from a `PlanRequest`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositQuote {
    pub required_deposit: Usdc,
    pub total_payout: Usdc,
}

impl PlanRequest {
    pub fn new(monthly_amount: Usdc, duration_months: u32) -> Self {
        Self {
            monthly_amount,
            duration_months,
        }
    }

    pub fn from_years(monthly_amount: Usdc, duration_years: u32) -> Self {
        Self::new(monthly_amount, duration_years.saturating_mul(MONTHS_PER_YEAR))
    }

    /// Sum of all payouts as typed by the user, before fee and truncation
    pub fn total_to_receive(&self) -> Usdc {
        self.monthly_amount
            .saturating_mul(u64::from(self.duration_months))
    }

    pub fn quote(&self) -> DepositQuote {
        let required_deposit = compute_deposit(self.monthly_amount, self.duration_months);
        let quote = DepositQuote {
            required_deposit,
            total_payout: compute_total_payout(required_deposit),
        };
        log::trace!(
            "quote: {} x {} months -> deposit {}, payout {}",
            self.monthly_amount,
            self.duration_months,
            quote.required_deposit,
            quote.total_payout
        );
        quote
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_year_of_thousand() {
        // 12,000 / 1.1 = 10,909.09 -> 10,900
        let deposit = compute_deposit(Usdc::from_whole(1000), 12);
        assert_eq!(deposit, Usdc::from_whole(10_900));
        assert_eq!(compute_total_payout(deposit), Usdc::from_whole(11_990));
    }

    #[test]
    fn test_exact_multiples_still_truncate() {
        // 11,000 / 1.1 = 10,000 exactly, already a multiple of 100
        assert_eq!(
            compute_deposit(Usdc::from_whole(11_000), 1),
            Usdc::from_whole(10_000)
        );
        // 10,999.999999 / 1.1 = 9,999.99 -> 9,900
        assert_eq!(
            compute_deposit(Usdc::from_minor(10_999_999_999), 1),
            Usdc::from_whole(9_900)
        );
    }

    #[test]
    fn test_small_plans_truncate_to_zero() {
        // 9 * 12 = 108 / 1.1 = 98.18 -> 0
        assert_eq!(compute_deposit(Usdc::from_whole(9), 12), Usdc::ZERO);
        // 10 * 12 = 120 / 1.1 = 109.09 -> 100
        assert_eq!(compute_deposit(Usdc::from_whole(10), 12), Usdc::from_whole(100));
    }

    #[test]
    fn test_zero_inputs() {
        assert_eq!(compute_deposit(Usdc::ZERO, 120), Usdc::ZERO);
        assert_eq!(compute_deposit(Usdc::from_whole(5000), 0), Usdc::ZERO);
        assert_eq!(compute_total_payout(Usdc::ZERO), Usdc::ZERO);
    }

    #[test]
    fn test_saturates_instead_of_overflowing() {
        let deposit = compute_deposit(Usdc::MAX, u32::MAX);
        assert_eq!(deposit.minor(), MAX_DEPOSIT);
        assert_eq!(u128::from(deposit.minor()) % DEPOSIT_STEP, 0);
        assert_eq!(compute_total_payout(deposit), Usdc::MAX);
        // Past u64 the exact fee-inclusive total is no longer representable
        assert!(
            u128::from(compute_total_payout(deposit).minor())
                < u128::from(deposit.minor()) * FEE_INCLUSIVE / 100
        );
    }

    #[test]
    fn test_plan_request_quote() {
        let request = PlanRequest::from_years(Usdc::from_whole(100), 10);
        assert_eq!(request.duration_months, 120);
        assert_eq!(request.total_to_receive(), Usdc::from_whole(12_000));

        let quote = request.quote();
        assert_eq!(quote.required_deposit, Usdc::from_whole(10_900));
        assert_eq!(quote.total_payout, Usdc::from_whole(11_990));
        assert!(quote.total_payout <= request.total_to_receive());
    }
}
