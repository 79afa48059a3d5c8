//! Plans as read back from the contract's `getPlan` view

use chrono::DateTime;
use pension_economics::Usdc;
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: u64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub id: u64,
    pub beneficiary: String,
    pub payment_amount: Usdc,
    pub payments_remaining: u64,
    /// Unix seconds of the last payout, 0 before the first one
    pub last_paid: u64,
    pub active: bool,
}

impl PlanRecord {
    pub fn is_completed(&self) -> bool {
        !self.active
    }

    pub fn payments_made(&self, total_payments: u64) -> u64 {
        total_payments.saturating_sub(self.payments_remaining)
    }

    pub fn total_paid(&self, total_payments: u64) -> Usdc {
        self.payment_amount
            .saturating_mul(self.payments_made(total_payments))
    }

    pub fn remaining_payout(&self) -> Usdc {
        self.payment_amount.saturating_mul(self.payments_remaining)
    }

    pub fn next_payment_at(&self, interval_secs: u64) -> Option<u64> {
        if self.last_paid == 0 || !self.active {
            return None;
        }
        Some(self.last_paid.saturating_add(interval_secs))
    }
}

/// Whole days between automated payments
pub fn interval_days(interval_secs: u64) -> u64 {
    interval_secs / SECONDS_PER_DAY
}

/// `"N/A"` for 0, otherwise UTC date and time
pub fn format_timestamp(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .filter(|&secs| secs > 0)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|date| date.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Plans paying out to `account`, compared case-insensitively; id 0 is the
/// contract's empty slot and is skipped
pub fn plans_for_beneficiary<'a>(records: &'a [PlanRecord], account: &str) -> Vec<&'a PlanRecord> {
    records
        .iter()
        .filter(|record| record.id > 0 && record.beneficiary.eq_ignore_ascii_case(account))
        .collect()
}
