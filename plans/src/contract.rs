//! Pension contract configuration and call arguments

use pension_economics::{compute_deposit, PlanBounds, PlanRequest, Usdc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PlanError, Result};
use crate::failure::explorer_tx_url;

/// Base mainnet
pub const BASE_CHAIN_ID: u64 = 8453;

/// Deployed pension contract on Base mainnet
pub const PENSION_CONTRACT_ADDRESS: &str = "0x4Fa29a8c7D5CA5Ac1882Fd95D7Be2aae0d578e5a";

/// USDC on Base mainnet
pub const USDC_ADDRESS: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";

pub const DEFAULT_EXPLORER_URL: &str = "https://basescan.org";

/// Automation pays once every 30 days unless the contract says otherwise
pub const DEFAULT_PAYMENT_INTERVAL_SECS: u64 = 30 * 86400;

/// Where the pension contract lives and what it enforces.
///
/// The optional limits mirror the contract's `minDeposit`, `minDuration`
/// and `maxDuration` views; leave them unset until they have been read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    pub chain_id: u64,
    pub pension_contract: String,
    pub usdc_token: String,
    pub explorer_url: String,
    pub min_deposit: Option<Usdc>,
    pub min_duration_months: Option<u64>,
    pub max_duration_months: Option<u64>,
    pub payment_interval_secs: u64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            chain_id: BASE_CHAIN_ID,
            pension_contract: PENSION_CONTRACT_ADDRESS.to_string(),
            usdc_token: USDC_ADDRESS.to_string(),
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            min_deposit: None,
            min_duration_months: None,
            max_duration_months: None,
            payment_interval_secs: DEFAULT_PAYMENT_INTERVAL_SECS,
        }
    }
}

impl ContractConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: ContractConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chain_id == 0 {
            return Err(PlanError::InvalidConfig("chain_id must be non-zero".to_string()));
        }
        for address in [&self.pension_contract, &self.usdc_token] {
            if !is_address(address) {
                return Err(PlanError::InvalidAddress(address.clone()));
            }
        }
        if let (Some(min), Some(max)) = (self.min_duration_months, self.max_duration_months) {
            if min > max {
                return Err(PlanError::InvalidConfig(format!(
                    "min_duration_months {} exceeds max_duration_months {}",
                    min, max
                )));
            }
        }
        if self.payment_interval_secs == 0 {
            return Err(PlanError::InvalidConfig(
                "payment_interval_secs must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tx_url(&self, tx_hash: &str) -> String {
        explorer_tx_url(&self.explorer_url, tx_hash)
    }
}

/// `0x` followed by 20 hex-encoded bytes
pub fn is_address(address: &str) -> bool {
    address
        .strip_prefix("0x")
        .and_then(|body| hex::decode(body).ok())
        .is_some_and(|bytes| bytes.len() == 20)
}

/// Arguments of the contract's `payPension(monthlyAmount, months, totalAmountSend)`.
///
/// The contract recomputes the deposit from the first two arguments and
/// rejects the call unless it equals `total_deposit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPensionCall {
    pub monthly_amount: Usdc,
    pub months: u64,
    pub total_deposit: Usdc,
}

impl PayPensionCall {
    /// Arguments for a plan inside the default product bounds
    pub fn build(request: &PlanRequest, config: &ContractConfig) -> Result<Self> {
        Self::build_with(&PlanBounds::default(), request, config)
    }

    pub fn build_with(
        bounds: &PlanBounds,
        request: &PlanRequest,
        config: &ContractConfig,
    ) -> Result<Self> {
        if request.monthly_amount.is_zero() || request.duration_months == 0 {
            return Err(PlanError::InvalidAmounts);
        }
        if let Some(rule) = bounds.check_request(request) {
            return Err(PlanError::PolicyViolation(rule));
        }

        let months = u64::from(request.duration_months);
        let min = config.min_duration_months.unwrap_or(0);
        let max = config.max_duration_months.unwrap_or(u64::MAX);
        if months < min || months > max {
            return Err(PlanError::DurationOutOfRange { months, min, max });
        }

        let total_deposit = compute_deposit(request.monthly_amount, request.duration_months);
        if total_deposit.is_zero() {
            return Err(PlanError::ZeroDeposit);
        }
        if let Some(minimum) = config.min_deposit {
            if total_deposit < minimum {
                return Err(PlanError::BelowMinDeposit {
                    deposit: total_deposit,
                    minimum,
                });
            }
        }

        log::debug!(
            "payPension({}, {}, {})",
            request.monthly_amount.minor(),
            months,
            total_deposit.minor()
        );

        Ok(Self {
            monthly_amount: request.monthly_amount,
            months,
            total_deposit,
        })
    }

    /// Allowance the USDC approval must grant the pension contract
    pub fn approve_amount(&self) -> Usdc {
        self.total_deposit
    }

    /// Same equality check the contract runs before accepting funds
    pub fn matches_contract_total(&self) -> bool {
        u32::try_from(self.months)
            .map(|months| compute_deposit(self.monthly_amount, months) == self.total_deposit)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pension_economics::ViolatedRule;

    fn request(monthly: u64, years: u32) -> PlanRequest {
        PlanRequest::from_years(Usdc::from_whole(monthly), years)
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ContractConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chain_id, BASE_CHAIN_ID);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ContractConfig::from_toml_str(
            r#"
            min_deposit = 100000000
            max_duration_months = 120
            "#,
        )
        .unwrap();
        assert_eq!(config.min_deposit, Some(Usdc::from_whole(100)));
        assert_eq!(config.max_duration_months, Some(120));
        assert_eq!(config.pension_contract, PENSION_CONTRACT_ADDRESS);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(matches!(
            ContractConfig::from_toml_str(r#"usdc_token = "0x1234""#),
            Err(PlanError::InvalidAddress(_))
        ));
        assert!(matches!(
            ContractConfig::from_toml_str("min_duration_months = 24\nmax_duration_months = 12"),
            Err(PlanError::InvalidConfig(_))
        ));
        assert!(matches!(
            ContractConfig::from_toml_str("chain_id = \"base\""),
            Err(PlanError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_is_address() {
        assert!(is_address(USDC_ADDRESS));
        assert!(!is_address("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"));
        assert!(!is_address("0xZZ3589fCD6eDb6E08f4c7C32D4f71b54bdA02913"));
        assert!(!is_address("0x"));
    }

    #[test]
    fn test_build_call() {
        let call = PayPensionCall::build(&request(1000, 1), &ContractConfig::default()).unwrap();
        assert_eq!(call.monthly_amount.minor(), 1_000_000_000);
        assert_eq!(call.months, 12);
        assert_eq!(call.total_deposit.minor(), 10_900_000_000);
        assert_eq!(call.approve_amount(), call.total_deposit);
        assert!(call.matches_contract_total());
    }

    #[test]
    fn test_build_rejects_what_contract_rejects() {
        let config = ContractConfig {
            min_deposit: Some(Usdc::from_whole(500)),
            min_duration_months: Some(12),
            max_duration_months: Some(120),
            ..ContractConfig::default()
        };

        assert!(matches!(
            PayPensionCall::build(&PlanRequest::new(Usdc::ZERO, 12), &config),
            Err(PlanError::InvalidAmounts)
        ));
        let two_year_minimum = ContractConfig {
            min_duration_months: Some(24),
            ..config.clone()
        };
        assert!(matches!(
            PayPensionCall::build(&request(100, 1), &two_year_minimum),
            Err(PlanError::DurationOutOfRange { months: 12, .. })
        ));
        assert!(matches!(
            PayPensionCall::build(&PlanRequest::new(Usdc::from_whole(9), 12), &config),
            Err(PlanError::ZeroDeposit)
        ));
        assert!(matches!(
            PayPensionCall::build(&request(10, 1), &config),
            Err(PlanError::BelowMinDeposit { .. })
        ));
    }

    #[test]
    fn test_build_applies_product_bounds() {
        let config = ContractConfig::default();
        let err = PayPensionCall::build(&request(2_000_000, 1), &config).unwrap_err();
        assert!(matches!(err, PlanError::PolicyViolation(ViolatedRule::MaxPension)));
        assert_eq!(
            err.to_string(),
            "MaxPension: Pension exceeds the maximum monthly amount"
        );

        assert!(matches!(
            PayPensionCall::build(&request(100, 40), &config),
            Err(PlanError::PolicyViolation(ViolatedRule::DurationRange))
        ));
        assert!(matches!(
            PayPensionCall::build(&PlanRequest::new(Usdc::from_whole(100), 6), &config),
            Err(PlanError::PolicyViolation(ViolatedRule::DurationRange))
        ));
        assert!(matches!(
            PayPensionCall::build(&PlanRequest::new(Usdc::from_minor(500_000), 12), &config),
            Err(PlanError::PolicyViolation(ViolatedRule::MinPension))
        ));

        // Both edges of the product range are accepted
        assert!(PayPensionCall::build(&request(1_000_000, 10), &config).is_ok());
        assert!(PayPensionCall::build(&request(1, 10), &config).is_ok());

        // Wider bounds let the contract's own limits decide
        let wide = PlanBounds {
            max_years: 40,
            ..PlanBounds::default()
        };
        let call = PayPensionCall::build_with(&wide, &request(100, 40), &config).unwrap();
        assert_eq!(call.months, 480);
    }

    #[test]
    fn test_tampered_total_does_not_match() {
        let mut call = PayPensionCall::build(&request(1000, 1), &ContractConfig::default()).unwrap();
        call.total_deposit = Usdc::from_minor(10_909_090_909);
        assert!(!call.matches_contract_total());
    }
}
