//! PensionFI CLI - quote, validate and inspect pension plans

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pension_economics::{validate_plan_inputs, PlanRequest, Usdc};
use pension_plans::{
    interval_days, parse_contract_error, ContractConfig, FlowEvent, PayPensionCall, PlanRecord,
    TransactionFlow,
};
use std::path::{Path, PathBuf};

mod render;

use render::{PlanReport, QuoteReport};

#[derive(Parser)]
#[command(name = "pensionfi")]
#[command(about = "PensionFI plan calculator and contract helper", version)]
#[command(long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PENSIONFI_GIT_HASH"), ")"))]
struct Cli {
    /// Path to contract configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Required deposit and total payout for a plan
    Quote {
        /// Monthly pension in USDC
        #[arg(short, long)]
        monthly: Usdc,

        /// Plan duration in years
        #[arg(short, long, default_value = "1")]
        years: u32,
    },

    /// Check plan inputs the way the app does before enabling submission
    Validate {
        /// Monthly pension in USDC
        #[arg(short, long)]
        monthly: Usdc,

        /// Plan duration in years
        #[arg(short, long, default_value = "1")]
        years: u32,

        /// Wallet USDC balance, skipped when absent
        #[arg(long)]
        balance: Option<Usdc>,

        /// Contract minimum deposit, defaults to the configured value
        #[arg(long)]
        min_deposit: Option<Usdc>,
    },

    /// Explain a wallet or contract error message
    Explain {
        /// Raw error text
        message: String,
    },

    /// Payout progress for a plan read from the contract
    Plan {
        #[arg(long)]
        id: u64,

        #[arg(long)]
        beneficiary: String,

        /// Monthly payment in USDC
        #[arg(long)]
        payment: Usdc,

        /// Total number of payments the plan was created with
        #[arg(long)]
        payments: u64,

        #[arg(long)]
        remaining: u64,

        /// Unix time of the last payout, 0 if none yet
        #[arg(long, default_value = "0")]
        last_paid: u64,

        /// Plan has been completed or deactivated
        #[arg(long)]
        inactive: bool,
    },

    /// Replay transaction flow events (e.g. approval-submitted:0xabc)
    Flow {
        #[arg(required = true)]
        events: Vec<String>,
    },
}

fn load_config(path: Option<&Path>) -> ContractConfig {
    let Some(path) = path else {
        return ContractConfig::default();
    };
    match ContractConfig::load(path) {
        Ok(config) => {
            log::debug!("Loaded contract config from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("Could not load config {}: {}", path.display(), e);
            eprintln!("Warning: Could not load config: {}", e);
            ContractConfig::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Quote { monthly, years } => {
            let request = PlanRequest::from_years(monthly, years);
            let call = PayPensionCall::build(&request, &config);
            let report = QuoteReport {
                request,
                quote: request.quote(),
                rejection: call.as_ref().err().map(ToString::to_string),
                pay_pension: call.ok(),
            };
            render::quote(&report, cli.json)?;
        }

        Commands::Validate {
            monthly,
            years,
            balance,
            min_deposit,
        } => {
            let result = validate_plan_inputs(
                monthly,
                years,
                balance,
                min_deposit.or(config.min_deposit),
            );
            render::validation(&result, cli.json)?;
            if !result.ok {
                std::process::exit(1);
            }
        }

        Commands::Explain { message } => {
            render::failure(&parse_contract_error(&message), cli.json)?;
        }

        Commands::Plan {
            id,
            beneficiary,
            payment,
            payments,
            remaining,
            last_paid,
            inactive,
        } => {
            let plan = PlanRecord {
                id,
                beneficiary,
                payment_amount: payment,
                payments_remaining: remaining,
                last_paid,
                active: !inactive,
            };
            let report = PlanReport {
                total_paid: plan.total_paid(payments),
                remaining_payout: plan.remaining_payout(),
                next_payment_at: plan.next_payment_at(config.payment_interval_secs),
                interval_days: interval_days(config.payment_interval_secs),
                plan,
            };
            render::plan(&report, cli.json)?;
        }

        Commands::Flow { events } => {
            let mut flow = TransactionFlow::new();
            for text in &events {
                let event: FlowEvent = text.parse()?;
                let state = flow
                    .apply(event)
                    .with_context(|| format!("flow stopped at '{}'", text))?;
                if !cli.json {
                    render::flow_step(text, state);
                }
            }
            render::flow_summary(&flow, &config, cli.json)?;
        }
    }

    Ok(())
}
