//! Text and JSON output for the CLI

use anyhow::Result;
use owo_colors::OwoColorize;
use pension_economics::{DepositQuote, PlanRequest, Usdc, ValidationResult};
use pension_plans::{
    format_timestamp, format_transaction_hash, ContractConfig, FlowState, PayPensionCall,
    PlanRecord, TransactionFlow, UserFriendlyError,
};
use serde::Serialize;

const RULE: &str = "═══════════════════════════════════";

#[derive(Serialize)]
pub struct QuoteReport {
    pub request: PlanRequest,
    pub quote: DepositQuote,
    pub pay_pension: Option<PayPensionCall>,
    pub rejection: Option<String>,
}

#[derive(Serialize)]
pub struct PlanReport {
    pub plan: PlanRecord,
    pub total_paid: Usdc,
    pub remaining_payout: Usdc,
    pub next_payment_at: Option<u64>,
    pub interval_days: u64,
}

#[derive(Serialize)]
struct FlowReport<'a> {
    flow: &'a TransactionFlow,
    approval_url: Option<String>,
    create_url: Option<String>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn header(title: &str) {
    println!("\n{}", title.cyan().bold());
    println!("{}", RULE.bright_black());
}

pub fn quote(report: &QuoteReport, json: bool) -> Result<()> {
    if json {
        return print_json(report);
    }

    header("📊 Pension Plan Quote");
    println!(
        "Monthly pension:   {}",
        report.request.monthly_amount.to_currency_string()
    );
    println!("Duration:          {} months", report.request.duration_months);
    println!(
        "Deposit required:  {}",
        report.quote.required_deposit.to_currency_string().green()
    );
    println!(
        "Total to receive:  {}",
        report.quote.total_payout.to_currency_string().green()
    );

    match (&report.pay_pension, &report.rejection) {
        (Some(call), _) => println!(
            "\npayPension({}, {}, {})",
            call.monthly_amount.minor(),
            call.months,
            call.total_deposit.minor()
        ),
        (None, Some(reason)) => println!("\n{} Cannot submit: {}", "⚠".yellow(), reason),
        (None, None) => {}
    }
    println!();
    Ok(())
}

pub fn validation(result: &ValidationResult, json: bool) -> Result<()> {
    if json {
        return print_json(result);
    }

    match result.violated_rule {
        None => println!("{} Inputs valid", "✓".green()),
        Some(rule) => println!("{} {}: {}", "✗".red(), rule.code(), rule),
    }
    Ok(())
}

pub fn failure(error: &UserFriendlyError, json: bool) -> Result<()> {
    if json {
        return print_json(error);
    }

    header(&format!("❌ {}", error.title));
    println!("{}", error.message);
    if let Some(action) = &error.action {
        println!("{} {}", "→".yellow(), action);
    }
    if let Some(url) = &error.action_url {
        println!("  {}", url.bright_blue());
    }
    println!();
    Ok(())
}

pub fn plan(report: &PlanReport, json: bool) -> Result<()> {
    if json {
        return print_json(report);
    }

    let plan = &report.plan;
    header(&format!("📜 Plan #{}", plan.id));
    println!("Beneficiary:        {}", plan.beneficiary);
    println!("Monthly payment:    {}", plan.payment_amount.to_currency_string());
    println!("Payments remaining: {}", plan.payments_remaining);
    println!("Total paid:         {}", report.total_paid.to_currency_string());
    println!("Still to pay:       {}", report.remaining_payout.to_currency_string());
    println!("Last payment:       {}", format_timestamp(plan.last_paid));
    println!(
        "Next payment:       {}",
        format_timestamp(report.next_payment_at.unwrap_or(0))
    );
    println!("Payment interval:   {} days", report.interval_days);
    if plan.is_completed() {
        println!("{}", "Completed: all payments received".green());
    } else {
        println!("{}", "Active".green());
    }
    println!();
    Ok(())
}

pub fn flow_step(event: &str, state: FlowState) {
    println!("  {} → {}", event.bright_white(), state.label());
}

pub fn flow_summary(flow: &TransactionFlow, config: &ContractConfig, json: bool) -> Result<()> {
    if json {
        return print_json(&FlowReport {
            flow,
            approval_url: flow.approval_tx().map(|hash| config.tx_url(hash)),
            create_url: flow.create_tx().map(|hash| config.tx_url(hash)),
        });
    }

    println!("\nFinal state: {:?}", flow.state());
    if let Some(hash) = flow.approval_tx() {
        println!(
            "Approval: {} {}",
            format_transaction_hash(hash),
            config.tx_url(hash).bright_blue()
        );
    }
    if let Some(hash) = flow.create_tx() {
        println!(
            "Plan:     {} {}",
            format_transaction_hash(hash),
            config.tx_url(hash).bright_blue()
        );
    }
    if let Some(error) = flow.failure() {
        println!("{} {}: {}", "✗".red(), error.title, error.message);
    }
    Ok(())
}
