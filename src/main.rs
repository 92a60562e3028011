//! Margin System CLI
//!
//! Projects a margined position month by month and flags the first month
//! the maintenance requirement is violated

use anyhow::Context;
use clap::Parser;
use margin_system::{
    InterestFunding, Position, ProjectionConfig, ProjectionEngine, ZeroTotalPolicy,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "margin_system",
    version,
    about = "Project a margin-loan position and check for margin calls"
)]
struct Args {
    /// Starting equity in dollars
    #[arg(long, default_value_t = 100_000.0)]
    equity: f64,

    /// Target margin ratio: loan / (loan + equity)
    #[arg(long, default_value_t = 0.0)]
    margin_ratio: f64,

    /// Annualized rate of return on the position
    #[arg(long, default_value_t = 0.05)]
    growth_rate: f64,

    /// Annual interest rate charged on the loan
    #[arg(long, default_value_t = 0.12)]
    interest_rate: f64,

    /// Maintenance requirement (minimum equity fraction)
    #[arg(long, default_value_t = 0.3)]
    maintenance: f64,

    /// Total months to project
    #[arg(long, default_value_t = 12)]
    months: u32,

    /// Pay loan interest from outside income instead of selling equity
    #[arg(long)]
    pay_with_wages: bool,

    /// Fail on a wiped-out position instead of reporting a margin call
    #[arg(long)]
    strict_zero_total: bool,

    /// Output path for the projected series CSV
    #[arg(long, default_value = "projection_output.csv")]
    output: String,
}

/// CSV row of stacked chart data
#[derive(Debug, Serialize)]
struct ChartRow {
    month: u32,
    equity_value: f64,
    loan_value: f64,
    total_value: f64,
    equity_fraction: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Margin System v0.1.0");
    println!("====================\n");

    let funding = if args.pay_with_wages {
        InterestFunding::FromWages
    } else {
        InterestFunding::FromEquity
    };

    let position = Position::new(
        args.equity,
        args.margin_ratio,
        args.interest_rate,
        args.maintenance,
        funding,
    )?;

    println!("Position:");
    println!("  Starting Equity: ${:.2}", position.starting_equity);
    println!("  Margin Ratio: {:.2}", position.margin_ratio);
    println!("  Loan Amount: ${:.2}", position.loan_amount);
    println!("  Interest Rate: {:.2}%", position.annual_interest_rate * 100.0);
    println!("  Maintenance Requirement: {:.2}", position.maintenance_requirement);
    println!();

    let config = ProjectionConfig {
        projection_months: args.months,
        annual_growth_rate: args.growth_rate,
        on_zero_total: if args.strict_zero_total {
            ZeroTotalPolicy::Fail
        } else {
            ZeroTotalPolicy::ImmediateCall
        },
    };

    let engine = ProjectionEngine::new(config);
    let result = engine.project(&position)?;

    // Print header
    println!("Projection Results ({} months):", result.rows.len());
    println!(
        "{:>5} {:>14} {:>14} {:>14} {:>10}",
        "Month", "Equity", "Loan Value", "Total", "EquityFrac"
    );
    println!("{}", "-".repeat(62));

    // Print first 24 months to console
    for row in result.rows.iter().take(24) {
        let fraction = row
            .equity_fraction(result.loan_amount)
            .map(|f| format!("{:.4}", f))
            .unwrap_or_else(|| "n/a".to_string());
        let marker = if result.margin_call_month == Some(row.month) {
            "  <- margin call"
        } else {
            ""
        };
        println!(
            "{:>5} {:>14.2} {:>14.2} {:>14.2} {:>10}{}",
            row.month,
            row.equity_value,
            row.loan_value,
            row.total_value(),
            fraction,
            marker,
        );
    }

    if result.rows.len() > 24 {
        println!("... ({} more months)", result.rows.len() - 24);
    }

    // Write the full series as chart data
    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("unable to create {}", args.output))?;
    for row in &result.rows {
        writer.serialize(ChartRow {
            month: row.month,
            equity_value: row.equity_value,
            loan_value: row.loan_value,
            total_value: row.total_value(),
            equity_fraction: row.equity_fraction(result.loan_amount),
        })?;
    }
    writer.flush()?;
    println!("\nFull series written to: {}", args.output);

    println!("\nThe margin amount is {:.2}.", result.loan_amount);
    println!(
        "The monthly interest payment is {:.2}.",
        result.monthly_interest_payment
    );

    match result.margin_call_month {
        Some(month) => println!("\nMargin call at month {}", month),
        None => println!("\nNo margin call within {} months", result.rows.len()),
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Final Equity: ${:.2}", summary.final_equity_value);
    println!("  Final Loan Value: ${:.2}", summary.final_loan_value);
    println!("  Final Total: ${:.2}", summary.final_total_value);
    if let Some(min_fraction) = summary.min_equity_fraction {
        println!("  Lowest Equity Fraction: {:.4}", min_fraction);
    }

    Ok(())
}
