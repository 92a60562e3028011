//! Sweep margin ratio against growth rate and record the margin-call month
//! for every cell of the grid
//!
//! Outputs a CSV matrix for charting; supports JSON output via --json flag.
//! Accepts config via environment variables:
//!   SWEEP_MONTHS, SWEEP_EQUITY, SWEEP_INTEREST_RATE, SWEEP_MAINTENANCE,
//!   SWEEP_PAY_WITH_WAGES, SWEEP_GROWTH_STEP, SWEEP_RATIO_STEP

use margin_system::{
    InterestFunding, Position, ProjectionConfig, ProjectionEngine, ZeroTotalPolicy,
};
use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::fs::File;
use std::io::Write;
use std::time::Instant;

// Grid bounds match the original control ranges
const GROWTH_MIN: f64 = -0.95;
const GROWTH_MAX: f64 = 2.0;
const RATIO_MIN: f64 = 0.0;
const RATIO_MAX: f64 = 0.5;

/// One cell of the sweep grid
#[derive(Debug, Clone, Serialize)]
struct SweepCell {
    growth_rate: f64,
    margin_ratio: f64,
    loan_amount: f64,
    margin_call_month: Option<u32>,
    final_equity_value: f64,
    min_equity_fraction: Option<f64>,
}

#[derive(Debug, Serialize)]
struct SweepResponse {
    generated_at: String,
    projection_months: u32,
    starting_equity: f64,
    annual_interest_rate: f64,
    maintenance_requirement: f64,
    pay_with_wages: bool,
    cell_count: usize,
    cells_with_margin_call: usize,
    cells: Vec<SweepCell>,
    execution_time_ms: u64,
}

fn env_f64(name: &str, default: f64) -> f64 {
    env::var(name).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn main() {
    env_logger::init();

    let json_output = env::args().any(|arg| arg == "--json");
    let start = Instant::now();

    // Read config from environment or use defaults
    let projection_months: u32 = env::var("SWEEP_MONTHS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(60);
    let starting_equity = env_f64("SWEEP_EQUITY", 100_000.0);
    let annual_interest_rate = env_f64("SWEEP_INTEREST_RATE", 0.12);
    let maintenance_requirement = env_f64("SWEEP_MAINTENANCE", 0.3);
    let growth_step = env_f64("SWEEP_GROWTH_STEP", 0.05);
    let ratio_step = env_f64("SWEEP_RATIO_STEP", 0.05);
    let pay_with_wages = env::var("SWEEP_PAY_WITH_WAGES").map(|v| v == "1").unwrap_or(false);

    let funding = if pay_with_wages {
        InterestFunding::FromWages
    } else {
        InterestFunding::FromEquity
    };

    // Build the grid with integer stepping to avoid float drift
    let growth_steps = ((GROWTH_MAX - GROWTH_MIN) / growth_step).round() as u32;
    let ratio_steps = ((RATIO_MAX - RATIO_MIN) / ratio_step).round() as u32;

    let mut grid = Vec::new();
    for gi in 0..=growth_steps {
        for ri in 0..=ratio_steps {
            let growth_rate = GROWTH_MIN + gi as f64 * growth_step;
            let margin_ratio = RATIO_MIN + ri as f64 * ratio_step;
            grid.push((growth_rate, margin_ratio));
        }
    }

    if !json_output {
        println!(
            "Sweeping {} cells ({} growth rates x {} margin ratios, {} months each)...",
            grid.len(),
            growth_steps + 1,
            ratio_steps + 1,
            projection_months,
        );
    }

    let sweep_start = Instant::now();

    // Run projections in parallel
    let cells: Vec<SweepCell> = grid
        .par_iter()
        .map(|&(growth_rate, margin_ratio)| {
            let position = Position::new(
                starting_equity,
                margin_ratio,
                annual_interest_rate,
                maintenance_requirement,
                funding,
            )
            .expect("grid cell produced an invalid position");

            let config = ProjectionConfig {
                projection_months,
                annual_growth_rate: growth_rate,
                on_zero_total: ZeroTotalPolicy::ImmediateCall,
            };

            let engine = ProjectionEngine::new(config);
            let result = engine.project(&position).expect("projection failed");
            let summary = result.summary();

            SweepCell {
                growth_rate,
                margin_ratio,
                loan_amount: result.loan_amount,
                margin_call_month: result.margin_call_month,
                final_equity_value: summary.final_equity_value,
                min_equity_fraction: summary.min_equity_fraction,
            }
        })
        .collect();

    let cells_with_margin_call = cells.iter().filter(|c| c.margin_call_month.is_some()).count();

    if !json_output {
        println!("Sweep complete in {:?}", sweep_start.elapsed());

        // Write output
        let output_path = "sweep_output.csv";
        let mut file = File::create(output_path).expect("Failed to create output file");

        writeln!(
            file,
            "GrowthRate,MarginRatio,LoanAmount,MarginCallMonth,FinalEquity,MinEquityFraction"
        )
        .unwrap();

        for cell in &cells {
            writeln!(
                file,
                "{:.4},{:.4},{:.2},{},{:.2},{}",
                cell.growth_rate,
                cell.margin_ratio,
                cell.loan_amount,
                cell.margin_call_month.map(|m| m.to_string()).unwrap_or_default(),
                cell.final_equity_value,
                cell.min_equity_fraction
                    .map(|f| format!("{:.4}", f))
                    .unwrap_or_default(),
            )
            .unwrap();
        }

        println!("Output written to {}", output_path);

        println!("\nSweep Summary:");
        println!("  Cells: {}", cells.len());
        println!("  Cells with a margin call: {}", cells_with_margin_call);
        if let Some(earliest) = cells.iter().filter_map(|c| c.margin_call_month).min() {
            println!("  Earliest margin call: month {}", earliest);
        }
        println!("\nTotal time: {:?}", start.elapsed());
    } else {
        let response = SweepResponse {
            generated_at: chrono::Utc::now().to_rfc3339(),
            projection_months,
            starting_equity,
            annual_interest_rate,
            maintenance_requirement,
            pay_with_wages,
            cell_count: cells.len(),
            cells_with_margin_call,
            cells,
            execution_time_ms: start.elapsed().as_millis() as u64,
        };

        println!(
            "{}",
            serde_json::to_string_pretty(&response).expect("Failed to serialize response")
        );
    }
}
