//! Core projection engine for monthly margin-loan projections

use log::debug;

use super::margin_call::{find_margin_call, ZeroTotalPolicy};
use super::series::{MonthRow, ProjectionResult};
use crate::error::ProjectionError;
use crate::position::Position;

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Number of months to project (the horizon, at least 1)
    pub projection_months: u32,

    /// Compound annual growth rate applied to the whole position
    pub annual_growth_rate: f64,

    /// Policy for months where the total position value is not positive
    pub on_zero_total: ZeroTotalPolicy,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            projection_months: 12,
            annual_growth_rate: 0.05,
            on_zero_total: ZeroTotalPolicy::ImmediateCall,
        }
    }
}

/// Main projection engine
///
/// Each call to [`project`](ProjectionEngine::project) is a full recompute
/// from the position and config alone; there is no cached state between
/// runs.
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with the given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Run the projection for a single position
    ///
    /// Produces one row per month from 0 to `projection_months - 1`, scans
    /// the series for the first maintenance violation, and carries the two
    /// display values (loan amount, monthly interest payment) along with
    /// the series.
    pub fn project(&self, position: &Position) -> Result<ProjectionResult, ProjectionError> {
        self.validate()?;
        position.validate()?;

        let months = self.config.projection_months;
        let growth_base = 1.0 + self.config.annual_growth_rate;
        let monthly_interest = position.monthly_interest_payment();

        debug!(
            "projecting {} months: equity={:.2} loan={:.2} growth={:.4}",
            months, position.starting_equity, position.loan_amount, self.config.annual_growth_rate
        );

        let mut rows = Vec::with_capacity(months as usize);
        for month in 0..months {
            rows.push(self.calculate_month(month, growth_base, monthly_interest, position));
        }

        let margin_call_month = find_margin_call(
            &rows,
            position.maintenance_requirement,
            position.loan_amount,
            self.config.on_zero_total,
        )?;

        Ok(ProjectionResult {
            rows,
            margin_call_month,
            loan_amount: position.loan_amount,
            monthly_interest_payment: monthly_interest,
        })
    }

    /// Projected values for a single month
    ///
    /// Both portions compound at the market rate. Interest is simple: the
    /// accumulated cost through month `j` is `j` payments, deducted from
    /// equity only when the position itself funds them.
    fn calculate_month(
        &self,
        month: u32,
        growth_base: f64,
        monthly_interest: f64,
        position: &Position,
    ) -> MonthRow {
        let growth_factor = growth_base.powf(month as f64 / 12.0);

        let loan_value = position.loan_amount * growth_factor;

        let mut equity_value = position.starting_equity * growth_factor;
        if !position.interest_funding.is_from_wages() {
            equity_value -= month as f64 * monthly_interest;
        }

        MonthRow { month, equity_value, loan_value }
    }

    /// Check config-level preconditions
    fn validate(&self) -> Result<(), ProjectionError> {
        if self.config.projection_months < 1 {
            return Err(ProjectionError::invalid(
                "projection_months",
                self.config.projection_months as f64,
                "must be at least 1",
            ));
        }
        // Compounding base 1 + rate below zero yields complex-valued growth
        if 1.0 + self.config.annual_growth_rate < 0.0 {
            return Err(ProjectionError::invalid(
                "annual_growth_rate",
                self.config.annual_growth_rate,
                "1 + rate must be non-negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::InterestFunding;
    use approx::assert_relative_eq;

    fn engine(months: u32, growth: f64) -> ProjectionEngine {
        ProjectionEngine::new(ProjectionConfig {
            projection_months: months,
            annual_growth_rate: growth,
            on_zero_total: ZeroTotalPolicy::ImmediateCall,
        })
    }

    #[test]
    fn test_unleveraged_growth() {
        // 100k equity, no loan, 5% growth, interest paid from wages:
        // pure compounding, zero loan series, no margin call
        let position =
            Position::with_loan(100_000.0, 0.0, 0.12, 0.3, InterestFunding::FromWages).unwrap();

        let result = engine(12, 0.05).project(&position).unwrap();

        assert_eq!(result.rows.len(), 12);
        assert_relative_eq!(result.rows[0].equity_value, 100_000.0, epsilon = 1e-9);
        assert!(result.rows.iter().all(|r| r.loan_value == 0.0));
        assert_eq!(result.margin_call_month, None);

        // Month 11 is 11/12 of a year into the compounding curve
        let expected = 100_000.0 * 1.05_f64.powf(11.0 / 12.0);
        assert_relative_eq!(result.rows[11].equity_value, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_crash_with_leverage_triggers_call() {
        // 100k equity with a 50k loan in a -50% year, interest funded from
        // the position: equity decays month over month and the 30%
        // maintenance line breaks at month 12 (fraction 0.324 at month 11,
        // 0.275 at month 12)
        let position =
            Position::with_loan(100_000.0, 50_000.0, 0.12, 0.3, InterestFunding::FromEquity)
                .unwrap();

        let year = engine(12, -0.5).project(&position).unwrap();
        assert_eq!(year.rows.len(), 12);
        assert!(year.rows[11].equity_value < year.rows[0].equity_value);
        // No call inside the first year; that says nothing beyond horizon
        assert_eq!(year.margin_call_month, None);

        let longer = engine(18, -0.5).project(&position).unwrap();
        let call_month = longer.margin_call_month.expect("expected a margin call");
        assert_eq!(call_month, 12);

        // No month before the reported one violates the requirement
        for row in &longer.rows[..call_month as usize] {
            let fraction = row.equity_fraction(50_000.0).unwrap();
            assert!(fraction >= 0.3);
        }
    }

    #[test]
    fn test_interest_drag_reduces_equity_only() {
        let funded_from_equity =
            Position::with_loan(100_000.0, 50_000.0, 0.12, 0.0, InterestFunding::FromEquity)
                .unwrap();
        let funded_from_wages =
            Position::with_loan(100_000.0, 50_000.0, 0.12, 0.0, InterestFunding::FromWages)
                .unwrap();

        let e = engine(24, 0.05);
        let drag = e.project(&funded_from_equity).unwrap();
        let no_drag = e.project(&funded_from_wages).unwrap();

        // Accumulated simple interest through month j is j * 500
        for (a, b) in drag.rows.iter().zip(&no_drag.rows) {
            assert_relative_eq!(
                b.equity_value - a.equity_value,
                a.month as f64 * 500.0,
                epsilon = 1e-6
            );
            // The financed portion is identical either way
            assert_eq!(a.loan_value, b.loan_value);
        }
    }

    #[test]
    fn test_positive_growth_with_wages_is_strictly_increasing() {
        let position =
            Position::with_loan(50_000.0, 10_000.0, 0.08, 0.25, InterestFunding::FromWages)
                .unwrap();

        let result = engine(36, 0.07).project(&position).unwrap();

        for pair in result.rows.windows(2) {
            assert!(pair[1].equity_value > pair[0].equity_value);
        }
    }

    #[test]
    fn test_projection_is_deterministic() {
        let position =
            Position::new(75_000.0, 0.4, 0.10, 0.3, InterestFunding::FromEquity).unwrap();
        let e = engine(60, 0.12);

        let first = e.project(&position).unwrap();
        let second = e.project(&position).unwrap();

        for (a, b) in first.rows.iter().zip(&second.rows) {
            assert_eq!(a.equity_value.to_bits(), b.equity_value.to_bits());
            assert_eq!(a.loan_value.to_bits(), b.loan_value.to_bits());
        }
        assert_eq!(first.margin_call_month, second.margin_call_month);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let position =
            Position::new(100_000.0, 0.2, 0.12, 0.3, InterestFunding::FromEquity).unwrap();

        assert!(engine(0, 0.05).project(&position).is_err());
        assert!(engine(12, -1.5).project(&position).is_err());
        // -100% growth is the degenerate edge of the valid range
        assert!(engine(12, -1.0).project(&position).is_ok());
    }

    #[test]
    fn test_display_values() {
        let position =
            Position::new(100_000.0, 1.0 / 3.0, 0.12, 0.3, InterestFunding::FromEquity).unwrap();

        let result = engine(12, 0.05).project(&position).unwrap();

        assert_relative_eq!(result.loan_amount, 50_000.0, epsilon = 1e-6);
        assert_relative_eq!(result.monthly_interest_payment, 500.0, epsilon = 1e-6);
        // Month 0 of the financed portion is the principal itself
        assert_relative_eq!(result.rows[0].loan_value, result.loan_amount, epsilon = 1e-9);
    }
}
