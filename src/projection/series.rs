//! Projection output structures

use serde::{Deserialize, Serialize};

/// Projected values for a single month
///
/// `loan_value` is the market value of the loan-financed portion of the
/// position, not the debt balance; the debt stays at the original principal
/// for maintenance purposes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MonthRow {
    /// Month index, starting at 0
    pub month: u32,

    /// Value of the investor's own capital
    pub equity_value: f64,

    /// Value of the loan-financed portion
    pub loan_value: f64,
}

impl MonthRow {
    /// Total market value of the position this month
    pub fn total_value(&self) -> f64 {
        self.equity_value + self.loan_value
    }

    /// Equity fraction `(total - loan) / total` against the loan principal
    ///
    /// `None` when the total is not positive; the ratio is undefined there
    /// and the caller's zero-total policy decides what happens.
    pub fn equity_fraction(&self, loan_amount: f64) -> Option<f64> {
        let total = self.total_value();
        if total > 0.0 {
            Some((total - loan_amount) / total)
        } else {
            None
        }
    }
}

/// Complete projection result for one position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Monthly projected values, one row per month of the horizon
    pub rows: Vec<MonthRow>,

    /// First month the maintenance requirement is violated, if any
    pub margin_call_month: Option<u32>,

    /// Loan principal the projection was run with
    pub loan_amount: f64,

    /// Monthly simple-interest payment on the loan
    pub monthly_interest_payment: f64,
}

impl ProjectionResult {
    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let final_equity_value = self.rows.last().map(|r| r.equity_value).unwrap_or(0.0);
        let final_loan_value = self.rows.last().map(|r| r.loan_value).unwrap_or(0.0);

        let min_equity_fraction = self
            .rows
            .iter()
            .filter_map(|r| r.equity_fraction(self.loan_amount))
            .fold(None, |acc: Option<f64>, f| {
                Some(acc.map_or(f, |m| m.min(f)))
            });

        ProjectionSummary {
            total_months: self.rows.len() as u32,
            loan_amount: self.loan_amount,
            monthly_interest_payment: self.monthly_interest_payment,
            final_equity_value,
            final_loan_value,
            final_total_value: final_equity_value + final_loan_value,
            min_equity_fraction,
            margin_call_month: self.margin_call_month,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_months: u32,
    pub loan_amount: f64,
    pub monthly_interest_payment: f64,
    pub final_equity_value: f64,
    pub final_loan_value: f64,
    pub final_total_value: f64,
    pub min_equity_fraction: Option<f64>,
    pub margin_call_month: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_equity_fraction() {
        let row = MonthRow {
            month: 0,
            equity_value: 100_000.0,
            loan_value: 50_000.0,
        };

        // (150k - 50k) / 150k = 2/3
        let fraction = row.equity_fraction(50_000.0).unwrap();
        assert_relative_eq!(fraction, 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_equity_fraction_undefined_for_wiped_out_position() {
        let row = MonthRow {
            month: 3,
            equity_value: -50_000.0,
            loan_value: 50_000.0,
        };

        assert!(row.equity_fraction(50_000.0).is_none());
    }

    #[test]
    fn test_summary_tracks_minimum_fraction() {
        let result = ProjectionResult {
            rows: vec![
                MonthRow { month: 0, equity_value: 100_000.0, loan_value: 50_000.0 },
                MonthRow { month: 1, equity_value: 40_000.0, loan_value: 50_000.0 },
                MonthRow { month: 2, equity_value: 70_000.0, loan_value: 50_000.0 },
            ],
            margin_call_month: None,
            loan_amount: 50_000.0,
            monthly_interest_payment: 500.0,
        };

        let summary = result.summary();
        assert_eq!(summary.total_months, 3);
        // Worst month is month 1: (90k - 50k) / 90k
        assert_relative_eq!(
            summary.min_equity_fraction.unwrap(),
            40_000.0 / 90_000.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(summary.final_total_value, 120_000.0, epsilon = 1e-9);
    }
}
