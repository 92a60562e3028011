//! Maintenance-requirement scan over a projected series

use serde::{Deserialize, Serialize};

use super::series::MonthRow;
use crate::error::ProjectionError;

/// What to do when the total position value is not positive during the scan
///
/// The equity fraction `(total - loan) / total` is undefined at zero total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZeroTotalPolicy {
    /// Treat the month as an immediate margin call; a wiped-out position
    /// cannot satisfy any maintenance requirement
    ImmediateCall,
    /// Surface `ProjectionError::ZeroTotalValue` instead
    Fail,
}

impl Default for ZeroTotalPolicy {
    fn default() -> Self {
        ZeroTotalPolicy::ImmediateCall
    }
}

/// Find the first month the equity fraction falls below the maintenance
/// requirement
///
/// Months are inspected in increasing order and the first violation wins;
/// later, possibly deeper, violations are not reported. Returns `None` when
/// no month in the series violates the requirement, which says nothing
/// about months beyond the projected horizon.
pub fn find_margin_call(
    rows: &[MonthRow],
    maintenance_requirement: f64,
    loan_amount: f64,
    on_zero_total: ZeroTotalPolicy,
) -> Result<Option<u32>, ProjectionError> {
    for row in rows {
        match row.equity_fraction(loan_amount) {
            Some(fraction) => {
                if fraction < maintenance_requirement {
                    return Ok(Some(row.month));
                }
            }
            None => match on_zero_total {
                ZeroTotalPolicy::ImmediateCall => return Ok(Some(row.month)),
                ZeroTotalPolicy::Fail => {
                    return Err(ProjectionError::ZeroTotalValue { month: row.month })
                }
            },
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(month: u32, equity_value: f64, loan_value: f64) -> MonthRow {
        MonthRow { month, equity_value, loan_value }
    }

    #[test]
    fn test_no_call_without_loan() {
        let rows: Vec<MonthRow> = (0..12).map(|m| row(m, 100_000.0, 0.0)).collect();

        let result = find_margin_call(&rows, 0.3, 0.0, ZeroTotalPolicy::ImmediateCall).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_first_violation_wins() {
        // Loan principal 50k. Equity fraction dips below 0.3 from month 2 on;
        // the scan must report month 2, not any later month.
        let rows = vec![
            row(0, 100_000.0, 50_000.0), // fraction 0.667
            row(1, 40_000.0, 45_000.0),  // fraction 0.412
            row(2, 15_000.0, 40_000.0),  // fraction 0.091
            row(3, 5_000.0, 38_000.0),   // fraction deeper still
        ];

        let result = find_margin_call(&rows, 0.3, 50_000.0, ZeroTotalPolicy::ImmediateCall)
            .unwrap();
        assert_eq!(result, Some(2));

        // No earlier month violates
        let earlier = find_margin_call(&rows[..2], 0.3, 50_000.0, ZeroTotalPolicy::ImmediateCall)
            .unwrap();
        assert_eq!(earlier, None);
    }

    #[test]
    fn test_zero_total_immediate_call() {
        let rows = vec![
            row(0, 100_000.0, 50_000.0),
            row(1, -50_000.0, 50_000.0), // total exactly 0
        ];

        let result = find_margin_call(&rows, 0.3, 50_000.0, ZeroTotalPolicy::ImmediateCall)
            .unwrap();
        assert_eq!(result, Some(1));
    }

    #[test]
    fn test_zero_total_fail_policy() {
        let rows = vec![
            row(0, 100_000.0, 50_000.0),
            row(1, -60_000.0, 50_000.0), // total negative
        ];

        let err = find_margin_call(&rows, 0.3, 50_000.0, ZeroTotalPolicy::Fail).unwrap_err();
        assert_eq!(err, ProjectionError::ZeroTotalValue { month: 1 });
    }

    #[test]
    fn test_exact_boundary_is_not_a_call() {
        // fraction == maintenance must not trigger (strict less-than)
        let rows = vec![row(0, 30_000.0, 70_000.0)];

        let result = find_margin_call(&rows, 0.3, 70_000.0, ZeroTotalPolicy::ImmediateCall)
            .unwrap();
        assert_eq!(result, None);
    }
}
