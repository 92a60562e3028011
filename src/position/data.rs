//! Position data structures for margin-loan projections

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// How monthly loan interest is funded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterestFunding {
    /// Paid from outside income; invested capital compounds untouched
    FromWages,
    /// Sold out of the position; accumulated cost nets against equity
    FromEquity,
}

impl Default for InterestFunding {
    fn default() -> Self {
        InterestFunding::FromEquity
    }
}

impl InterestFunding {
    pub fn is_from_wages(&self) -> bool {
        matches!(self, InterestFunding::FromWages)
    }
}

/// A single margined position to project
///
/// The loan amount is derived from the target margin ratio at construction
/// via `loan / (loan + equity) = ratio`, which solves to
/// `loan = equity * ratio / (1 - ratio)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Investor's own capital at month 0
    pub starting_equity: f64,

    /// Fraction of the total position financed by the loan
    pub margin_ratio: f64,

    /// Loan principal, derived from equity and margin ratio
    pub loan_amount: f64,

    /// Annual simple-interest rate charged on the loan
    pub annual_interest_rate: f64,

    /// Minimum allowed equity fraction `(total - loan) / total`
    pub maintenance_requirement: f64,

    /// How monthly interest payments are funded
    #[serde(default)]
    pub interest_funding: InterestFunding,
}

impl Position {
    /// Create a position from a target margin ratio
    pub fn new(
        starting_equity: f64,
        margin_ratio: f64,
        annual_interest_rate: f64,
        maintenance_requirement: f64,
        interest_funding: InterestFunding,
    ) -> Result<Self, ProjectionError> {
        if !(margin_ratio >= 0.0 && margin_ratio < 1.0) {
            return Err(ProjectionError::invalid(
                "margin_ratio",
                margin_ratio,
                "must be in [0, 1); the loan cannot finance the whole position",
            ));
        }

        // Closed form of loan / (loan + equity) = ratio
        let loan_amount = starting_equity * margin_ratio / (1.0 - margin_ratio);

        let position = Self {
            starting_equity,
            margin_ratio,
            loan_amount,
            annual_interest_rate,
            maintenance_requirement,
            interest_funding,
        };
        position.validate()?;
        Ok(position)
    }

    /// Create a position from an already-known loan principal
    pub fn with_loan(
        starting_equity: f64,
        loan_amount: f64,
        annual_interest_rate: f64,
        maintenance_requirement: f64,
        interest_funding: InterestFunding,
    ) -> Result<Self, ProjectionError> {
        let total = loan_amount + starting_equity;
        let margin_ratio = if total > 0.0 { loan_amount / total } else { 0.0 };

        let position = Self {
            starting_equity,
            margin_ratio,
            loan_amount,
            annual_interest_rate,
            maintenance_requirement,
            interest_funding,
        };
        position.validate()?;
        Ok(position)
    }

    /// Check all scalar fields against their valid ranges
    ///
    /// Fields are public, so the engine re-validates before projecting.
    pub fn validate(&self) -> Result<(), ProjectionError> {
        if !(self.starting_equity > 0.0) || !self.starting_equity.is_finite() {
            return Err(ProjectionError::invalid(
                "starting_equity",
                self.starting_equity,
                "must be positive and finite",
            ));
        }
        if !(self.loan_amount >= 0.0) || !self.loan_amount.is_finite() {
            return Err(ProjectionError::invalid(
                "loan_amount",
                self.loan_amount,
                "must be non-negative and finite",
            ));
        }
        if !(self.annual_interest_rate >= 0.0) {
            return Err(ProjectionError::invalid(
                "annual_interest_rate",
                self.annual_interest_rate,
                "must be non-negative",
            ));
        }
        if !(self.maintenance_requirement >= 0.0 && self.maintenance_requirement < 1.0) {
            return Err(ProjectionError::invalid(
                "maintenance_requirement",
                self.maintenance_requirement,
                "must be in [0, 1)",
            ));
        }
        Ok(())
    }

    /// Monthly simple-interest payment on the loan
    pub fn monthly_interest_payment(&self) -> f64 {
        self.loan_amount * self.annual_interest_rate / 12.0
    }

    /// Total position value at month 0 (equity + financed portion)
    pub fn starting_total(&self) -> f64 {
        self.starting_equity + self.loan_amount
    }
}
