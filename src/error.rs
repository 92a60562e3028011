//! Error types surfaced by the projection core

use thiserror::Error;

/// Errors from building positions or running projections
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// A scalar input is outside its valid range
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Total position value was non-positive during the maintenance scan
    /// (only raised under `ZeroTotalPolicy::Fail`)
    #[error("total position value is not positive at month {month}")]
    ZeroTotalValue { month: u32 },
}

impl ProjectionError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        ProjectionError::InvalidParameter { name, value, reason }
    }
}
