//! Margin System - projection engine for margin-loan leverage scenarios
//!
//! This library provides:
//! - Month-by-month projection of equity and loan-financed position values
//! - Simple-interest cost modeling with wage- or equity-funded payments
//! - Maintenance-requirement scanning with margin-call detection
//! - Multi-scenario sweep framework

pub mod error;
pub mod position;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::ProjectionError;
pub use position::{InterestFunding, Position};
pub use projection::{
    MonthRow, ProjectionConfig, ProjectionEngine, ProjectionResult, ZeroTotalPolicy,
};
pub use scenario::ScenarioRunner;
