//! Margined position parameters and loan-amount derivation

mod data;

pub use data::{InterestFunding, Position};
