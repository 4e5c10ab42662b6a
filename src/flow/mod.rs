// src/flow/mod.rs
pub mod navigator;
pub mod guided;

pub use navigator::{DecisionNavigator, Transition};
pub use guided::{choose_branch, generic_shape, BranchOutcome, GENERIC_PIVOT};
