//! Shared building blocks for the hystor hydrogen storage models.
//!
//! - [`constraint`]: numeric invariants checked once at construction.
//! - [`constants`]: physical constants used across the models.
//! - [`units`]: `uom` quantity aliases without a named `uom` type.

pub mod constants;
pub mod constraint;
pub mod units;
