//! Numerical solvers for the hystor models.
//!
//! - [`polynomial`]: all real roots of a cubic, used by real-gas equations of state.
//! - [`bisection`]: bracketed scalar root finding, used to invert stack power curves.

pub mod bisection;
pub mod polynomial;

pub use polynomial::{RootError, cubic_real_roots};
