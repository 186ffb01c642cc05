use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a fraction lies in the closed interval `[0, 1]`.
///
/// Used for the initial state of charge of storage components.
///
/// ```
/// use hystor_core::constraint::UnitInterval;
///
/// assert!(UnitInterval::new(0.0).is_ok());
/// assert!(UnitInterval::new(1.0).is_ok());
/// assert!(UnitInterval::new(1.01).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct UnitInterval;

impl UnitInterval {
    /// Constructs `Constrained<f64, UnitInterval>` if `0 <= value <= 1`.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::BelowMinimum`] if less than zero.
    /// - [`ConstraintError::AboveMaximum`] if greater than one.
    /// - [`ConstraintError::NotANumber`] for NaN.
    pub fn new(value: f64) -> Result<Constrained<f64, Self>, ConstraintError> {
        Constrained::new(value)
    }
}

impl Constraint<f64> for UnitInterval {
    fn check(value: &f64) -> Result<(), ConstraintError> {
        if value.is_nan() {
            Err(ConstraintError::NotANumber)
        } else if *value < 0.0 {
            Err(ConstraintError::BelowMinimum)
        } else if *value > 1.0 {
            Err(ConstraintError::AboveMaximum)
        } else {
            Ok(())
        }
    }
}
