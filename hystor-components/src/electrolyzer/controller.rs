use hystor_core::{
    constraint::{ConstraintError, NonNegative},
    units::{MolarRate, PressurePerAmount, mole_per_second},
};
use serde::{Deserialize, Serialize};
use tracing::trace;
use uom::si::{
    f64::{Pressure, Time},
    pressure::bar,
    time::second,
};

/// Decides how much gas leaves an electrode volume through its valve.
///
/// Implementations see the pressure at the start of the step, the gas
/// production rate, the step length, and the pressure change per mole held
/// in the volume. They return the outflow rate over the step.
pub trait PressureController {
    fn vent_rate(
        &self,
        pressure: Pressure,
        production: MolarRate,
        dt: Time,
        pressure_factor: PressurePerAmount,
    ) -> MolarRate;
}

/// Absolute pressure limits of one electrode volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureBounds {
    pub min: Pressure,
    pub max: Pressure,
}

impl PressureBounds {
    /// Bounds fixed at a single pressure.
    #[must_use]
    pub fn fixed(pressure: Pressure) -> Self {
        Self {
            min: pressure,
            max: pressure,
        }
    }
}

/// A valve that opens perfectly to keep pressure inside its bounds.
///
/// Below the upper bound the valve stays closed and pressure rises with
/// production. Once production would push pressure past the upper bound, the
/// valve releases exactly the excess. The valve never releases so much that
/// pressure would drop below the lower bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdealVariableCathode {
    bounds: PressureBounds,
}

impl IdealVariableCathode {
    /// Creates a controller holding pressure inside `bounds`.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::Negative`] if a bound is negative and
    /// [`ConstraintError::AboveMaximum`] if `min` exceeds `max`.
    pub fn new(bounds: PressureBounds) -> Result<Self, ConstraintError> {
        NonNegative::new(bounds.min)?;
        NonNegative::new(bounds.max)?;
        if bounds.min > bounds.max {
            return Err(ConstraintError::AboveMaximum);
        }
        Ok(Self { bounds })
    }
}

impl PressureController for IdealVariableCathode {
    fn vent_rate(
        &self,
        pressure: Pressure,
        production: MolarRate,
        dt: Time,
        pressure_factor: PressurePerAmount,
    ) -> MolarRate {
        let dt = dt.get::<second>();
        let factor = pressure_factor.value;
        if dt <= 0.0 || factor <= 0.0 {
            return mole_per_second(0.0);
        }

        // Outflow that lands the pressure exactly on a given target.
        let to_reach = |target: Pressure| {
            production.value - (target - pressure).value / (factor * dt)
        };

        let vent = to_reach(self.bounds.max).clamp(0.0, to_reach(self.bounds.min).max(0.0));
        if vent > 0.0 {
            trace!(
                vent_mol_s = vent,
                pressure_bar = pressure.get::<bar>(),
                "venting to hold pressure"
            );
        }
        mole_per_second(vent)
    }
}
