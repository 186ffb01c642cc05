use hystor_core::units::{MolarRate, mole_per_second};
use uom::si::{
    electric_current::ampere,
    electric_potential::volt,
    f64::{ElectricCurrent, ElectricPotential, Power},
    power::watt,
};

/// The electrical and species balance of a stack for one timestep.
///
/// Signs follow the load convention of the stack terminals. An electrolyzer
/// draws power and reports positive power, current and hydrogen production.
/// A fuel cell delivers power and reports negative power, current and
/// hydrogen, meaning hydrogen is consumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackOperatingPoint {
    pub power: Power,
    pub current: ElectricCurrent,
    pub voltage: ElectricPotential,
    /// Hydrogen produced (positive) or consumed (negative).
    pub hydrogen: MolarRate,
    /// Oxygen produced (positive) or consumed (negative).
    pub oxygen: MolarRate,
    /// Water produced (positive) or consumed (negative).
    pub water: MolarRate,
}

impl StackOperatingPoint {
    /// A stack carrying no current at the given terminal voltage.
    #[must_use]
    pub fn idle(voltage: ElectricPotential) -> Self {
        Self {
            power: Power::new::<watt>(0.0),
            current: ElectricCurrent::new::<ampere>(0.0),
            voltage,
            hydrogen: mole_per_second(0.0),
            oxygen: mole_per_second(0.0),
            water: mole_per_second(0.0),
        }
    }

    /// Hydrogen consumed, positive when the stack draws hydrogen.
    #[must_use]
    pub fn hydrogen_consumption(&self) -> MolarRate {
        -self.hydrogen
    }

    /// Returns true if no current flows.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.current.get::<ampere>() == 0.0
    }
}

impl Default for StackOperatingPoint {
    fn default() -> Self {
        Self::idle(ElectricPotential::new::<volt>(0.0))
    }
}
