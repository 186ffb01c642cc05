//! Electrolyte circulation pumps for flow battery stack modules.
//!
//! A [`PumpAlgorithm`] decides the volumetric flow through each electrolyte
//! circuit and reports the pressure drop the pump has to overcome. Both
//! algorithms here share the start/stop policy: no flow while the module's
//! power is exactly zero.

mod fixed;
mod stoichiometric;
mod viscosity;

use hystor_core::{
    constraint::{ConstraintError, StrictlyPositive},
    units::HydraulicResistance,
};
use serde::{Deserialize, Serialize};
use uom::si::{
    area::square_meter,
    f64::{Area, DynamicViscosity, ElectricCurrent, Power, Pressure, VolumeRate},
    power::watt,
};

pub use fixed::{FixedFlowRate, FixedFlowRateConfig};
pub use stoichiometric::{StoichiometricFlowRate, StoichiometricFlowRateConfig};
pub use viscosity::{
    ElectrolyteViscosity, LinearViscosity, TabulatedViscosity, ViscosityError, ViscosityRange,
};

/// One of the two electrolyte circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Electrolyte {
    Anolyte,
    Catholyte,
}

/// Instantaneous state of the stack module a pump serves.
///
/// Positive power and current charge the electrolyte.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircuitState {
    pub power: Power,
    pub current: ElectricCurrent,
    pub soc: f64,
}

impl CircuitState {
    /// Whether the module is stopped, which stops the pumps too.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.power.get::<watt>() == 0.0
    }

    /// Whether the module is charging.
    #[must_use]
    pub fn is_charging(&self) -> bool {
        self.power.get::<watt>() > 0.0
    }
}

/// Arrangement of the stacks a pump circulates electrolyte through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackModule {
    pub serial_stacks: u32,
    pub parallel_stacks: u32,
    pub cells_per_stack: u32,
    pub cell_area: Area,
    pub hydraulic_resistance: HydraulicResistance,
}

impl StackModule {
    pub(crate) fn validate(&self) -> Result<(), ConstraintError> {
        StrictlyPositive::new(self.serial_stacks)?;
        StrictlyPositive::new(self.parallel_stacks)?;
        StrictlyPositive::new(self.cells_per_stack)?;
        StrictlyPositive::new(self.cell_area.get::<square_meter>())?;
        StrictlyPositive::new(self.hydraulic_resistance.value)?;
        Ok(())
    }

    /// Cells each electron passes through on its way across the module.
    #[must_use]
    pub fn series_cells(&self) -> u32 {
        self.cells_per_stack * self.serial_stacks
    }

    /// Total cell count.
    #[must_use]
    pub fn cells(&self) -> u32 {
        self.series_cells() * self.parallel_stacks
    }

    /// Active electrode area summed over every cell.
    #[must_use]
    pub fn active_area(&self) -> Area {
        self.cell_area * f64::from(self.cells())
    }
}

/// Flow control for the two electrolyte circuits of a stack module.
pub trait PumpAlgorithm {
    fn flow_rate(&self, electrolyte: Electrolyte, state: &CircuitState) -> VolumeRate;

    fn pressure_drop(&self, electrolyte: Electrolyte, state: &CircuitState) -> Pressure;

    /// Largest flow either circuit can be asked for.
    fn max_flow_rate(&self) -> VolumeRate;

    /// Smallest flow a running circuit is asked for.
    fn min_flow_rate(&self) -> VolumeRate;
}

/// Laminar pressure drop across a circuit, `Δp = Q·R·μ`.
#[must_use]
pub fn hydraulic_pressure_drop(
    flow: VolumeRate,
    resistance: HydraulicResistance,
    viscosity: DynamicViscosity,
) -> Pressure {
    flow * resistance * viscosity
}
