use hystor_core::{
    constants::{FARADAY, GAS_CONSTANT, PA_PER_BAR},
    constraint::{ConstraintError, StrictlyPositive},
    units::mole_per_second,
};
use hystor_solve::bisection;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uom::si::{
    electric_current::ampere,
    electric_current_density::ampere_per_square_meter,
    electric_potential::volt,
    f64::{
        ElectricCurrent, ElectricCurrentDensity, ElectricPotential, Power, Pressure,
        ThermodynamicTemperature,
    },
    power::watt,
    pressure::pascal,
    thermodynamic_temperature::kelvin,
};

use super::{
    membrane::{Membrane, MembraneConfig},
    pressure::PartialPressures,
};
use crate::StackOperatingPoint;

/// Partial pressures in the Nernst term are floored here, in bar.
const MIN_NERNST_PRESSURE: f64 = 1e-3;

/// Errors that can occur when building or operating an [`ElectrolyzerStack`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StackError {
    #[error("invalid stack configuration: {0}")]
    Constraint(#[from] ConstraintError),

    #[error("stack current could not be solved: {0}")]
    Solver(#[from] bisection::Error),
}

/// Cell count, kinetics and membrane of a PEM electrolyzer stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectrolyzerStackConfig {
    pub cells: u32,
    pub max_current_density: ElectricCurrentDensity,
    pub exchange_current_density: ElectricCurrentDensity,
    /// Charge transfer coefficient α of the lumped activation term.
    pub charge_transfer_coefficient: f64,
    pub membrane: MembraneConfig,
}

impl Default for ElectrolyzerStackConfig {
    /// Thirty cells up to 2 A/cm² with j₀ = 0.1 mA/cm².
    fn default() -> Self {
        Self {
            cells: 30,
            max_current_density: ElectricCurrentDensity::new::<ampere_per_square_meter>(2.0e4),
            exchange_current_density: ElectricCurrentDensity::new::<ampere_per_square_meter>(1.0),
            charge_transfer_coefficient: 1.0,
            membrane: MembraneConfig::default(),
        }
    }
}

/// A PEM electrolyzer stack described by closed-form polarization.
///
/// Cell voltage is the sum of the reversible voltage (a temperature fit plus
/// the Nernst term `R·T/2F·ln(p_H2·√p_O2 / p_H2O)` with the anode water
/// vapour as `p_H2O`), the activation overvoltage
/// `R·T/(α·F)·asinh(j / 2j₀)`, and the ohmic drop across the membrane.
/// For a power setpoint the current is found by bisection on
/// `N·V(I)·I = P`.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectrolyzerStack {
    cells: u32,
    membrane: Membrane,
    max_current: f64,
    exchange_current_density: f64,
    alpha: f64,
    solver: bisection::Config,
}

impl ElectrolyzerStack {
    /// Builds a stack from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::Constraint`] if the cell count, a current
    /// density, the transfer coefficient or a membrane property is invalid.
    pub fn new(config: ElectrolyzerStackConfig) -> Result<Self, StackError> {
        let ElectrolyzerStackConfig {
            cells,
            max_current_density,
            exchange_current_density,
            charge_transfer_coefficient,
            membrane,
        } = config;

        let membrane = Membrane::new(membrane)?;
        let max_current_density = StrictlyPositive::new(max_current_density)?.into_inner();

        Ok(Self {
            cells: StrictlyPositive::new(cells)?.into_inner(),
            max_current: (max_current_density * membrane.area()).get::<ampere>(),
            exchange_current_density: StrictlyPositive::new(
                exchange_current_density.get::<ampere_per_square_meter>(),
            )?
            .into_inner(),
            alpha: StrictlyPositive::new(charge_transfer_coefficient)?.into_inner(),
            membrane,
            solver: bisection::Config::default(),
        })
    }

    #[must_use]
    pub fn cells(&self) -> u32 {
        self.cells
    }

    #[must_use]
    pub fn membrane(&self) -> &Membrane {
        &self.membrane
    }

    #[must_use]
    pub fn max_current(&self) -> ElectricCurrent {
        ElectricCurrent::new::<ampere>(self.max_current)
    }

    /// Cell voltage at `current`.
    #[must_use]
    pub fn cell_voltage(
        &self,
        current: ElectricCurrent,
        temperature: ThermodynamicTemperature,
        pressures: &PartialPressures,
    ) -> ElectricPotential {
        ElectricPotential::new::<volt>(self.cell_volts(
            current.get::<ampere>(),
            temperature.get::<kelvin>(),
            pressures,
        ))
    }

    /// Stack power drawn at the maximum current.
    #[must_use]
    pub fn max_power(
        &self,
        temperature: ThermodynamicTemperature,
        pressures: &PartialPressures,
    ) -> Power {
        Power::new::<watt>(self.stack_power(
            self.max_current,
            temperature.get::<kelvin>(),
            pressures,
        ))
    }

    /// Operating point drawing `power`.
    ///
    /// Zero or negative power leaves the stack idle at open-circuit voltage.
    /// Power beyond the maximum current saturates at the maximum current.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::Solver`] if the power balance cannot be solved,
    /// which only happens for non-finite inputs.
    pub fn calculate(
        &self,
        power: Power,
        temperature: ThermodynamicTemperature,
        pressures: &PartialPressures,
    ) -> Result<StackOperatingPoint, StackError> {
        let t = temperature.get::<kelvin>();
        let target = power.get::<watt>();
        if target <= 0.0 {
            let open_circuit = f64::from(self.cells) * self.cell_volts(0.0, t, pressures);
            return Ok(StackOperatingPoint::idle(ElectricPotential::new::<volt>(
                open_circuit,
            )));
        }

        let capability = self.stack_power(self.max_current, t, pressures);
        let current = if target >= capability {
            debug!(
                requested_w = target,
                capability_w = capability,
                "electrolyzer saturated at maximum current"
            );
            self.max_current
        } else {
            bisection::solve(
                |i| self.stack_power(i, t, pressures) - target,
                [0.0, self.max_current],
                &self.solver,
            )?
            .x
        };

        Ok(self.operating_point(current, t, pressures))
    }

    fn operating_point(
        &self,
        current: f64,
        t: f64,
        pressures: &PartialPressures,
    ) -> StackOperatingPoint {
        let cells = f64::from(self.cells);
        let voltage = cells * self.cell_volts(current, t, pressures);
        let electrons = cells * current / FARADAY;

        StackOperatingPoint {
            power: Power::new::<watt>(voltage * current),
            current: ElectricCurrent::new::<ampere>(current),
            voltage: ElectricPotential::new::<volt>(voltage),
            hydrogen: mole_per_second(electrons / 2.0),
            oxygen: mole_per_second(electrons / 4.0),
            water: mole_per_second(-electrons / 2.0),
        }
    }

    fn stack_power(&self, current: f64, t: f64, pressures: &PartialPressures) -> f64 {
        f64::from(self.cells) * self.cell_volts(current, t, pressures) * current
    }

    fn cell_volts(&self, current: f64, t: f64, pressures: &PartialPressures) -> f64 {
        let thermal = GAS_CONSTANT * t / FARADAY;
        let j = current / self.membrane.area().value;

        let reversible = 1.5184 - 1.5421e-3 * t + 9.523e-5 * t * t.ln() + 9.84e-8 * t * t;

        let in_bar = |p: Pressure| (p.get::<pascal>() / PA_PER_BAR).max(MIN_NERNST_PRESSURE);
        let p_h2 = in_bar(pressures.hydrogen);
        let p_o2 = in_bar(pressures.oxygen);
        let p_h2o = in_bar(pressures.anode_water);
        let nernst = thermal / 2.0 * (p_h2 * p_o2.sqrt() / p_h2o).ln();

        let activation =
            thermal / self.alpha * (j / (2.0 * self.exchange_current_density)).asinh();
        let ohmic = j * self
            .membrane
            .area_specific_resistance(ThermodynamicTemperature::new::<kelvin>(t));

        reversible + nernst + activation + ohmic
    }
}
