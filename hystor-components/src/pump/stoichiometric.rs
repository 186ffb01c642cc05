use hystor_core::{
    constants::FARADAY,
    constraint::{ConstraintError, StrictlyPositive, UnitInterval},
    units::mole_per_second,
};
use serde::{Deserialize, Serialize};
use tracing::trace;
use uom::si::{
    electric_current::ampere,
    f64::{MolarConcentration, Pressure, VolumeRate},
    molar_concentration::mole_per_cubic_meter,
    volume_rate::{cubic_meter_per_second, liter_per_minute},
};

use super::{
    CircuitState, Electrolyte, ElectrolyteViscosity, PumpAlgorithm, StackModule,
    hydraulic_pressure_drop,
};

/// Parameters of a [`StoichiometricFlowRate`] pump.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoichiometricFlowRateConfig {
    /// Ratio of supplied to consumed active species.
    pub stoichiometry: f64,
    /// Concentration of the active species in each electrolyte.
    pub concentration: MolarConcentration,
    /// Floor on the fraction of species available for reaction.
    pub min_available_fraction: f64,
    pub min_flow: VolumeRate,
    pub max_flow: VolumeRate,
}

impl Default for StoichiometricFlowRateConfig {
    fn default() -> Self {
        Self {
            stoichiometry: 5.0,
            concentration: MolarConcentration::new::<mole_per_cubic_meter>(1_600.0),
            min_available_fraction: 0.05,
            min_flow: VolumeRate::new::<liter_per_minute>(1.0),
            max_flow: VolumeRate::new::<liter_per_minute>(200.0),
        }
    }
}

/// Supplies a fixed multiple of the species the reaction consumes.
///
/// The species available for reaction is the charged fraction while
/// discharging and the discharged fraction while charging, so the flow rises
/// toward either end of the charge range. It is bounded by the configured
/// minimum and maximum while running and zero while the module is stopped.
#[derive(Debug, Clone)]
pub struct StoichiometricFlowRate<V> {
    module: StackModule,
    viscosity: V,
    stoichiometry: f64,
    concentration: MolarConcentration,
    min_available_fraction: f64,
    min_flow: VolumeRate,
    max_flow: VolumeRate,
}

impl<V: ElectrolyteViscosity> StoichiometricFlowRate<V> {
    /// Validates the module and the pump parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] for a degenerate module, non-positive
    /// stoichiometry, concentration or flow bound, an available-fraction
    /// floor outside `(0, 1]`, or a minimum flow above the maximum.
    pub fn new(
        module: StackModule,
        config: StoichiometricFlowRateConfig,
        viscosity: V,
    ) -> Result<Self, ConstraintError> {
        module.validate()?;
        StrictlyPositive::new(config.stoichiometry)?;
        StrictlyPositive::new(config.concentration.get::<mole_per_cubic_meter>())?;
        StrictlyPositive::new(config.min_available_fraction)?;
        UnitInterval::new(config.min_available_fraction)?;
        StrictlyPositive::new(config.min_flow.get::<cubic_meter_per_second>())?;
        StrictlyPositive::new(config.max_flow.get::<cubic_meter_per_second>())?;
        if config.min_flow > config.max_flow {
            return Err(ConstraintError::AboveMaximum);
        }

        Ok(Self {
            module,
            viscosity,
            stoichiometry: config.stoichiometry,
            concentration: config.concentration,
            min_available_fraction: config.min_available_fraction,
            min_flow: config.min_flow,
            max_flow: config.max_flow,
        })
    }

    fn available_fraction(&self, state: &CircuitState) -> f64 {
        let soc = if state.soc.is_nan() { 0.0 } else { state.soc };
        let available = if state.is_charging() { 1.0 - soc } else { soc };
        available.max(self.min_available_fraction)
    }
}

impl<V: ElectrolyteViscosity> PumpAlgorithm for StoichiometricFlowRate<V> {
    fn flow_rate(&self, _electrolyte: Electrolyte, state: &CircuitState) -> VolumeRate {
        if state.is_stopped() {
            return VolumeRate::new::<cubic_meter_per_second>(0.0);
        }

        let current = state.current.get::<ampere>().abs();
        let reacted = mole_per_second(current * f64::from(self.module.series_cells()) / FARADAY);
        let demand: VolumeRate = reacted / self.concentration;
        let flow = demand * (self.stoichiometry / self.available_fraction(state));

        let clamped = flow.max(self.min_flow).min(self.max_flow);
        if clamped != flow {
            trace!(
                requested_m3_s = flow.get::<cubic_meter_per_second>(),
                "stoichiometric flow clamped"
            );
        }
        clamped
    }

    fn pressure_drop(&self, electrolyte: Electrolyte, state: &CircuitState) -> Pressure {
        hydraulic_pressure_drop(
            self.flow_rate(electrolyte, state),
            self.module.hydraulic_resistance,
            self.viscosity.viscosity(electrolyte, state.soc),
        )
    }

    fn max_flow_rate(&self) -> VolumeRate {
        self.max_flow
    }

    fn min_flow_rate(&self) -> VolumeRate {
        self.min_flow
    }
}
