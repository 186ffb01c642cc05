use hystor_core::constraint::{ConstraintError, StrictlyPositive};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uom::si::{
    f64::{Pressure, Velocity, VolumeRate},
    velocity::meter_per_second,
    volume_rate::cubic_meter_per_second,
};

use super::{
    CircuitState, Electrolyte, ElectrolyteViscosity, PumpAlgorithm, StackModule,
    hydraulic_pressure_drop,
};

/// Area-specific flow for each circuit.
///
/// Volume per unit time per unit of active electrode area, which has the
/// dimension of a velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedFlowRateConfig {
    pub anolyte: Velocity,
    pub catholyte: Velocity,
}

impl Default for FixedFlowRateConfig {
    /// 1 mL/min per cm² of electrode on both sides.
    fn default() -> Self {
        let specific = Velocity::new::<meter_per_second>(1.0e-6 / 60.0 / 1.0e-4);
        Self {
            anolyte: specific,
            catholyte: specific,
        }
    }
}

/// Runs each circuit at a constant flow while the module is active.
#[derive(Debug, Clone)]
pub struct FixedFlowRate<V> {
    module: StackModule,
    viscosity: V,
    anolyte: VolumeRate,
    catholyte: VolumeRate,
}

impl<V: ElectrolyteViscosity> FixedFlowRate<V> {
    /// Scales the area-specific flows to the whole module.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the module geometry is degenerate or
    /// either specific flow is not strictly positive.
    pub fn new(
        module: StackModule,
        config: FixedFlowRateConfig,
        viscosity: V,
    ) -> Result<Self, ConstraintError> {
        module.validate()?;
        StrictlyPositive::new(config.anolyte.get::<meter_per_second>())?;
        StrictlyPositive::new(config.catholyte.get::<meter_per_second>())?;

        let area = module.active_area();
        let anolyte = config.anolyte * area;
        let catholyte = config.catholyte * area;

        debug!(
            anolyte_m3_s = anolyte.get::<cubic_meter_per_second>(),
            catholyte_m3_s = catholyte.get::<cubic_meter_per_second>(),
            "fixed pump flow"
        );

        Ok(Self {
            module,
            viscosity,
            anolyte,
            catholyte,
        })
    }

    fn running_flow(&self, electrolyte: Electrolyte) -> VolumeRate {
        match electrolyte {
            Electrolyte::Anolyte => self.anolyte,
            Electrolyte::Catholyte => self.catholyte,
        }
    }
}

impl<V: ElectrolyteViscosity> PumpAlgorithm for FixedFlowRate<V> {
    fn flow_rate(&self, electrolyte: Electrolyte, state: &CircuitState) -> VolumeRate {
        if state.is_stopped() {
            return VolumeRate::new::<cubic_meter_per_second>(0.0);
        }
        self.running_flow(electrolyte)
    }

    fn pressure_drop(&self, electrolyte: Electrolyte, state: &CircuitState) -> Pressure {
        hydraulic_pressure_drop(
            self.flow_rate(electrolyte, state),
            self.module.hydraulic_resistance,
            self.viscosity.viscosity(electrolyte, state.soc),
        )
    }

    fn max_flow_rate(&self) -> VolumeRate {
        self.anolyte.max(self.catholyte)
    }

    fn min_flow_rate(&self) -> VolumeRate {
        self.anolyte.min(self.catholyte)
    }
}
