use hystor_core::{
    constants::AMBIENT_PRESSURE,
    constraint::{ConstraintError, StrictlyPositive},
    units::{MolarRate, PressurePerAmount},
};
use hystor_thermo::{model::IdealGas, water::saturation_pressure};
use serde::{Deserialize, Serialize};
use uom::si::{
    f64::{Pressure, ThermodynamicTemperature, Time, Volume},
    pressure::{bar, pascal},
    volume::liter,
};

use super::controller::{IdealVariableCathode, PressureBounds, PressureController};

/// Absolute gas pressures in the cathode and anode separators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectrodePressures {
    pub cathode: Pressure,
    pub anode: Pressure,
}

impl ElectrodePressures {
    /// Both electrodes open to ambient pressure.
    #[must_use]
    pub fn ambient() -> Self {
        let ambient = Pressure::new::<pascal>(AMBIENT_PRESSURE);
        Self {
            cathode: ambient,
            anode: ambient,
        }
    }

    /// Splits each electrode pressure into gas and saturated vapour.
    ///
    /// The vapour share is capped at the electrode pressure and the gas share
    /// never goes negative, so the parts always sum to the electrode total.
    #[must_use]
    pub fn partial_pressures(&self, temperature: ThermodynamicTemperature) -> PartialPressures {
        let saturation = saturation_pressure(temperature);
        let zero = Pressure::new::<pascal>(0.0);

        let cathode_water = saturation.min(self.cathode);
        let anode_water = saturation.min(self.anode);
        PartialPressures {
            hydrogen: (self.cathode - cathode_water).max(zero),
            oxygen: (self.anode - anode_water).max(zero),
            cathode_water,
            anode_water,
        }
    }
}

impl Default for ElectrodePressures {
    fn default() -> Self {
        Self::ambient()
    }
}

/// Partial pressures of the species on either side of the membrane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartialPressures {
    /// Hydrogen in the cathode.
    pub hydrogen: Pressure,
    /// Oxygen in the anode.
    pub oxygen: Pressure,
    pub cathode_water: Pressure,
    pub anode_water: Pressure,
}

impl PartialPressures {
    /// Gas partial pressures with no water vapour on either side.
    #[must_use]
    pub fn dry(hydrogen: Pressure, oxygen: Pressure) -> Self {
        let zero = Pressure::new::<pascal>(0.0);
        Self {
            hydrogen,
            oxygen,
            cathode_water: zero,
            anode_water: zero,
        }
    }
}

/// How the anode pressure evolves between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnodePressure {
    /// The anode keeps its previous pressure and vents all oxygen produced.
    #[default]
    Held,
    /// The anode integrates its gas balance like the cathode.
    Integrated,
}

/// Separator geometry and controller bounds of a [`PressureModel`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureModelConfig {
    /// Gas volume of each separator.
    pub separator_volume: Volume,
    pub cathode: PressureBounds,
    pub anode: PressureBounds,
    pub anode_pressure: AnodePressure,
}

impl Default for PressureModelConfig {
    /// A 0.4 L separator per side, cathode up to 40 barg, anode at ambient.
    fn default() -> Self {
        Self {
            separator_volume: Volume::new::<liter>(0.4),
            cathode: PressureBounds {
                min: Pressure::new::<pascal>(AMBIENT_PRESSURE),
                max: Pressure::new::<bar>(41.0),
            },
            anode: PressureBounds::fixed(Pressure::new::<pascal>(AMBIENT_PRESSURE)),
            anode_pressure: AnodePressure::Held,
        }
    }
}

/// Inputs to one pressure update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureInput {
    pub temperature: ThermodynamicTemperature,
    /// Hydrogen reaching the cathode separator.
    pub hydrogen_production: MolarRate,
    /// Oxygen reaching the anode separator.
    pub oxygen_production: MolarRate,
    pub dt: Time,
}

/// Result of one pressure update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureOutput {
    /// Electrode pressures at the end of the step.
    pub pressures: ElectrodePressures,
    pub hydrogen_outflow: MolarRate,
    pub oxygen_outflow: MolarRate,
    /// Water vapour leaving with the hydrogen.
    pub cathode_water_outflow: MolarRate,
    /// Water vapour leaving with the oxygen.
    pub anode_water_outflow: MolarRate,
    /// Moles of vapour carried per mole of hydrogen.
    pub cathode_water_ratio: f64,
    /// Moles of vapour carried per mole of oxygen.
    pub anode_water_ratio: f64,
}

/// Gas balance of the cathode and anode separators of an electrolyzer.
///
/// Each separator is a fixed volume of ideal gas saturated with water vapour.
/// Production raises its pressure, and a [`PressureController`] decides how
/// much gas leaves through the valve. The cathode pressure integrates
/// `Δp = f·(ṅ_produced − ṅ_out)·Δt`, where the pressure factor
/// `f = R·T·(1 + x_H2O) / V` accounts for the vapour carried with each mole.
#[derive(Debug, Clone, PartialEq)]
pub struct PressureModel<C = IdealVariableCathode, A = IdealVariableCathode> {
    separator_volume: Volume,
    anode_pressure: AnodePressure,
    cathode_controller: C,
    anode_controller: A,
}

impl PressureModel {
    /// Creates a model with ideal controllers at the configured bounds.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the separator volume is not strictly
    /// positive or a pair of bounds is invalid.
    pub fn new(config: PressureModelConfig) -> Result<Self, ConstraintError> {
        let PressureModelConfig {
            separator_volume,
            cathode,
            anode,
            anode_pressure,
        } = config;

        Self::with_controllers(
            separator_volume,
            anode_pressure,
            IdealVariableCathode::new(cathode)?,
            IdealVariableCathode::new(anode)?,
        )
    }
}

impl<C: PressureController, A: PressureController> PressureModel<C, A> {
    /// Creates a model with custom valve controllers.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the separator volume is not strictly
    /// positive.
    pub fn with_controllers(
        separator_volume: Volume,
        anode_pressure: AnodePressure,
        cathode_controller: C,
        anode_controller: A,
    ) -> Result<Self, ConstraintError> {
        Ok(Self {
            separator_volume: StrictlyPositive::new(separator_volume)?.into_inner(),
            anode_pressure,
            cathode_controller,
            anode_controller,
        })
    }

    /// Advances both electrode pressures by one step.
    ///
    /// A zero `dt` leaves the pressures unchanged.
    #[must_use]
    pub fn calculate(
        &self,
        previous: &ElectrodePressures,
        input: &PressureInput,
    ) -> PressureOutput {
        let PressureInput {
            temperature,
            hydrogen_production,
            oxygen_production,
            dt,
        } = *input;
        let saturation = saturation_pressure(temperature);

        let cathode = self.balance(
            &self.cathode_controller,
            previous.cathode,
            hydrogen_production,
            saturation,
            temperature,
            dt,
        );
        let anode = match self.anode_pressure {
            AnodePressure::Held => Balance {
                pressure: previous.anode,
                outflow: oxygen_production,
                water_ratio: water_ratio(previous.anode, saturation),
            },
            AnodePressure::Integrated => self.balance(
                &self.anode_controller,
                previous.anode,
                oxygen_production,
                saturation,
                temperature,
                dt,
            ),
        };

        PressureOutput {
            pressures: ElectrodePressures {
                cathode: cathode.pressure,
                anode: anode.pressure,
            },
            hydrogen_outflow: cathode.outflow,
            oxygen_outflow: anode.outflow,
            cathode_water_outflow: cathode.outflow * cathode.water_ratio,
            anode_water_outflow: anode.outflow * anode.water_ratio,
            cathode_water_ratio: cathode.water_ratio,
            anode_water_ratio: anode.water_ratio,
        }
    }

    /// Pressure change per mole held in a separator.
    #[must_use]
    pub fn pressure_factor(
        &self,
        pressure: Pressure,
        temperature: ThermodynamicTemperature,
    ) -> PressurePerAmount {
        let ratio = water_ratio(pressure, saturation_pressure(temperature));
        IdealGas::pressure_per_mole(self.separator_volume, temperature) * (1.0 + ratio)
    }

    fn balance(
        &self,
        controller: &impl PressureController,
        pressure: Pressure,
        production: MolarRate,
        saturation: Pressure,
        temperature: ThermodynamicTemperature,
        dt: Time,
    ) -> Balance {
        let water_ratio = water_ratio(pressure, saturation);
        let factor =
            IdealGas::pressure_per_mole(self.separator_volume, temperature) * (1.0 + water_ratio);
        let outflow = controller.vent_rate(pressure, production, dt, factor);
        let next = pressure + factor * (production - outflow) * dt;

        Balance {
            pressure: next.max(Pressure::new::<pascal>(0.0)),
            outflow,
            water_ratio,
        }
    }
}

struct Balance {
    pressure: Pressure,
    outflow: MolarRate,
    water_ratio: f64,
}

/// Moles of saturated vapour per mole of dry gas, `p_sat / (p − p_sat)`.
///
/// Zero when the electrode pressure does not exceed the vapour pressure.
fn water_ratio(pressure: Pressure, saturation: Pressure) -> f64 {
    let dry = (pressure - saturation).get::<pascal>();
    if dry > 0.0 {
        saturation.get::<pascal>() / dry
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use hystor_core::units::mole_per_second;
    use uom::si::{thermodynamic_temperature::degree_celsius, time::second};

    fn input(hydrogen: f64, oxygen: f64, dt: f64) -> PressureInput {
        PressureInput {
            temperature: ThermodynamicTemperature::new::<degree_celsius>(60.0),
            hydrogen_production: mole_per_second(hydrogen),
            oxygen_production: mole_per_second(oxygen),
            dt: Time::new::<second>(dt),
        }
    }

    fn model() -> PressureModel {
        PressureModel::new(PressureModelConfig::default()).unwrap()
    }

    #[test]
    fn zero_timestep_is_idempotent() {
        let model = model();
        let start = ElectrodePressures {
            cathode: Pressure::new::<bar>(12.0),
            anode: Pressure::new::<bar>(1.0),
        };
        let step = input(0.02, 0.01, 0.0);

        let once = model.calculate(&start, &step);
        let twice = model.calculate(&once.pressures, &step);

        assert_eq!(once.pressures, start);
        assert_eq!(twice.pressures, start);
    }

    #[test]
    fn cathode_builds_pressure_below_its_limit() {
        let model = model();
        let start = ElectrodePressures::ambient();
        let step = input(0.01, 0.005, 1.0);

        let output = model.calculate(&start, &step);

        let factor = model.pressure_factor(start.cathode, step.temperature);
        let expected = start.cathode.get::<pascal>() + factor.value * 0.01;
        assert_relative_eq!(
            output.pressures.cathode.get::<pascal>(),
            expected,
            max_relative = 1e-12
        );
        assert_eq!(output.hydrogen_outflow.value, 0.0);
        assert_eq!(output.cathode_water_outflow.value, 0.0);

        // About 86 bar per mole in a 0.4 L separator at 60 °C.
        assert_relative_eq!(factor.value / 1e5, 86.5, max_relative = 0.01);
    }

    #[test]
    fn cathode_vents_at_its_limit() {
        let model = model();
        let start = ElectrodePressures {
            cathode: Pressure::new::<bar>(41.0),
            anode: Pressure::new::<bar>(1.0),
        };
        let output = model.calculate(&start, &input(0.01, 0.005, 1.0));

        assert_relative_eq!(output.pressures.cathode.get::<bar>(), 41.0, max_relative = 1e-12);
        assert_relative_eq!(output.hydrogen_outflow.value, 0.01, max_relative = 1e-9);
        assert_relative_eq!(
            output.cathode_water_outflow.value,
            0.01 * output.cathode_water_ratio,
            max_relative = 1e-9
        );
        assert!(output.cathode_water_ratio > 0.0);
    }

    #[test]
    fn held_anode_passes_oxygen_through() {
        let model = model();
        let start = ElectrodePressures::ambient();
        let output = model.calculate(&start, &input(0.01, 0.005, 10.0));

        assert_eq!(output.pressures.anode, start.anode);
        assert_relative_eq!(output.oxygen_outflow.value, 0.005, max_relative = 1e-9);
        assert!(output.anode_water_outflow.value > 0.0);
    }

    #[test]
    fn held_anode_vents_all_oxygen_inside_wide_bounds() {
        let model = PressureModel::new(PressureModelConfig {
            anode: PressureBounds {
                min: Pressure::new::<bar>(1.0),
                max: Pressure::new::<bar>(5.0),
            },
            ..PressureModelConfig::default()
        })
        .unwrap();

        let mut pressures = ElectrodePressures {
            cathode: Pressure::new::<bar>(1.0),
            anode: Pressure::new::<bar>(1.0),
        };
        let step = input(0.0, 0.001, 1.0);
        let mut vented = 0.0;
        for _ in 0..1000 {
            let output = model.calculate(&pressures, &step);
            vented += output.oxygen_outflow.value;
            pressures = output.pressures;
        }

        assert_relative_eq!(vented, 1.0, max_relative = 1e-9);
        assert_relative_eq!(pressures.anode.get::<bar>(), 1.0, max_relative = 1e-12);
    }

    #[test]
    fn integrated_anode_builds_pressure() {
        let model = PressureModel::new(PressureModelConfig {
            anode: PressureBounds {
                min: Pressure::new::<bar>(1.0),
                max: Pressure::new::<bar>(5.0),
            },
            anode_pressure: AnodePressure::Integrated,
            ..PressureModelConfig::default()
        })
        .unwrap();

        let start = ElectrodePressures::ambient();
        let output = model.calculate(&start, &input(0.0, 0.001, 1.0));

        assert!(output.pressures.anode > start.anode);
        assert_eq!(output.oxygen_outflow.value, 0.0);
    }

    #[test]
    fn partial_pressures_sum_to_the_electrode_total() {
        let temperature = ThermodynamicTemperature::new::<degree_celsius>(80.0);
        let saturation = saturation_pressure(temperature);

        let pressures = ElectrodePressures {
            cathode: Pressure::new::<bar>(30.0),
            anode: Pressure::new::<bar>(1.0),
        };
        let parts = pressures.partial_pressures(temperature);
        assert_relative_eq!(
            (parts.hydrogen + parts.cathode_water).get::<bar>(),
            30.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            (parts.oxygen + parts.anode_water).get::<bar>(),
            1.0,
            max_relative = 1e-12
        );
        assert_eq!(parts.cathode_water, saturation);

        // Below the vapour pressure the gas share clamps to zero.
        let low = ElectrodePressures {
            cathode: saturation * 0.5,
            anode: saturation * 0.5,
        };
        let parts = low.partial_pressures(temperature);
        assert_eq!(parts.hydrogen.get::<pascal>(), 0.0);
        assert_eq!(parts.oxygen.get::<pascal>(), 0.0);
        assert_eq!(parts.cathode_water, low.cathode);
    }
}
