use hystor_core::{
    constants::{FARADAY, GAS_CONSTANT},
    constraint::{Constrained, Constraint, ConstraintError, NonNegative, StrictlyPositive},
    units::{MolarRate, mole_per_second},
};
use serde::{Deserialize, Serialize};
use tracing::trace;
use uom::si::{
    area::{square_centimeter, square_meter},
    electric_current::ampere,
    electric_current_density::ampere_per_square_meter,
    electrical_resistance::ohm,
    f64::{
        Area, ElectricCurrent, ElectricCurrentDensity, ElectricalResistance, Length,
        ThermodynamicTemperature,
    },
    length::{meter, micrometer},
    pressure::pascal,
    thermodynamic_temperature::{degree_celsius, kelvin},
};

use super::pressure::PartialPressures;

/// Lowest water content with a positive conductivity in the Springer fit.
const MIN_HUMIDIFICATION: f64 = 0.00326 / 0.005139;

/// Properties of a proton exchange membrane.
///
/// Permeabilities are in mol/(m·s·Pa) at `reference_temperature`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MembraneConfig {
    pub thickness: Length,
    /// Geometric area of one cell.
    pub area: Area,
    /// Fickian hydrogen permeability.
    pub hydrogen_permeability: f64,
    /// Fickian oxygen permeability.
    pub oxygen_permeability: f64,
    /// Permeability driving hydrogen by the cathode-to-anode pressure
    /// difference.
    pub pressure_drag: f64,
    /// Activation energy of gas permeation, J/mol.
    pub permeation_activation_energy: f64,
    pub reference_temperature: ThermodynamicTemperature,
    /// Water molecules dragged across per transferred charge.
    pub water_drag: f64,
    /// Water molecules per sulfonic acid site, λ.
    pub humidification: f64,
}

impl Default for MembraneConfig {
    /// A fully hydrated 178 µm membrane with 100 cm² cells.
    fn default() -> Self {
        Self {
            thickness: Length::new::<micrometer>(178.0),
            area: Area::new::<square_centimeter>(100.0),
            hydrogen_permeability: 3.0e-14,
            oxygen_permeability: 1.5e-14,
            pressure_drag: 1.0e-15,
            permeation_activation_energy: 21.0e3,
            reference_temperature: ThermodynamicTemperature::new::<degree_celsius>(80.0),
            water_drag: 0.27,
            humidification: 21.0,
        }
    }
}

/// Species crossing one cell membrane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossover {
    pub current_density: ElectricCurrentDensity,
    /// Hydrogen permeating from cathode to anode.
    pub hydrogen: MolarRate,
    /// Oxygen permeating from anode to cathode.
    pub oxygen: MolarRate,
    /// Water carried from anode to cathode with the protons.
    pub water: MolarRate,
}

impl Crossover {
    /// Rates for a stack of `cells` identical cells.
    #[must_use]
    pub fn scaled(self, cells: u32) -> Self {
        let n = f64::from(cells);
        Self {
            current_density: self.current_density,
            hydrogen: self.hydrogen * n,
            oxygen: self.oxygen * n,
            water: self.water * n,
        }
    }
}

/// Marker for a water content high enough to conduct, `λ > 0.00326 / 0.005139`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Conducting;

impl Constraint<f64> for Conducting {
    fn check(value: &f64) -> Result<(), ConstraintError> {
        if value.is_nan() {
            Err(ConstraintError::NotANumber)
        } else if *value <= MIN_HUMIDIFICATION {
            Err(ConstraintError::BelowMinimum)
        } else {
            Ok(())
        }
    }
}

/// Gas permeation, electro-osmotic drag and ohmic resistance of a membrane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Membrane {
    thickness: Length,
    area: Area,
    hydrogen_permeability: f64,
    oxygen_permeability: f64,
    pressure_drag: f64,
    activation_energy: f64,
    reference_temperature: ThermodynamicTemperature,
    water_drag: f64,
    humidification: Constrained<f64, Conducting>,
}

impl Membrane {
    /// Creates a membrane from its configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the thickness, area or reference
    /// temperature is not strictly positive, a transport coefficient is
    /// negative, or the humidification is too low to conduct.
    pub fn new(config: MembraneConfig) -> Result<Self, ConstraintError> {
        let MembraneConfig {
            thickness,
            area,
            hydrogen_permeability,
            oxygen_permeability,
            pressure_drag,
            permeation_activation_energy,
            reference_temperature,
            water_drag,
            humidification,
        } = config;

        StrictlyPositive::new(reference_temperature.get::<kelvin>())?;

        Ok(Self {
            thickness: StrictlyPositive::new(thickness)?.into_inner(),
            area: StrictlyPositive::new(area)?.into_inner(),
            hydrogen_permeability: NonNegative::new(hydrogen_permeability)?.into_inner(),
            oxygen_permeability: NonNegative::new(oxygen_permeability)?.into_inner(),
            pressure_drag: NonNegative::new(pressure_drag)?.into_inner(),
            activation_energy: NonNegative::new(permeation_activation_energy)?.into_inner(),
            reference_temperature,
            water_drag: NonNegative::new(water_drag)?.into_inner(),
            humidification: Constrained::new(humidification)?,
        })
    }

    #[must_use]
    pub fn area(&self) -> Area {
        self.area
    }

    /// Crossover through one cell carrying `current`.
    ///
    /// Hydrogen permeates by diffusion on its partial pressure plus a drag
    /// term on the pressure difference to the anode; a net backflow clamps to
    /// zero, as does a cathode without hydrogen. Oxygen only permeates while
    /// current flows and the cathode holds hydrogen.
    #[must_use]
    pub fn crossover(
        &self,
        current: ElectricCurrent,
        pressures: &PartialPressures,
        temperature: ThermodynamicTemperature,
    ) -> Crossover {
        let current = current.get::<ampere>().abs();
        let area = self.area.get::<square_meter>();
        let p_h2 = pressures.hydrogen.get::<pascal>();
        let p_o2 = pressures.oxygen.get::<pascal>();
        let scale = self.permeability_scale(temperature);
        let per_length = area / self.thickness.get::<meter>();

        let hydrogen = if p_h2 > 0.0 {
            let diffusion = self.hydrogen_permeability * scale * p_h2;
            let drag = self.pressure_drag * (p_h2 - p_o2);
            let total = (diffusion + drag) * per_length;
            if total < 0.0 {
                trace!(rate = total, "clamped reverse hydrogen permeation");
            }
            total.max(0.0)
        } else {
            0.0
        };

        let oxygen = if current > 0.0 && p_h2 > 0.0 {
            self.oxygen_permeability * scale * p_o2.max(0.0) * per_length
        } else {
            0.0
        };

        Crossover {
            current_density: ElectricCurrentDensity::new::<ampere_per_square_meter>(
                current / area,
            ),
            hydrogen: mole_per_second(hydrogen),
            oxygen: mole_per_second(oxygen),
            water: mole_per_second(self.water_drag * current / FARADAY),
        }
    }

    /// Ohmic resistance of one square meter of membrane, Ω·m².
    ///
    /// Conductivity follows `σ = (0.005139·λ − 0.00326)·exp(1268·(1/303 − 1/T))`
    /// in S/cm.
    #[must_use]
    pub fn area_specific_resistance(&self, temperature: ThermodynamicTemperature) -> f64 {
        let t = temperature.get::<kelvin>();
        let lambda = self.humidification.get();
        let conductivity_s_per_cm =
            (0.005_139 * lambda - 0.003_26) * (1268.0 * (1.0 / 303.0 - 1.0 / t)).exp();
        self.thickness.get::<meter>() / (100.0 * conductivity_s_per_cm)
    }

    /// Ohmic resistance of one cell.
    #[must_use]
    pub fn resistance(&self, temperature: ThermodynamicTemperature) -> ElectricalResistance {
        ElectricalResistance::new::<ohm>(
            self.area_specific_resistance(temperature) / self.area.get::<square_meter>(),
        )
    }

    /// Arrhenius factor relative to the reference temperature.
    fn permeability_scale(&self, temperature: ThermodynamicTemperature) -> f64 {
        let t = temperature.get::<kelvin>();
        let t_ref = self.reference_temperature.get::<kelvin>();
        (-self.activation_energy / GAS_CONSTANT * (1.0 / t - 1.0 / t_ref)).exp()
    }
}
