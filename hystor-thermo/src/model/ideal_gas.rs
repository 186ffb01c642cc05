use hystor_core::{
    constants::GAS_CONSTANT,
    units::{PressurePerAmount, pascal_per_mole},
};
use uom::si::{
    amount_of_substance::mole,
    f64::{AmountOfSubstance, Pressure, ThermodynamicTemperature, Volume},
    pressure::pascal,
    thermodynamic_temperature::kelvin,
    volume::cubic_meter,
};

/// Ideal gas law on a molar basis, `p·V = n·R·T`.
///
/// Used for low-pressure gas volumes such as an electrolyzer's gas
/// separators, and as the reference the real-gas model is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IdealGas;

impl IdealGas {
    /// Computes pressure with `p = n·R·T / V`.
    #[must_use]
    pub fn pressure(
        amount: AmountOfSubstance,
        volume: Volume,
        temperature: ThermodynamicTemperature,
    ) -> Pressure {
        IdealGas::pressure_per_mole(volume, temperature) * amount
    }

    /// Computes volume with `V = n·R·T / p`.
    #[must_use]
    pub fn volume(
        amount: AmountOfSubstance,
        pressure: Pressure,
        temperature: ThermodynamicTemperature,
    ) -> Volume {
        Volume::new::<cubic_meter>(
            amount.get::<mole>() * GAS_CONSTANT * temperature.get::<kelvin>()
                / pressure.get::<pascal>(),
        )
    }

    /// Pressure change per mole added to a fixed volume, `R·T / V`.
    #[must_use]
    pub fn pressure_per_mole(
        volume: Volume,
        temperature: ThermodynamicTemperature,
    ) -> PressurePerAmount {
        pascal_per_mole(GAS_CONSTANT * temperature.get::<kelvin>() / volume.get::<cubic_meter>())
    }
}
