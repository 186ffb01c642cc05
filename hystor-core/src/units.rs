//! Quantity aliases for dimensions `uom` does not name.
//!
//! Values of these types are built with the constructor functions below and
//! read back in SI base units through the public `value` field.

use std::marker::PhantomData;

use uom::{
    si::{ISQ, Quantity, SI},
    typenum::{N1, N2, N3, P1, Z0},
};

/// Molar flow rate, mol/s in SI.
///
/// Used for every production, consumption, vent and permeation rate.
pub type MolarRate = Quantity<ISQ<Z0, Z0, N1, Z0, Z0, P1, Z0>, SI<f64>, f64>;

/// Hydraulic resistance of a flow circuit, 1/m³ in SI.
///
/// Relates a volumetric flow and a dynamic viscosity to a pressure drop:
/// `Δp = Q·R·μ`.
pub type HydraulicResistance = Quantity<ISQ<N3, Z0, Z0, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Pressure exerted per mole of gas in a fixed volume, Pa/mol in SI.
///
/// Multiplying by an amount of substance gives a pressure change.
pub type PressurePerAmount = Quantity<ISQ<N1, P1, N2, Z0, Z0, N1, Z0>, SI<f64>, f64>;

/// Creates a [`MolarRate`] from a value in mol/s.
#[must_use]
pub fn mole_per_second(value: f64) -> MolarRate {
    Quantity {
        dimension: PhantomData,
        units: PhantomData,
        value,
    }
}

/// Creates a [`PressurePerAmount`] from a value in Pa/mol.
#[must_use]
pub fn pascal_per_mole(value: f64) -> PressurePerAmount {
    Quantity {
        dimension: PhantomData,
        units: PhantomData,
        value,
    }
}

/// Creates a [`HydraulicResistance`] from a value in 1/m³.
#[must_use]
pub fn per_cubic_meter(value: f64) -> HydraulicResistance {
    Quantity {
        dimension: PhantomData,
        units: PhantomData,
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        amount_of_substance::mole,
        dynamic_viscosity::pascal_second,
        f64::{AmountOfSubstance, DynamicViscosity, Pressure, Time, VolumeRate},
        pressure::pascal,
        time::second,
        volume_rate::cubic_meter_per_second,
    };

    #[test]
    fn molar_rate_times_time_is_amount() {
        let rate = mole_per_second(0.5);
        let amount: AmountOfSubstance = rate * Time::new::<second>(4.0);
        assert_relative_eq!(amount.get::<mole>(), 2.0);
    }

    #[test]
    fn pressure_factor_times_amount_is_pressure() {
        let factor = pascal_per_mole(2.5e5);
        let change: Pressure = factor * AmountOfSubstance::new::<mole>(0.2);
        assert_relative_eq!(change.get::<pascal>(), 5.0e4);
    }

    #[test]
    fn flow_resistance_viscosity_is_pressure() {
        let flow = VolumeRate::new::<cubic_meter_per_second>(1e-4);
        let resistance = per_cubic_meter(2e8);
        let viscosity = DynamicViscosity::new::<pascal_second>(5e-3);
        let drop: Pressure = flow * resistance * viscosity;
        assert_relative_eq!(drop.get::<pascal>(), 100.0);
    }
}
