use hystor_core::constants::GAS_CONSTANT;
use hystor_solve::cubic_real_roots;
use uom::si::{
    amount_of_substance::mole,
    f64::{AmountOfSubstance, Pressure, ThermodynamicTemperature, Volume},
    pressure::pascal,
    thermodynamic_temperature::kelvin,
    volume::cubic_meter,
};

use crate::PropertyError;

/// A real-gas model using the Van der Waals equation of state.
///
/// `(p + a·n²/V²)·(V − n·b) = n·R·T`
///
/// The attraction term `a` and co-volume `b` are per-mole constants of the
/// gas. For hydrogen the correction is small at low pressure but grows to a
/// few percent at storage pressures of several hundred bar, which is why the
/// storage tank sizes itself with this model rather than the ideal gas law.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VanDerWaals {
    /// Attraction constant `a`, Pa·m⁶/mol².
    pub a: f64,
    /// Co-volume `b`, m³/mol.
    pub b: f64,
}

impl VanDerWaals {
    /// Van der Waals constants for molecular hydrogen.
    #[must_use]
    pub fn hydrogen() -> Self {
        Self {
            a: 0.024_76,
            b: 2.661e-5,
        }
    }

    /// Computes pressure with `p = n·R·T / (V − n·b) − a·n² / V²`.
    ///
    /// Returns exactly zero pressure for a zero amount.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidInput`] if the amount is negative, the
    /// volume or temperature is not strictly positive, or the gas would occupy
    /// less than its own co-volume (`V ≤ n·b`).
    pub fn pressure(
        &self,
        amount: AmountOfSubstance,
        volume: Volume,
        temperature: ThermodynamicTemperature,
    ) -> Result<Pressure, PropertyError> {
        let n = amount.get::<mole>();
        let v = volume.get::<cubic_meter>();
        let t = temperature.get::<kelvin>();

        if n.is_nan() || n < 0.0 {
            return Err(PropertyError::InvalidInput(format!(
                "amount must be non-negative, got {n} mol"
            )));
        }
        check_positive("volume", v)?;
        check_positive("temperature", t)?;

        let free_volume = v - n * self.b;
        if free_volume <= 0.0 {
            return Err(PropertyError::InvalidInput(format!(
                "{n} mol exceeds the co-volume capacity of {v} m³"
            )));
        }

        let p = n * GAS_CONSTANT * t / free_volume - self.a * n * n / (v * v);
        Ok(Pressure::new::<pascal>(p))
    }

    /// Computes the volume holding `amount` at `pressure` and `temperature`.
    ///
    /// Multiplying the equation of state by `V²` gives the cubic
    /// `p·V³ − (p·n·b + n·R·T)·V² + a·n²·V − a·b·n³ = 0`.
    /// Every real root is found and the largest positive one is the gas-phase
    /// volume; smaller roots belong to the unstable or liquid-like branches.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidInput`] for non-positive inputs and
    /// [`PropertyError::Calculation`] if the cubic has no positive real root.
    pub fn volume(
        &self,
        amount: AmountOfSubstance,
        pressure: Pressure,
        temperature: ThermodynamicTemperature,
    ) -> Result<Volume, PropertyError> {
        let n = amount.get::<mole>();
        let p = pressure.get::<pascal>();
        let t = temperature.get::<kelvin>();

        check_positive("amount", n)?;
        check_positive("pressure", p)?;
        check_positive("temperature", t)?;

        let roots = cubic_real_roots(
            p,
            -(p * n * self.b + n * GAS_CONSTANT * t),
            self.a * n * n,
            -self.a * self.b * n.powi(3),
        )
        .map_err(|err| PropertyError::Calculation(err.to_string()))?;

        roots
            .into_iter()
            .filter(|v| *v > n * self.b)
            .reduce(f64::max)
            .map(Volume::new::<cubic_meter>)
            .ok_or_else(|| {
                PropertyError::Calculation(format!(
                    "no physical volume for {n} mol at {p} Pa and {t} K"
                ))
            })
    }
}

fn check_positive(name: &str, value: f64) -> Result<(), PropertyError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PropertyError::InvalidInput(format!(
            "{name} must be strictly positive, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{pressure::bar, thermodynamic_temperature::degree_celsius, volume::liter};

    use crate::model::IdealGas;

    fn room_temperature() -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<degree_celsius>(25.0)
    }

    #[test]
    fn volume_and_pressure_are_inverse() {
        let gas = VanDerWaals::hydrogen();
        let n = AmountOfSubstance::new::<mole>(14.9);
        let p = Pressure::new::<bar>(200.0);

        let v = gas.volume(n, p, room_temperature()).unwrap();
        let p_back = gas.pressure(n, v, room_temperature()).unwrap();

        assert_relative_eq!(p_back.get::<bar>(), 200.0, max_relative = 1e-9);
    }

    #[test]
    fn hydrogen_needs_more_volume_than_ideal_at_high_pressure() {
        let gas = VanDerWaals::hydrogen();
        let n = AmountOfSubstance::new::<mole>(10.0);
        let p = Pressure::new::<bar>(700.0);

        let real = gas.volume(n, p, room_temperature()).unwrap();
        let ideal = IdealGas::volume(n, p, room_temperature());

        // Repulsion dominates for hydrogen, so Z = pV/nRT > 1.
        let compressibility = real / ideal;
        assert!(compressibility.value > 1.4, "Z = {}", compressibility.value);
        assert!(compressibility.value < 1.8, "Z = {}", compressibility.value);
    }

    #[test]
    fn near_ideal_at_low_pressure() {
        let gas = VanDerWaals::hydrogen();
        let n = AmountOfSubstance::new::<mole>(1.0);
        let p = Pressure::new::<bar>(1.0);

        let real = gas.volume(n, p, room_temperature()).unwrap();
        let ideal = IdealGas::volume(n, p, room_temperature());

        assert_relative_eq!(real.get::<liter>(), ideal.get::<liter>(), max_relative = 2e-3);
    }

    #[test]
    fn pressure_is_zero_when_empty_and_increases_with_amount() {
        let gas = VanDerWaals::hydrogen();
        let v = Volume::new::<liter>(2.0);
        let t = room_temperature();

        let empty = gas.pressure(AmountOfSubstance::new::<mole>(0.0), v, t).unwrap();
        assert_eq!(empty.get::<pascal>(), 0.0);

        let mut previous = empty;
        for step in 1..=40_u32 {
            let n = AmountOfSubstance::new::<mole>(0.5 * f64::from(step));
            let p = gas.pressure(n, v, t).unwrap();
            assert!(p > previous, "pressure fell at {} mol", n.get::<mole>());
            previous = p;
        }
    }

    #[test]
    fn rejects_unphysical_inputs() {
        let gas = VanDerWaals::hydrogen();
        let t = room_temperature();

        assert!(matches!(
            gas.pressure(
                AmountOfSubstance::new::<mole>(-1.0),
                Volume::new::<liter>(1.0),
                t
            ),
            Err(PropertyError::InvalidInput(_))
        ));
        assert!(matches!(
            gas.pressure(
                AmountOfSubstance::new::<mole>(100.0),
                Volume::new::<liter>(1.0),
                t
            ),
            Err(PropertyError::InvalidInput(_))
        ));
        assert!(matches!(
            gas.volume(
                AmountOfSubstance::new::<mole>(1.0),
                Pressure::new::<bar>(0.0),
                t
            ),
            Err(PropertyError::InvalidInput(_))
        ));
    }
}
