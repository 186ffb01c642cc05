//! Water vapour properties used by the electrolyzer gas balances.

use hystor_core::constants::ZERO_CELSIUS;
use uom::si::{
    f64::{Pressure, ThermodynamicTemperature},
    pressure::atmosphere,
    thermodynamic_temperature::kelvin,
};

/// Coefficients of `log10(p_sat / atm)` as a cubic in temperature (°C).
const SATURATION_LOG10_COEFFS: [f64; 4] = [-2.1794, 0.029_53, -9.1837e-5, 1.4454e-7];

/// Saturation vapour pressure of water.
///
/// Evaluates `log10(p_sat) = c₀ + c₁·T + c₂·T² + c₃·T³` with `T` in °C and
/// `p_sat` in atm, a fit commonly used for PEM cell water balances and
/// accurate to about one percent between 20 °C and 100 °C.
#[must_use]
pub fn saturation_pressure(temperature: ThermodynamicTemperature) -> Pressure {
    let t_c = temperature.get::<kelvin>() - ZERO_CELSIUS;
    let exponent = SATURATION_LOG10_COEFFS
        .iter()
        .rev()
        .fold(0.0, |acc, c| acc * t_c + c);
    Pressure::new::<atmosphere>(10.0_f64.powf(exponent))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{pressure::bar, thermodynamic_temperature::degree_celsius};

    #[test]
    fn matches_steam_tables() {
        // Steam table values in bar.
        let cases = [(40.0, 0.0738), (60.0, 0.1995), (80.0, 0.4739), (100.0, 1.0142)];

        for (t_c, expected) in cases {
            let p = saturation_pressure(ThermodynamicTemperature::new::<degree_celsius>(t_c));
            assert_relative_eq!(p.get::<bar>(), expected, max_relative = 0.02);
        }
    }

    #[test]
    fn increases_with_temperature() {
        let cold = saturation_pressure(ThermodynamicTemperature::new::<degree_celsius>(50.0));
        let hot = saturation_pressure(ThermodynamicTemperature::new::<degree_celsius>(70.0));
        assert!(hot > cold);
    }
}
