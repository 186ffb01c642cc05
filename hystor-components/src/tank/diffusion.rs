use std::f64::consts::PI;

use hystor_core::constants::GAS_CONSTANT;
use serde::{Deserialize, Serialize};

/// Arrhenius model for hydrogen diffusion through the vessel wall.
///
/// `D(T) = D₀·exp(−Eₐ / (R·T))`
///
/// The coefficient is an effective value for the whole wall, relating the gas
/// concentration inside the vessel directly to the molar flux through it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallDiffusion {
    /// Pre-exponential factor `D₀`, m²/s.
    pub pre_exponential: f64,
    /// Activation energy `Eₐ`, J/mol.
    pub activation_energy: f64,
}

impl Default for WallDiffusion {
    /// About 7e-13 m²/s at room temperature.
    fn default() -> Self {
        Self {
            pre_exponential: 1.0e-6,
            activation_energy: 35.0e3,
        }
    }
}

impl WallDiffusion {
    /// Diffusion coefficient in m²/s at a temperature in K.
    #[must_use]
    pub fn coefficient(&self, temperature: f64) -> f64 {
        self.pre_exponential * (-self.activation_energy / (GAS_CONSTANT * temperature)).exp()
    }
}

/// Inner radius and surface area of a sphere holding `volume`, SI units.
pub(super) fn sphere_geometry(volume: f64) -> (f64, f64) {
    let radius = (3.0 * volume / (4.0 * PI)).cbrt();
    (radius, 4.0 * PI * radius * radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn coefficient_grows_with_temperature() {
        let wall = WallDiffusion::default();
        let cold = wall.coefficient(273.15);
        let warm = wall.coefficient(298.15);
        let hot = wall.coefficient(353.15);

        assert!(cold < warm && warm < hot);
        assert_relative_eq!(warm, 7.3e-13, max_relative = 0.05);
    }

    #[test]
    fn unit_sphere() {
        let (radius, area) = sphere_geometry(4.0 / 3.0 * PI);
        assert_relative_eq!(radius, 1.0, epsilon = 1e-12);
        assert_relative_eq!(area, 4.0 * PI, epsilon = 1e-12);
    }
}
