//! Physical constants in SI base units.

/// Faraday constant, C/mol.
pub const FARADAY: f64 = 96_485.332_1;

/// Molar gas constant, J/(mol·K).
pub const GAS_CONSTANT: f64 = 8.314_462;

/// Molar mass of atomic hydrogen, kg/mol.
///
/// The molecule carries two atoms, see [`MOLAR_MASS_H2`].
pub const MOLAR_MASS_H: f64 = 1.007_94e-3;

/// Molar mass of molecular hydrogen, kg/mol.
pub const MOLAR_MASS_H2: f64 = 2.0 * MOLAR_MASS_H;

/// Lower heating value of hydrogen, J/kg (33.327 kWh/kg).
pub const LHV_H2: f64 = 33.327 * 3.6e6;

/// Ambient pressure used to convert gauge pressures to absolute, Pa.
pub const AMBIENT_PRESSURE: f64 = 1.0e5;

/// Pascals per bar.
pub const PA_PER_BAR: f64 = 1.0e5;

/// Zero of the Celsius scale, K.
pub const ZERO_CELSIUS: f64 = 273.15;
