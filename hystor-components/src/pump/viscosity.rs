use ndarray::Array1;
use ninterp::{
    error::ValidateError,
    interpolator::Extrapolate,
    prelude::{Interp1DOwned, Interpolator},
    strategy::Linear,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use uom::si::{
    dynamic_viscosity::{millipascal_second, pascal_second},
    f64::DynamicViscosity,
};

use super::Electrolyte;
use crate::lookup::{DelimitedTable, TableError};

/// Viscosity of an electrolyte as a function of state of charge.
pub trait ElectrolyteViscosity {
    fn viscosity(&self, electrolyte: Electrolyte, soc: f64) -> DynamicViscosity;
}

/// Errors that can occur when building a [`TabulatedViscosity`].
#[derive(Debug, Error)]
pub enum ViscosityError {
    #[error("invalid viscosity grid: {0}")]
    Grid(#[from] ValidateError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("viscosity must be positive, got {0} Pa·s")]
    NonPositive(f64),
}

/// Viscosities of one electrolyte at either end of the charge range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViscosityRange {
    pub discharged: DynamicViscosity,
    pub charged: DynamicViscosity,
}

/// Viscosity varying linearly between the discharged and charged states.
///
/// The state of charge is clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearViscosity {
    pub anolyte: ViscosityRange,
    pub catholyte: ViscosityRange,
}

impl LinearViscosity {
    /// The same viscosity on both sides at every state of charge.
    #[must_use]
    pub fn constant(viscosity: DynamicViscosity) -> Self {
        let range = ViscosityRange {
            discharged: viscosity,
            charged: viscosity,
        };
        Self {
            anolyte: range,
            catholyte: range,
        }
    }
}

impl Default for LinearViscosity {
    /// Typical vanadium electrolyte in sulfuric acid.
    fn default() -> Self {
        Self {
            anolyte: ViscosityRange {
                discharged: DynamicViscosity::new::<millipascal_second>(5.2),
                charged: DynamicViscosity::new::<millipascal_second>(4.4),
            },
            catholyte: ViscosityRange {
                discharged: DynamicViscosity::new::<millipascal_second>(5.6),
                charged: DynamicViscosity::new::<millipascal_second>(6.4),
            },
        }
    }
}

impl ElectrolyteViscosity for LinearViscosity {
    fn viscosity(&self, electrolyte: Electrolyte, soc: f64) -> DynamicViscosity {
        let range = match electrolyte {
            Electrolyte::Anolyte => self.anolyte,
            Electrolyte::Catholyte => self.catholyte,
        };
        let soc = if soc.is_nan() { 0.0 } else { soc.clamp(0.0, 1.0) };
        range.discharged + (range.charged - range.discharged) * soc
    }
}

/// Viscosity interpolated linearly over a state-of-charge grid.
///
/// Outside the grid the end values are held.
pub struct TabulatedViscosity {
    anolyte: Interp1DOwned<f64, Linear>,
    catholyte: Interp1DOwned<f64, Linear>,
    fallback: [f64; 2],
}

impl TabulatedViscosity {
    /// Builds the interpolants from a shared grid, viscosities in Pa·s.
    ///
    /// # Errors
    ///
    /// Returns [`ViscosityError::Grid`] if the grid is not strictly
    /// increasing or the lengths differ, and [`ViscosityError::NonPositive`]
    /// for a non-positive viscosity.
    pub fn new(
        soc: Vec<f64>,
        anolyte: Vec<f64>,
        catholyte: Vec<f64>,
    ) -> Result<Self, ViscosityError> {
        if let Some(&bad) = anolyte.iter().chain(&catholyte).find(|&&mu| !(mu > 0.0)) {
            return Err(ViscosityError::NonPositive(bad));
        }
        let fallback = [
            anolyte.first().copied().unwrap_or(f64::NAN),
            catholyte.first().copied().unwrap_or(f64::NAN),
        ];

        let grid = Array1::from(soc);
        Ok(Self {
            anolyte: Interp1DOwned::new(
                grid.clone(),
                Array1::from(anolyte),
                Linear,
                Extrapolate::Clamp,
            )?,
            catholyte: Interp1DOwned::new(
                grid,
                Array1::from(catholyte),
                Linear,
                Extrapolate::Clamp,
            )?,
            fallback,
        })
    }

    /// Reads state of charge, anolyte and catholyte viscosity (Pa·s) from
    /// the first three columns.
    ///
    /// # Errors
    ///
    /// Returns a [`ViscosityError`] if a column is missing or the data is
    /// invalid.
    pub fn from_table(table: &DelimitedTable) -> Result<Self, ViscosityError> {
        Self::new(
            table.column(0)?.to_vec(),
            table.column(1)?.to_vec(),
            table.column(2)?.to_vec(),
        )
    }
}

impl ElectrolyteViscosity for TabulatedViscosity {
    fn viscosity(&self, electrolyte: Electrolyte, soc: f64) -> DynamicViscosity {
        let (interp, fallback) = match electrolyte {
            Electrolyte::Anolyte => (&self.anolyte, self.fallback[0]),
            Electrolyte::Catholyte => (&self.catholyte, self.fallback[1]),
        };

        let value = interp.interpolate(&[soc]).unwrap_or_else(|err| {
            warn!(%err, soc, "viscosity lookup failed, using the first tabulated value");
            fallback
        });
        DynamicViscosity::new::<pascal_second>(value)
    }
}
