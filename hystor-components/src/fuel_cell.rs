//! Fuel cell stacks characterized by measured polarization data.

use std::path::{Path, PathBuf};

use hystor_core::{
    constants::FARADAY,
    constraint::{ConstraintError, StrictlyPositive},
    units::mole_per_second,
};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uom::si::{
    area::square_centimeter,
    electric_current::ampere,
    electric_potential::volt,
    f64::{Area, ElectricCurrent, ElectricPotential, Power},
    power::watt,
};

use crate::{
    StackOperatingPoint,
    lookup::{DelimitedTable, TableError, TableFormat, nearest_index},
};

/// Errors that can occur when building a [`LookupFuelCell`].
#[derive(Debug, Error)]
pub enum FuelCellError {
    #[error("invalid fuel cell configuration: {0}")]
    Constraint(#[from] ConstraintError),

    #[error("invalid fuel cell table: {0}")]
    Table(#[from] TableError),
}

/// Where a [`LookupFuelCell`] finds its tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupFuelCellConfig {
    pub cells: u32,
    pub cell_area: Area,
    /// Current density (A/cm²) against cell voltage (V).
    pub voltage_table: PathBuf,
    /// Current density (A/cm²) against cell power density (W/cm²).
    pub power_table: PathBuf,
    #[serde(default)]
    pub format: TableFormat,
}

/// Per-cell polarization data.
///
/// Both tables hold current density in A/cm² in their first column. The
/// voltage table holds cell voltage in V and the power table holds power
/// density in W/cm² in their second column. Columns are positional.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelCellTables {
    pub voltage: DelimitedTable,
    pub power: DelimitedTable,
}

impl FuelCellTables {
    /// Parses both tables from text.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] if either table is malformed.
    pub fn parse(voltage: &str, power: &str, format: &TableFormat) -> Result<Self, TableError> {
        Ok(Self {
            voltage: DelimitedTable::parse(voltage, format)?,
            power: DelimitedTable::parse(power, format)?,
        })
    }

    /// Reads both tables from files.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] if either file is unreadable or malformed.
    pub fn from_paths(
        voltage: impl AsRef<Path>,
        power: impl AsRef<Path>,
        format: &TableFormat,
    ) -> Result<Self, TableError> {
        Ok(Self {
            voltage: DelimitedTable::from_path(voltage, format)?,
            power: DelimitedTable::from_path(power, format)?,
        })
    }
}

/// A fuel cell stack that reads its operating point off tabulated curves.
///
/// Each row of the power table becomes one stack operating point. A request
/// selects the row whose stack power is nearest, without interpolating, so
/// the result is always a tabulated point and never extrapolated.
///
/// Results follow the load convention: power, current and hydrogen are
/// negative because the stack delivers power and consumes hydrogen.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupFuelCell {
    cells: u32,
    power: Array1<f64>,
    current: Array1<f64>,
    voltage: Array1<f64>,
}

impl LookupFuelCell {
    /// Scales per-cell tables to a stack of `cells` cells of `cell_area`.
    ///
    /// The voltage for each power row is taken from the voltage-table row
    /// with the nearest current density.
    ///
    /// # Errors
    ///
    /// Returns [`FuelCellError::Constraint`] for an empty stack or a
    /// non-positive area and [`FuelCellError::Table`] if a table lacks a
    /// second column.
    pub fn new(
        cells: u32,
        cell_area: Area,
        tables: &FuelCellTables,
    ) -> Result<Self, FuelCellError> {
        let cells = StrictlyPositive::new(cells)?.into_inner();
        let area = StrictlyPositive::new(cell_area.get::<square_centimeter>())?.into_inner();
        let n = f64::from(cells);

        let power_density = tables.power.column(1)?;
        let power_current = tables.power.column(0)?;
        let voltage_current = tables.voltage.column(0)?;
        let cell_voltage = tables.voltage.column(1)?;

        let voltage = power_current
            .iter()
            .map(|&j| {
                nearest_index(voltage_current, j).map_or(0.0, |row| cell_voltage[row] * n)
            })
            .collect::<Array1<f64>>();

        debug!(
            cells,
            area_cm2 = area,
            rows = power_density.len(),
            "built lookup fuel cell stack"
        );

        Ok(Self {
            cells,
            power: power_density.mapv(|p| p * area * n),
            current: power_current.mapv(|j| j * area),
            voltage,
        })
    }

    /// Loads the tables named in `config` and builds the stack.
    ///
    /// # Errors
    ///
    /// Returns a [`FuelCellError`] if a table cannot be loaded or the
    /// configuration is invalid.
    pub fn from_config(config: &LookupFuelCellConfig) -> Result<Self, FuelCellError> {
        let tables =
            FuelCellTables::from_paths(&config.voltage_table, &config.power_table, &config.format)?;
        Self::new(config.cells, config.cell_area, &tables)
    }

    /// Operating point delivering the tabulated power nearest to `|power|`.
    #[must_use]
    pub fn calculate(&self, power: Power) -> StackOperatingPoint {
        let requested = power.get::<watt>().abs();
        match nearest_index(self.power.view(), requested) {
            Some(row) => self.row(row),
            None => StackOperatingPoint::default(),
        }
    }

    /// Largest tabulated stack power.
    #[must_use]
    pub fn max_power(&self) -> Power {
        Power::new::<watt>(self.power.iter().copied().fold(0.0, f64::max))
    }

    /// Every tabulated operating point, in table order.
    #[must_use]
    pub fn operating_points(&self) -> Vec<StackOperatingPoint> {
        (0..self.power.len()).map(|row| self.row(row)).collect()
    }

    fn row(&self, row: usize) -> StackOperatingPoint {
        let current = self.current[row];
        let electrons = f64::from(self.cells) * current / FARADAY;

        StackOperatingPoint {
            power: Power::new::<watt>(-self.power[row]),
            current: ElectricCurrent::new::<ampere>(-current),
            voltage: ElectricPotential::new::<volt>(self.voltage[row]),
            hydrogen: mole_per_second(-electrons / 2.0),
            oxygen: mole_per_second(-electrons / 4.0),
            water: mole_per_second(electrons / 2.0),
        }
    }
}
