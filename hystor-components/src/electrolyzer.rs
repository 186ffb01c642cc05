//! PEM electrolyzer models.
//!
//! Within a timestep the stack turns a power setpoint into gas production,
//! the pressure model routes that production through the separators, and the
//! membrane model reports what crosses between the electrodes.

mod controller;
mod membrane;
mod pressure;
mod stack;

pub use controller::{IdealVariableCathode, PressureBounds, PressureController};
pub use membrane::{Crossover, Membrane, MembraneConfig};
pub use pressure::{
    AnodePressure, ElectrodePressures, PartialPressures, PressureInput, PressureModel,
    PressureModelConfig, PressureOutput,
};
pub use stack::{ElectrolyzerStack, ElectrolyzerStackConfig, StackError};
