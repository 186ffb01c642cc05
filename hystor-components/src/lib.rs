//! Physical models of an electrochemical hydrogen storage subsystem.
//!
//! Every model is advanced one timestep at a time by an outside
//! orchestrator. Within a step the electrolyzer stack turns a power setpoint
//! into gas production, the pressure and membrane models route that gas
//! through the separators, and the pressure tank integrates what arrives.
//! The fuel cell draws hydrogen back out, and the pump models size the
//! electrolyte circulation of a flow battery independently of the rest.
//!
//! Models are immutable once built. Per-step state is passed in and returned
//! by value, so the caller decides what history to keep.

pub mod electrolyzer;
pub mod fuel_cell;
pub mod lookup;
pub mod pump;
pub mod tank;

mod operating_point;

pub use operating_point::StackOperatingPoint;
