//! Equations of state relating amount, volume, temperature and pressure.

pub mod ideal_gas;
pub mod van_der_waals;

pub use ideal_gas::IdealGas;
pub use van_der_waals::VanDerWaals;
