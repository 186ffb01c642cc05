//! Compressed hydrogen storage.

mod diffusion;

use hystor_core::{
    constants::{LHV_H2, MOLAR_MASS_H2},
    constraint::{ConstraintError, StrictlyPositive, UnitInterval},
    units::{MolarRate, mole_per_second},
};
use hystor_thermo::{PropertyError, model::VanDerWaals};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};
use uom::si::{
    amount_of_substance::mole,
    area::square_meter,
    energy::joule,
    f64::{
        AmountOfSubstance, Area, Energy, Length, Pressure, ThermodynamicTemperature, Time, Volume,
    },
    length::{meter, millimeter},
    pressure::pascal,
    ratio::ratio,
    thermodynamic_temperature::{degree_celsius, kelvin},
    volume::{cubic_meter, liter},
};

pub use diffusion::WallDiffusion;

/// Errors that can occur when sizing a [`PressureTank`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TankError {
    #[error("invalid tank configuration: {0}")]
    Constraint(#[from] ConstraintError),

    #[error("tank cannot be sized: {0}")]
    Property(#[from] PropertyError),
}

/// Rated capacity and design conditions of a hydrogen pressure vessel.
///
/// Quantities deserialize from SI base units (J, Pa, K, m).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankConfig {
    /// Energy content of the hydrogen in a full tank, on a lower heating
    /// value basis.
    pub capacity: Energy,

    /// Pressure of a full tank at the storage temperature.
    pub max_pressure: Pressure,

    /// Fill fraction at the start of the simulation.
    pub initial_soc: f64,

    #[serde(default = "default_temperature")]
    pub temperature: ThermodynamicTemperature,

    #[serde(default = "default_wall_thickness")]
    pub wall_thickness: Length,

    #[serde(default)]
    pub wall_diffusion: WallDiffusion,
}

fn default_temperature() -> ThermodynamicTemperature {
    ThermodynamicTemperature::new::<degree_celsius>(25.0)
}

fn default_wall_thickness() -> Length {
    Length::new::<millimeter>(5.0)
}

impl TankConfig {
    /// Creates a configuration at 25 °C with a 5 mm wall.
    #[must_use]
    pub fn new(capacity: Energy, max_pressure: Pressure, initial_soc: f64) -> Self {
        Self {
            capacity,
            max_pressure,
            initial_soc,
            temperature: default_temperature(),
            wall_thickness: default_wall_thickness(),
            wall_diffusion: WallDiffusion::default(),
        }
    }
}

/// A sealed, isothermal, spherical hydrogen vessel.
///
/// The vessel volume is fixed at construction so that the rated amount of
/// hydrogen reaches the design pressure under Van der Waals behavior.
/// Hydrogen is lost continuously by diffusion through the wall.
///
/// The tank itself is immutable; [`PressureTank::step`] takes the current
/// [`TankState`] and returns the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct PressureTank {
    gas: VanDerWaals,
    max_amount: AmountOfSubstance,
    volume: Volume,
    temperature: ThermodynamicTemperature,
    inner_radius: Length,
    inner_area: Area,
    wall_thickness: Length,
    diffusivity: f64,
    initial: TankState,
}

impl PressureTank {
    /// Sizes a tank for the configured capacity and pressure.
    ///
    /// # Errors
    ///
    /// Returns [`TankError::Constraint`] if the capacity, pressure, wall
    /// thickness or temperature is not strictly positive, or the initial state
    /// of charge lies outside `[0, 1]`.
    /// Returns [`TankError::Property`] if no gas-phase volume exists.
    pub fn new(config: TankConfig) -> Result<Self, TankError> {
        let TankConfig {
            capacity,
            max_pressure,
            initial_soc,
            temperature,
            wall_thickness,
            wall_diffusion,
        } = config;

        let capacity = StrictlyPositive::new(capacity)?.into_inner();
        let max_pressure = StrictlyPositive::new(max_pressure)?.into_inner();
        let initial_soc = UnitInterval::new(initial_soc)?.into_inner();
        let wall_thickness = StrictlyPositive::new(wall_thickness)?.into_inner();
        let kelvin_value = StrictlyPositive::new(temperature.get::<kelvin>())?.into_inner();

        let gas = VanDerWaals::hydrogen();
        let max_amount =
            AmountOfSubstance::new::<mole>(capacity.get::<joule>() / (LHV_H2 * MOLAR_MASS_H2));
        let volume = gas.volume(max_amount, max_pressure, temperature)?;
        let (radius, area) = diffusion::sphere_geometry(volume.get::<cubic_meter>());

        debug!(
            max_amount_mol = max_amount.get::<mole>(),
            volume_l = volume.get::<liter>(),
            inner_radius_m = radius,
            "sized hydrogen pressure tank"
        );

        let mut tank = Self {
            gas,
            max_amount,
            volume,
            temperature,
            inner_radius: Length::new::<meter>(radius),
            inner_area: Area::new::<square_meter>(area),
            wall_thickness,
            diffusivity: wall_diffusion.coefficient(kelvin_value),
            initial: TankState::empty(),
        };
        tank.initial = tank.state_at(initial_soc);
        Ok(tank)
    }

    /// The state given by the configured initial state of charge.
    #[must_use]
    pub fn initial_state(&self) -> TankState {
        self.initial
    }

    /// Advances the tank by one timestep.
    ///
    /// `net_flow` is the hydrogen entering the tank (negative when drawn).
    /// Wall losses are evaluated at the incoming state and always subtracted.
    ///
    /// The state of charge is not clamped. Filling past capacity or drawing
    /// past empty yields a state outside `[0, 1]`, reported by
    /// [`TankState::is_overfilled`] and [`TankState::is_depleted`].
    #[must_use]
    pub fn step(&self, state: &TankState, dt: Time, net_flow: MolarRate) -> TankState {
        let change = (net_flow - self.wall_loss(state)) * dt;
        let soc = state.soc + (change / self.max_amount).get::<ratio>();

        if !(0.0..=1.0).contains(&soc) {
            trace!(soc, "tank state of charge outside [0, 1]");
        }
        self.state_at(soc)
    }

    /// Hydrogen diffusing out through the wall, `D·c·A / s`.
    ///
    /// Depends only on the stored amount, never on the flow in or out.
    #[must_use]
    pub fn wall_loss(&self, state: &TankState) -> MolarRate {
        let concentration = state.amount.get::<mole>().max(0.0) / self.volume.get::<cubic_meter>();
        mole_per_second(
            self.diffusivity * concentration * self.inner_area.get::<square_meter>()
                / self.wall_thickness.get::<meter>(),
        )
    }

    /// Amount of hydrogen in a full tank.
    #[must_use]
    pub fn max_amount(&self) -> AmountOfSubstance {
        self.max_amount
    }

    #[must_use]
    pub fn volume(&self) -> Volume {
        self.volume
    }

    #[must_use]
    pub fn temperature(&self) -> ThermodynamicTemperature {
        self.temperature
    }

    #[must_use]
    pub fn inner_radius(&self) -> Length {
        self.inner_radius
    }

    #[must_use]
    pub fn inner_area(&self) -> Area {
        self.inner_area
    }

    fn state_at(&self, soc: f64) -> TankState {
        let amount = self.max_amount * soc;
        TankState {
            soc,
            amount,
            pressure: self.pressure_of(amount),
        }
    }

    /// Zero at or below empty and unbounded past the co-volume limit.
    fn pressure_of(&self, amount: AmountOfSubstance) -> Pressure {
        if amount.get::<mole>() <= 0.0 {
            return Pressure::new::<pascal>(0.0);
        }
        match self.gas.pressure(amount, self.volume, self.temperature) {
            Ok(pressure) => pressure,
            Err(err) => {
                debug!(%err, "tank filled beyond its co-volume");
                Pressure::new::<pascal>(f64::INFINITY)
            }
        }
    }
}

/// Fill level of a [`PressureTank`].
///
/// The pressure is always derived from the amount through the equation of
/// state and never integrated on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankState {
    soc: f64,
    amount: AmountOfSubstance,
    pressure: Pressure,
}

impl TankState {
    fn empty() -> Self {
        Self {
            soc: 0.0,
            amount: AmountOfSubstance::new::<mole>(0.0),
            pressure: Pressure::new::<pascal>(0.0),
        }
    }

    /// Stored amount as a fraction of the rated amount.
    #[must_use]
    pub fn soc(&self) -> f64 {
        self.soc
    }

    #[must_use]
    pub fn amount(&self) -> AmountOfSubstance {
        self.amount
    }

    #[must_use]
    pub fn pressure(&self) -> Pressure {
        self.pressure
    }

    /// Holds more than the rated amount.
    #[must_use]
    pub fn is_overfilled(&self) -> bool {
        self.soc > 1.0
    }

    /// Holds no hydrogen, or a negative amount after over-drawing.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.soc <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{energy::watt_hour, pressure::bar, time::second};

    fn tank(soc: f64) -> PressureTank {
        PressureTank::new(TankConfig::new(
            Energy::new::<watt_hour>(1000.0),
            Pressure::new::<bar>(200.0),
            soc,
        ))
        .unwrap()
    }

    fn hour() -> Time {
        Time::new::<second>(3600.0)
    }

    #[test]
    fn sizing_from_capacity_and_pressure() {
        let tank = tank(1.0);

        assert_relative_eq!(tank.max_amount().get::<mole>(), 14.8847, max_relative = 1e-4);
        assert_relative_eq!(tank.volume().get::<liter>(), 2.1364, max_relative = 1e-3);
        assert_relative_eq!(tank.inner_radius().get::<meter>(), 0.0799, max_relative = 1e-3);
        assert_relative_eq!(
            tank.initial_state().pressure().get::<bar>(),
            200.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn idle_hour_loses_only_wall_diffusion() {
        let tank = tank(0.5);
        let start = tank.initial_state();
        let loss = tank.wall_loss(&start);
        assert!(loss.value > 0.0);

        let end = tank.step(&start, hour(), mole_per_second(0.0));

        let expected_soc = 0.5 - loss.value * 3600.0 / tank.max_amount().get::<mole>();
        assert_relative_eq!(end.soc(), expected_soc, epsilon = 1e-14);
        assert!(end.soc() < 0.5);
        assert!(0.5 - end.soc() < 1e-4, "loss should be small");

        assert!(end.pressure() < start.pressure());
        let expected_pressure = tank
            .gas
            .pressure(end.amount(), tank.volume(), tank.temperature())
            .unwrap();
        assert_relative_eq!(
            end.pressure().get::<pascal>(),
            expected_pressure.get::<pascal>(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn filling_raises_pressure() {
        let tank = tank(0.2);
        let mut state = tank.initial_state();

        for _ in 0..10 {
            let next = tank.step(&state, Time::new::<second>(60.0), mole_per_second(1e-3));
            assert!(next.soc() > state.soc());
            assert!(next.pressure() > state.pressure());
            state = next;
        }
    }

    #[test]
    fn soc_is_not_clamped() {
        let tank = tank(0.9);
        let start = tank.initial_state();

        let over = tank.step(&start, hour(), mole_per_second(1e-3));
        assert!(over.soc() > 1.0);
        assert!(over.is_overfilled());
        assert!(over.pressure() > Pressure::new::<bar>(200.0));

        let under = tank.step(&start, hour(), mole_per_second(-5e-3));
        assert!(under.soc() < 0.0);
        assert!(under.is_depleted());
        assert_eq!(under.pressure().get::<pascal>(), 0.0);
        assert_eq!(tank.wall_loss(&under).value, 0.0);
    }

    #[test]
    fn empty_tank_has_no_pressure_and_no_loss() {
        let tank = tank(0.0);
        let state = tank.initial_state();

        assert_eq!(state.pressure().get::<pascal>(), 0.0);
        assert_eq!(tank.wall_loss(&state).value, 0.0);
        assert!(state.is_depleted());
        assert!(!state.is_overfilled());
    }

    #[test]
    fn rejects_invalid_configuration() {
        let capacity = Energy::new::<watt_hour>(1000.0);
        let pressure = Pressure::new::<bar>(200.0);

        assert_eq!(
            PressureTank::new(TankConfig::new(capacity, pressure, 1.2)),
            Err(TankError::Constraint(ConstraintError::AboveMaximum))
        );
        assert_eq!(
            PressureTank::new(TankConfig::new(Energy::new::<watt_hour>(0.0), pressure, 0.5)),
            Err(TankError::Constraint(ConstraintError::Zero))
        );
        assert_eq!(
            PressureTank::new(TankConfig {
                wall_thickness: Length::new::<meter>(-1.0),
                ..TankConfig::new(capacity, pressure, 0.5)
            }),
            Err(TankError::Constraint(ConstraintError::Negative))
        );
    }
}
