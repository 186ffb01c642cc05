//! Drives the components through whole simulations, playing the orchestrator.

use std::path::PathBuf;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use hystor_components::{
    electrolyzer::{
        ElectrodePressures, ElectrolyzerStack, ElectrolyzerStackConfig, PressureInput,
        PressureModel, PressureModelConfig,
    },
    fuel_cell::{LookupFuelCell, LookupFuelCellConfig},
    lookup::TableFormat,
    pump::{
        CircuitState, Electrolyte, FixedFlowRate, FixedFlowRateConfig, LinearViscosity,
        PumpAlgorithm, StackModule,
    },
    tank::{PressureTank, TankConfig},
};
use hystor_core::{
    constants::FARADAY,
    units::{mole_per_second, per_cubic_meter},
};
use uom::si::{
    area::square_centimeter,
    electric_current::ampere,
    energy::kilowatt_hour,
    f64::{Area, ElectricCurrent, Energy, Power, Pressure, ThermodynamicTemperature, Time},
    power::{kilowatt, watt},
    pressure::bar,
    thermodynamic_temperature::degree_celsius,
    time::second,
    volume_rate::cubic_meter_per_second,
};

fn data(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(file)
}

fn tank(capacity_kwh: f64, soc: f64) -> PressureTank {
    PressureTank::new(TankConfig::new(
        Energy::new::<kilowatt_hour>(capacity_kwh),
        Pressure::new::<bar>(200.0),
        soc,
    ))
    .unwrap()
}

#[test]
fn electrolyzer_charges_the_tank() {
    let stack = ElectrolyzerStack::new(ElectrolyzerStackConfig::default()).unwrap();
    let separators = PressureModel::new(PressureModelConfig::default()).unwrap();
    let tank = tank(10.0, 0.2);

    let temperature = ThermodynamicTemperature::new::<degree_celsius>(60.0);
    let power = Power::new::<kilowatt>(2.0);
    let dt = Time::new::<second>(10.0);

    let mut electrodes = ElectrodePressures::ambient();
    let mut state = tank.initial_state();
    let initial = state;
    let mut delivered = 0.0;
    let mut lost = 0.0;

    for _ in 0..360 {
        // Stack first, then the separators, then the tank.
        let partial = electrodes.partial_pressures(temperature);
        let point = stack.calculate(power, temperature, &partial).unwrap();
        assert_relative_eq!(point.power.get::<watt>(), 2_000.0, max_relative = 1e-6);

        let crossover = stack
            .membrane()
            .crossover(point.current, &partial, temperature)
            .scaled(stack.cells());
        assert!(crossover.hydrogen.value < point.hydrogen.value);

        let output = separators.calculate(
            &electrodes,
            &PressureInput {
                temperature,
                hydrogen_production: point.hydrogen - crossover.hydrogen,
                oxygen_production: point.oxygen - crossover.oxygen,
                dt,
            },
        );
        assert!(output.hydrogen_outflow.value >= 0.0);
        assert!(output.pressures.cathode <= Pressure::new::<bar>(41.0 + 1e-9));
        assert!(output.pressures.cathode >= Pressure::new::<bar>(1.0 - 1e-9));

        delivered += output.hydrogen_outflow.value * dt.get::<second>();
        lost += tank.wall_loss(&state).value * dt.get::<second>();
        state = tank.step(&state, dt, output.hydrogen_outflow);
        electrodes = output.pressures;
    }

    // The separator fills within the hour and then vents at the upper bound.
    assert_relative_eq!(electrodes.cathode.get::<bar>(), 41.0, max_relative = 1e-6);
    assert_relative_eq!(electrodes.anode.get::<bar>(), 1.0, max_relative = 1e-12);

    let gained = (state.amount() - initial.amount()).value;
    assert_relative_eq!(gained, delivered - lost, max_relative = 1e-9);
    assert!(state.soc() > initial.soc());
    assert!(state.pressure() > initial.pressure());
    assert!(!state.is_overfilled());
}

#[test]
fn fuel_cell_draws_the_tank_down() {
    let fuel_cell = LookupFuelCell::from_config(&LookupFuelCellConfig {
        cells: 20,
        cell_area: Area::new::<square_centimeter>(50.0),
        voltage_table: data("fuel_cell_voltage.csv"),
        power_table: data("fuel_cell_power.csv"),
        format: TableFormat::default(),
    })
    .unwrap();
    let tank = tank(1.0, 0.8);

    let dt = Time::new::<second>(60.0);
    let mut state = tank.initial_state();
    let mut lost = 0.0;

    for _ in 0..60 {
        let point = fuel_cell.calculate(Power::new::<watt>(-284.0));
        assert_relative_eq!(point.current.get::<ampere>(), -20.0, max_relative = 1e-12);

        lost += tank.wall_loss(&state).value * dt.get::<second>();
        state = tank.step(&state, dt, point.hydrogen);
    }

    let consumed = 20.0 * 20.0 / (2.0 * FARADAY) * 3_600.0;
    let expected = 0.8 - (consumed + lost) / tank.max_amount().value;
    assert_relative_eq!(state.soc(), expected, max_relative = 1e-9);
    assert!(state.soc() < 0.8);
    assert!(!state.is_depleted());
}

#[test]
fn drawing_past_empty_is_reported_not_clamped() {
    let tank = tank(1.0, 0.01);
    let draw = -tank.max_amount().value / 60.0;

    let state = tank.step(
        &tank.initial_state(),
        Time::new::<second>(60.0),
        mole_per_second(draw),
    );

    assert!(state.is_depleted());
    assert!(state.soc() < 0.0);
    assert_abs_diff_eq!(state.pressure().value, 0.0);
}

#[test]
fn pump_follows_the_module_it_serves() {
    let module = StackModule {
        serial_stacks: 1,
        parallel_stacks: 2,
        cells_per_stack: 40,
        cell_area: Area::new::<square_centimeter>(2_000.0),
        hydraulic_resistance: per_cubic_meter(5.0e8),
    };
    let pump = FixedFlowRate::new(
        module,
        FixedFlowRateConfig::default(),
        LinearViscosity::default(),
    )
    .unwrap();

    // 1 mL/min/cm² over 16 m² of electrode.
    let running_flow = 160_000.0 * 1.0e-6 / 60.0;
    let profile = [0.0, 4_000.0, 4_000.0, 0.0, -3_000.0, 0.0];

    let mut soc: f64 = 0.5;
    for power in profile {
        let state = CircuitState {
            power: Power::new::<watt>(power),
            current: ElectricCurrent::new::<ampere>(power / 60.0),
            soc,
        };

        for side in [Electrolyte::Anolyte, Electrolyte::Catholyte] {
            let flow = pump.flow_rate(side, &state).get::<cubic_meter_per_second>();
            let drop = pump.pressure_drop(side, &state);
            if power == 0.0 {
                assert_eq!(flow, 0.0);
                assert_eq!(drop.value, 0.0);
            } else {
                assert_relative_eq!(flow, running_flow, max_relative = 1e-12);
                assert!(drop.value > 0.0);
            }
        }

        soc = (soc + power / 1.0e5).clamp(0.0, 1.0);
    }

    assert_eq!(pump.max_flow_rate(), pump.min_flow_rate());
}
