//! BDD step definitions for the simulator lifecycle feature

use std::sync::Arc;

use cucumber::{given, then, when};

use fridge_sim::{
    start, Bounds, Clock, FridgeSimError, RandomSource, RngSource, ScriptedSource,
    SimulatorConfig, SimulatorProfile,
};

use crate::world::FridgeWorld;

fn parse_list(list: &str) -> Vec<f64> {
    list.split(',')
        .map(|v| v.trim().parse().expect("not a number"))
        .collect()
}

#[given(expr = "a fridge simulator with a {int} ms tick interval")]
fn fridge_simulator(world: &mut FridgeWorld, interval: u64) {
    world.config = SimulatorConfig::for_profile(SimulatorProfile::Fridge);
    world.config.tick_interval_ms = interval;
}

#[given("a kiosk simulator")]
fn kiosk_simulator(world: &mut FridgeWorld) {
    world.config = SimulatorConfig::for_profile(SimulatorProfile::Kiosk);
}

#[given(expr = "a tick interval of {int} ms")]
fn tick_interval(world: &mut FridgeWorld, interval: u64) {
    world.config.tick_interval_ms = interval;
}

#[given(expr = "a temperature range of {float} to {float} degrees starting at {float}")]
fn temperature_range(world: &mut FridgeWorld, min: f64, max: f64, initial: f64) {
    world.config.temperature = Bounds::new(min, max);
    world.config.initial_temperature_c = initial;
}

#[given(regex = r"^a scripted random source of (.+)$")]
fn scripted_source(world: &mut FridgeWorld, values: String) {
    world.script = Some(parse_list(&values));
}

#[when("the simulator is started")]
fn simulator_started(world: &mut FridgeWorld) {
    let rng: Box<dyn RandomSource> = match &world.script {
        Some(values) => Box::new(ScriptedSource::new(values.clone())),
        None => Box::new(RngSource::seeded(0xF1D6E)),
    };
    let clock: Arc<dyn Clock> = world.clock.clone();

    let _guard = world.runtime.enter();
    match start(world.config.clone(), rng, clock) {
        Ok(handle) => world.handle = Some(handle),
        Err(e) => world.start_error = Some(e),
    }
}

#[when("a reading callback is registered")]
fn callback_registered(world: &mut FridgeWorld) {
    let sink = Arc::clone(&world.readings);
    world
        .handle()
        .on_reading(move |reading| sink.lock().unwrap().push(reading.clone()));
}

#[when(expr = "the clock advances by {int} ms")]
fn clock_advances(world: &mut FridgeWorld, ms: u64) {
    world.advance(ms);
}

#[when(expr = "the clock advances by {int} ms {int} times")]
fn clock_advances_repeatedly(world: &mut FridgeWorld, ms: u64, times: u32) {
    for _ in 0..times {
        world.advance(ms);
    }
}

#[when("the simulator is stopped")]
fn simulator_stopped(world: &mut FridgeWorld) {
    world.handle().stop();
}

#[then(expr = "the callback has been invoked {int} time(s)")]
fn callback_invoked(world: &mut FridgeWorld, expected: usize) {
    assert_eq!(world.readings.lock().unwrap().len(), expected);
}

#[then(expr = "every reading has a temperature between {float} and {float} degrees")]
fn readings_within(world: &mut FridgeWorld, min: f64, max: f64) {
    let readings = world.readings.lock().unwrap();
    assert!(!readings.is_empty());
    for reading in readings.iter() {
        assert!(
            reading.temperature_c >= min && reading.temperature_c <= max,
            "temperature {} outside [{}, {}]",
            reading.temperature_c,
            min,
            max
        );
    }
}

#[then(expr = "the current reading has a temperature of {float} degrees")]
fn current_temperature(world: &mut FridgeWorld, expected: f64) {
    let reading = world.handle().current_reading();
    assert!(
        (reading.temperature_c - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        reading.temperature_c
    );
}

#[then(regex = r"^the temperatures are (.+)$")]
fn temperatures_are(world: &mut FridgeWorld, values: String) {
    let expected = parse_list(&values);
    let actual: Vec<f64> = world
        .readings
        .lock()
        .unwrap()
        .iter()
        .map(|r| r.temperature_c)
        .collect();

    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!((a - e).abs() < 1e-9, "expected {}, got {}", e, a);
    }
}

#[then(expr = "the last reading was captured {int} seconds after start")]
fn last_captured_at(world: &mut FridgeWorld, seconds: i64) {
    let readings = world.readings.lock().unwrap();
    let last = readings.last().expect("no reading was recorded");
    assert_eq!(
        last.captured_at,
        world.started_at + chrono::Duration::seconds(seconds)
    );
}

#[then("the simulator is not running")]
fn not_running(world: &mut FridgeWorld) {
    assert!(!world.handle().is_running());
}

#[then("starting fails with an invalid configuration error")]
fn start_fails(world: &mut FridgeWorld) {
    assert!(world.handle.is_none());
    assert!(matches!(
        world.start_error,
        Some(FridgeSimError::InvalidConfig(_))
    ));
}

#[then("no reading was produced")]
fn no_reading(world: &mut FridgeWorld) {
    world.advance(60_000);
    assert!(world.readings.lock().unwrap().is_empty());
}
