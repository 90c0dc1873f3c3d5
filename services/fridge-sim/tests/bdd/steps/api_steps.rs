//! BDD step definitions for the HTTP API feature

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use cucumber::{given, then, when};
use tower::ServiceExt;

use fridge_sim::{
    build_router, start, ApiState, Inventory, RandomSource, RngSource, ScriptedSource, SystemClock,
    TenantConfig,
};

use crate::world::FridgeWorld;

fn send(world: &mut FridgeWorld, request: Request<Body>) {
    let simulator = world.handle().clone();
    let state = ApiState {
        simulator,
        controls: Arc::clone(world.controls.as_ref().expect("service not running")),
        inventory: Arc::new(Inventory::seed()),
        tenant: TenantConfig::default(),
        port: 5174,
    };

    let (status, json) = world.runtime.block_on(async move {
        let response = build_router(state).oneshot(request).await.unwrap();
        let status = response.status().as_u16();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).ok())
    });

    world.response_status = Some(status);
    world.response_json = json;
}

#[given("a running fridge service")]
fn running_service(world: &mut FridgeWorld) {
    let rng: Box<dyn RandomSource> = match &world.script {
        Some(values) => Box::new(ScriptedSource::new(values.clone())),
        None => Box::new(RngSource::seeded(1)),
    };

    let _guard = world.runtime.enter();
    let handle = start(world.config.clone(), rng, Arc::new(SystemClock)).unwrap();
    let state = ApiState::new(handle.clone(), TenantConfig::default(), 5174);
    world.controls = Some(state.controls);
    world.handle = Some(handle);
}

#[when(expr = "I request {string}")]
fn request_path(world: &mut FridgeWorld, path: String) {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    send(world, request);
}

#[when(expr = "I adjust the target temperature by {float} degrees")]
fn adjust_target(world: &mut FridgeWorld, delta: f64) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/controls/target")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::json!({ "delta": delta }).to_string()))
        .unwrap();
    send(world, request);
}

#[when(expr = "I switch the compressor {word}")]
fn switch_compressor(world: &mut FridgeWorld, state: String) {
    let on = match state.as_str() {
        "on" => true,
        "off" => false,
        other => panic!("Unknown compressor state: {}", other),
    };
    let request = Request::builder()
        .method("PUT")
        .uri("/api/controls/compressor")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::json!({ "on": on }).to_string()))
        .unwrap();
    send(world, request);
}

#[then(expr = "the response status is {int}")]
fn response_status(world: &mut FridgeWorld, expected: u16) {
    assert_eq!(world.response_status, Some(expected));
}

#[then(expr = "the JSON field {string} is {string}")]
fn json_string_field(world: &mut FridgeWorld, field: String, expected: String) {
    let json = world.response_json.as_ref().expect("no JSON body");
    assert_eq!(json[&field], serde_json::Value::String(expected));
}

#[then(expr = "the JSON number {string} is {float}")]
fn json_number_field(world: &mut FridgeWorld, field: String, expected: f64) {
    let json = world.response_json.as_ref().expect("no JSON body");
    let actual = json[&field].as_f64().expect("not a number");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[then(expr = "the JSON flag {string} is {word}")]
fn json_bool_field(world: &mut FridgeWorld, field: String, expected: String) {
    let json = world.response_json.as_ref().expect("no JSON body");
    let expected: bool = expected.parse().expect("not a boolean");
    assert_eq!(json[&field].as_bool(), Some(expected));
}
