//! BDD step definitions for fridge-sim

pub mod api_steps;
pub mod simulator_steps;
