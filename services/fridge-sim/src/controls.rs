//! Operator controls: target temperature set point and compressor switch

use serde::{Deserialize, Serialize};

use crate::config::Bounds;

/// Operator-facing fridge controls
///
/// These are plain state. They do not feed back into the simulated readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    pub target_temperature_c: f64,
    pub compressor_on: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            target_temperature_c: 4.0,
            compressor_on: true,
        }
    }
}

impl Controls {
    /// Start from the default set point, pulled inside `bounds` if needed
    pub fn within(bounds: &Bounds<f64>) -> Self {
        let mut controls = Self::default();
        controls.target_temperature_c = bounds.clamp(controls.target_temperature_c);
        controls
    }

    /// Nudge the set point by `delta`, keeping it inside `bounds`
    pub fn adjust_target(&mut self, delta: f64, bounds: &Bounds<f64>) -> f64 {
        self.target_temperature_c = bounds.clamp(self.target_temperature_c + delta);
        self.target_temperature_c
    }

    pub fn set_compressor(&mut self, on: bool) {
        self.compressor_on = on;
    }

    pub fn toggle_compressor(&mut self) -> bool {
        self.compressor_on = !self.compressor_on;
        self.compressor_on
    }
}
