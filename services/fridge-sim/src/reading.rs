//! Telemetry reading value type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One synthetic telemetry snapshot
///
/// Readings are immutable once produced; every tick replaces the previous
/// reading with a fresh one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temperature_c: f64,
    pub humidity_percent: i32,
    pub power_watts: i32,
    pub connected: bool,
    pub captured_at: DateTime<Utc>,
}
