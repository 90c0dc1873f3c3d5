//! Kiosk inventory and alert feed
//!
//! Fixed seed data shown next to the live telemetry on the kiosk view. Nothing
//! here changes at runtime.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Product category of an inventory item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Dairy,
    Fruits,
    Beverages,
    Prepared,
}

/// One stocked product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub quantity: u32,
    pub expiry: NaiveDate,
    pub category: Category,
}

/// Overall device health as shown on the kiosk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    #[default]
    Normal,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Warning,
    Info,
}

/// Operator notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    /// Local wall time, `HH:MM`
    pub time: String,
}

/// Stock, alerts and device status for one kiosk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub status: DeviceStatus,
    pub items: Vec<InventoryItem>,
    pub alerts: Vec<Alert>,
}

impl Inventory {
    /// The stock and alerts the kiosk starts with
    pub fn seed() -> Self {
        Self {
            status: DeviceStatus::Normal,
            items: vec![
                item("Yaourts Nature", 24, date(2025, 10, 15), Category::Dairy),
                item("Compotes Pomme", 18, date(2025, 11, 20), Category::Fruits),
                item("Eau Minérale", 36, date(2026, 3, 10), Category::Beverages),
                item("Sandwichs Jambon", 8, date(2025, 9, 28), Category::Prepared),
            ],
            alerts: vec![
                Alert {
                    id: 1,
                    kind: AlertKind::Warning,
                    message: "Température légèrement élevée détectée".to_string(),
                    time: "10:30".to_string(),
                },
                Alert {
                    id: 2,
                    kind: AlertKind::Info,
                    message: "Réapprovisionnement Yaourts prévu demain".to_string(),
                    time: "09:15".to_string(),
                },
            ],
        }
    }

    /// Units in stock across all items
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::seed()
    }
}

fn item(name: &str, quantity: u32, expiry: NaiveDate, category: Category) -> InventoryItem {
    InventoryItem {
        name: name.to_string(),
        quantity,
        expiry,
        category,
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
