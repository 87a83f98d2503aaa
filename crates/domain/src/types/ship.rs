//! Ships

use serde::{Deserialize, Serialize};

use super::{Currency, Modifier};

/// A ship, either listed for sale (with `purchase_locations`) or owned (with
/// `id`, `location`, `cargo`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    #[serde(rename = "type")]
    pub ship_type: String,
    pub class: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub max_cargo: i64,
    #[serde(default)]
    pub speed: Modifier,
    #[serde(default)]
    pub plating: i64,
    #[serde(default)]
    pub weapons: i64,
    #[serde(default)]
    pub docking_efficiency: Option<Modifier>,
    #[serde(default)]
    pub fuel_efficiency: Option<Modifier>,
    #[serde(default)]
    pub maintenance: Option<Modifier>,
    #[serde(default)]
    pub purchase_locations: Vec<PurchaseLocation>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub cargo: Vec<Cargo>,
    #[serde(default)]
    pub space_available: Option<i64>,
}

impl Ship {
    /// Cheapest place to buy this ship, if it is for sale anywhere.
    pub fn cheapest_purchase(&self) -> Option<&PurchaseLocation> {
        self.purchase_locations.iter().min_by(|a, b| a.price.total_cmp(&b.price))
    }
}

/// Where a ship can be bought and for how much.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLocation {
    pub location: String,
    pub price: Currency,
    #[serde(default)]
    pub system: Option<String>,
}

/// Goods held by a ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cargo {
    pub good: String,
    pub quantity: i64,
    pub total_volume: i64,
}
