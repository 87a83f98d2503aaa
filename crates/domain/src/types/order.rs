//! Trade orders

use serde::{Deserialize, Serialize};

use super::{Currency, Ship};

/// A single line of a purchase or sell order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub good: String,
    pub price_per_unit: Currency,
    pub quantity: i64,
    #[serde(rename = "total")]
    pub total_price: Currency,
}

/// Result of buying or selling goods with a ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipOrder {
    pub credits: Currency,
    #[serde(rename = "order")]
    pub orders: Vec<Order>,
    pub ship: Ship,
}
