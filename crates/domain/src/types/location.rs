//! Locations

use serde::{Deserialize, Serialize};

/// A location (planet, moon, asteroid, ...) inside a system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub x: i64,
    pub y: i64,
    #[serde(default)]
    pub anomaly: Option<String>,
    #[serde(default)]
    pub ansible_progress: Option<i64>,
    #[serde(default)]
    pub docked_ships: Option<i64>,
    #[serde(default)]
    pub ships: Option<Vec<DockedShip>>,
    #[serde(default)]
    pub allows_construction: Option<bool>,
}

impl Location {
    /// Euclidean distance between two locations.
    pub fn distance_to(&self, other: &Location) -> f64 {
        let dx = (other.x - self.x) as f64;
        let dy = (other.y - self.y) as f64;
        dx.hypot(dy)
    }
}

/// A ship docked at a location, as listed by the location endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockedShip {
    pub ship_id: String,
    pub username: String,
    pub ship_type: String,
}
