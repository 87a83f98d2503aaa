//! Star systems

use serde::{Deserialize, Serialize};

use super::Location;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct System {
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub locations: Vec<Location>,
}
