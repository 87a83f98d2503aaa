//! Shared fixtures for infra integration tests.

#![allow(dead_code)]

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use spacetraders_domain::{ClientConfig, RetryPolicyConfig, TrackerConfig};
use spacetraders_infra::SpaceTrader;
use uuid::Uuid;
use wiremock::MockServer;

/// Config pointed at `server` with millisecond-scale backoff and polling.
pub fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(server.uri())
        .with_retry(RetryPolicyConfig {
            attempts: 4,
            initial_wait: Duration::from_millis(10),
            max_wait: Duration::from_millis(400),
            multiplier: 2.5,
        })
        .with_tracker(TrackerConfig {
            poll_interval: Duration::from_millis(25),
            join_timeout: Duration::from_secs(2),
        })
}

pub fn trader(server: &MockServer) -> SpaceTrader {
    SpaceTrader::new(test_config(server)).expect("client should build")
}

pub fn unique_username() -> String {
    format!("it-{}", Uuid::new_v4().simple())
}

pub fn account_json(username: &str, credits: f64, loans: Value, ships: Value) -> Value {
    json!({ "username": username, "credits": credits, "loans": loans, "ships": ships })
}

pub fn listed_ship(ship_type: &str, class: &str, locations: &[(&str, f64)]) -> Value {
    let purchase_locations: Vec<Value> = locations
        .iter()
        .map(|(location, price)| json!({ "system": "OE", "location": location, "price": price }))
        .collect();
    json!({
        "type": ship_type,
        "class": class,
        "manufacturer": "Jackshaw",
        "maxCargo": 50,
        "speed": 1,
        "plating": 5,
        "weapons": 5,
        "purchaseLocations": purchase_locations,
    })
}

pub fn owned_ship(id: &str, ship_type: &str, location: &str, cargo: Value) -> Value {
    json!({
        "id": id,
        "type": ship_type,
        "class": "MK-I",
        "manufacturer": "Jackshaw",
        "location": location,
        "maxCargo": 50,
        "speed": 1,
        "plating": 5,
        "weapons": 5,
        "cargo": cargo,
        "spaceAvailable": 30,
    })
}

pub fn flight_plan_json(
    id: &str,
    ship_id: &str,
    arrives_at: DateTime<Utc>,
    terminated: bool,
) -> Value {
    let terminated_at =
        if terminated { Value::String(Utc::now().to_rfc3339()) } else { Value::Null };
    json!({
        "id": id,
        "ship": ship_id,
        "departure": "OE-UC",
        "destination": "OE-PM",
        "arrivesAt": arrives_at.to_rfc3339(),
        "terminatedAt": terminated_at,
        "distance": 2,
        "fuelConsumed": 2,
        "fuelRemaining": 18,
        "timeRemainingInSeconds": 0,
    })
}
