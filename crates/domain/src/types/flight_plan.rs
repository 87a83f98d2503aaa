//! Flight plans
//!
//! A flight plan is the long-running remote operation tracked by the client:
//! it completes on its own once `arrives_at` has passed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A flight plan owned by the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightPlan {
    pub id: String,
    #[serde(rename = "ship")]
    pub ship_id: String,
    pub departure: String,
    pub destination: String,
    pub arrives_at: DateTime<Utc>,
    #[serde(default)]
    pub terminated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub distance: i64,
    #[serde(default)]
    pub fuel_consumed: i64,
    #[serde(default)]
    pub fuel_remaining: i64,
    #[serde(default)]
    pub time_remaining_in_seconds: i64,
}

impl FlightPlan {
    /// True once the arrival time is now or in the past.
    pub fn has_arrived(&self, now: DateTime<Utc>) -> bool {
        now >= self.arrives_at
    }
}

/// Public view of a flight plan inside a system (any player).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemFlightPlan {
    pub id: String,
    pub ship_id: String,
    pub ship_type: String,
    pub username: String,
    pub departure: String,
    pub destination: String,
    pub created_at: DateTime<Utc>,
    pub arrives_at: DateTime<Utc>,
}
