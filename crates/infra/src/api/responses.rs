//! Envelopes wrapping the records returned by each endpoint
//!
//! The remote service nests every payload under a single key (`user`,
//! `ships`, `flightPlan`, ...). Trade orders are the exception and decode
//! directly into [`spacetraders_domain::ShipOrder`].

use serde::{Deserialize, Serialize};
use spacetraders_domain::{
    Account, FlightPlan, Loan, Location, MarketLocation, Ship, System, SystemFlightPlan,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEnvelope {
    pub status: String,
}

/// Reply to a registration request.
///
/// Both fields are optional so that a reply without a token can be reported
/// as an error instead of a decode failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationEnvelope {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<Account>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: Account,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoansEnvelope {
    pub loans: Vec<Loan>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipsEnvelope {
    pub ships: Vec<Ship>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetEnvelope {
    pub planet: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEnvelope {
    pub planet: MarketLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationsEnvelope {
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemsEnvelope {
    pub systems: Vec<System>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightPlanEnvelope {
    pub flight_plan: FlightPlan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightPlansEnvelope {
    pub flight_plans: Vec<SystemFlightPlan>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_without_token_still_decodes() {
        let reply: RegistrationEnvelope = serde_json::from_str("{}").unwrap();
        assert!(reply.token.is_none());
        assert!(reply.user.is_none());
    }

    #[test]
    fn flight_plan_envelope_uses_camel_case_key() {
        let json = r#"{"flightPlan":{"id":"fp","ship":"s","departure":"A","destination":"B",
            "arrivesAt":"2021-05-01T10:00:00Z"}}"#;
        let envelope: FlightPlanEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.flight_plan.id, "fp");
    }
}
