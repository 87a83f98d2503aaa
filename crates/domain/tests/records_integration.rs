//! Integration tests for game records and events
//!
//! Decodes payloads shaped like real API replies and checks the wire form of
//! events handed to consumers.

use spacetraders_domain::{
    Account, Event, FlightPlanEventKind, LoanEventKind, Location, Session, SystemFlightPlan,
};

// ============================================================================
// Records
// ============================================================================

#[test]
fn test_account_with_loans_and_ships() {
    let json = r#"{
        "username": "alice",
        "credits": 178875.5,
        "loans": [{
            "id": "ckon84fo20196vinzktlz6g3n",
            "due": "2021-05-11T03:38:49.413Z",
            "repaymentAmount": 280000,
            "status": "CURRENT",
            "type": "STARTUP"
        }],
        "ships": [{
            "id": "ckon84sbp0228vinzr1xrbz4d",
            "location": "OE-PM-TR",
            "x": -21,
            "y": -24,
            "cargo": [{ "good": "FUEL", "quantity": 20, "totalVolume": 20 }],
            "spaceAvailable": 30,
            "type": "JW-MK-I",
            "class": "MK-I",
            "maxCargo": 50,
            "speed": 1,
            "manufacturer": "Jackshaw",
            "plating": 5,
            "weapons": 5
        }]
    }"#;

    let account: Account = serde_json::from_str(json).unwrap();

    assert_eq!(account.credits, 178_875.5);
    assert_eq!(account.loans[0].repayment_amount, Some(280_000.0));
    assert_eq!(account.loans[0].status.as_deref(), Some("CURRENT"));
    assert!(account.loans[0].due.is_some());

    let ship = &account.ships[0];
    assert_eq!(ship.ship_type, "JW-MK-I");
    assert_eq!(ship.location.as_deref(), Some("OE-PM-TR"));
    assert_eq!(ship.cargo[0].quantity, 20);
    assert!(ship.cheapest_purchase().is_none());
}

#[test]
fn test_new_account_has_no_loans_or_ships() {
    let account: Account = serde_json::from_str(r#"{"username":"bob","credits":0}"#).unwrap();
    assert!(account.loans.is_empty());
    assert!(account.ships.is_empty());
}

#[test]
fn test_system_flight_plan() {
    let json = r#"{
        "arrivesAt": "2021-05-08T09:07:57.524Z",
        "createdAt": "2021-05-08T09:04:37.527Z",
        "departure": "OE-PM-TR",
        "destination": "OE-PM",
        "id": "ckoewu5l2003710ozkk9w0jp6",
        "shipId": "ckoew4ssh000008ozcdrm7u09",
        "shipType": "JW-MK-I",
        "username": "carol"
    }"#;

    let plan: SystemFlightPlan = serde_json::from_str(json).unwrap();
    assert_eq!(plan.ship_type, "JW-MK-I");
    assert!(plan.arrives_at > plan.created_at);
}

#[test]
fn test_distance_between_locations() {
    let location = |symbol: &str, x: i64, y: i64| -> Location {
        serde_json::from_value(serde_json::json!({
            "symbol": symbol, "type": "PLANET", "name": symbol, "x": x, "y": y,
        }))
        .unwrap()
    };

    let a = location("OE-PM", 0, 0);
    let b = location("OE-CR", 3, -4);
    assert_eq!(a.distance_to(&b), 5.0);
    assert_eq!(a.distance_to(&a), 0.0);
}

// ============================================================================
// Events
// ============================================================================

#[test]
fn test_events_are_tagged_by_name() {
    let account = Account {
        username: "alice".into(),
        credits: 200_000.0,
        loans: Vec::new(),
        ships: Vec::new(),
    };

    let value = serde_json::to_value(Event::loan(LoanEventKind::Purchased, account)).unwrap();
    assert_eq!(value["event"], "LOAN");
    assert_eq!(value["kind"], "PURCHASED");
    assert_eq!(value["account"]["username"], "alice");
}

#[test]
fn test_event_round_trips_through_json() {
    let event = Event::user_switched(Session::new("alice", "tok"));
    let json = serde_json::to_string(&event).unwrap();
    let back: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
    assert_eq!(back.name(), "USER_SWITCHED");
}

#[test]
fn test_flight_plan_event_kinds() {
    assert_eq!(serde_json::to_value(FlightPlanEventKind::Ended).unwrap(), "ENDED");
    assert_eq!(serde_json::to_value(FlightPlanEventKind::Created).unwrap(), "CREATED");
}

#[test]
fn test_session_debug_hides_token() {
    let rendered = format!("{:?}", Session::new("alice", "secret-token"));
    assert!(rendered.contains("alice"));
    assert!(!rendered.contains("secret-token"));
}
