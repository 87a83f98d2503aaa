//! End-to-end game flow against a mocked API
//!
//! register → take loan → list ships → buy the cheapest → buy fuel →
//! create a flight plan, then wait for the tracker to report its arrival.

mod support;

use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use spacetraders_domain::{
    Event, FlightPlanEvent, FlightPlanEventKind, LoanEvent, LoanEventKind, Location,
    ShipOrderEvent, ShipOrderKind,
};
use spacetraders_infra::SpaceTrader;
use support::{account_json, flight_plan_json, listed_ship, owned_ship, trader, unique_username};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_game(server: &MockServer, username: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/users/{username}/token")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": "tok-1",
            "user": account_json(username, 0.0, json!([]), json!([])),
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/users/{username}/loans")))
        .and(header("authorization", "Bearer tok-1"))
        .and(body_json(json!({ "type": "STARTUP" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "user": account_json(
                username,
                200_000.0,
                json!([{
                    "id": "loan-1",
                    "type": "STARTUP",
                    "due": "2021-06-01T00:00:00.000Z",
                    "repaymentAmount": 280_000,
                    "status": "CURRENT",
                }]),
                json!([]),
            ),
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/game/ships"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ships": [
                listed_ship("GR-MK-II", "MK-II", &[("OE-PM-TR", 42_000.0)]),
                listed_ship("JW-MK-I", "MK-I", &[("OE-PM-TR", 21_125.0), ("OE-UC", 20_000.0)]),
            ],
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/users/{username}/ships")))
        .and(body_json(json!({ "location": "OE-UC", "type": "JW-MK-I" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "user": account_json(
                username,
                180_000.0,
                json!([]),
                json!([owned_ship("ship-1", "JW-MK-I", "OE-UC", json!([]))]),
            ),
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/users/{username}/purchase-orders")))
        .and(body_json(json!({ "shipId": "ship-1", "good": "FUEL", "quantity": 20 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "credits": 179_940,
            "order": [{ "good": "FUEL", "pricePerUnit": 3, "quantity": 20, "total": 60 }],
            "ship": owned_ship(
                "ship-1",
                "JW-MK-I",
                "OE-UC",
                json!([{ "good": "FUEL", "quantity": 20, "totalVolume": 20 }]),
            ),
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_flight_is_tracked_until_arrival() {
    let server = MockServer::start().await;
    let username = unique_username();
    mount_game(&server, &username).await;

    let arrives_at = Utc::now() + chrono::Duration::milliseconds(600);
    Mock::given(method("POST"))
        .and(path(format!("/users/{username}/flight-plans")))
        .and(body_json(json!({ "shipId": "ship-1", "destination": "OE-PM" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "flightPlan": flight_plan_json("fp-1", "ship-1", arrives_at, false),
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/users/{username}/flight-plans/fp-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "flightPlan": flight_plan_json("fp-1", "ship-1", arrives_at, true),
        })))
        .mount(&server)
        .await;

    let client = trader(&server);
    let events = client.events();

    let session = client.register_user(&username).await.unwrap();
    assert_eq!(session.username(), username);
    assert_eq!(session.token(), "tok-1");

    let account = client.take_loan(&session, " startup\r\n").await.unwrap();
    assert_eq!(account.credits, 200_000.0);

    let ships = client.available_ships(&session, None).await.unwrap();
    let (ship, cheapest) = ships
        .iter()
        .filter_map(|ship| ship.cheapest_purchase().map(|loc| (ship, loc)))
        .min_by(|a, b| a.1.price.total_cmp(&b.1.price))
        .unwrap();
    assert_eq!(cheapest.location, "OE-UC");

    let account = client.buy_ship(&session, &cheapest.location, &ship.ship_type).await.unwrap();
    let ship_id = account.ships[0].id.clone().unwrap();

    let order = client.buy_good(&session, &ship_id, "FUEL", 20).await.unwrap();
    assert_eq!(order.orders[0].quantity, 20);

    let plan = client.create_flight_plan(&session, &ship_id, "OE-PM").await.unwrap();
    assert_eq!(plan.id, "fp-1");
    assert!(client.is_tracking("fp-1"));
    assert_eq!(client.tracked_flight_plans(), vec!["fp-1".to_string()]);

    let names: Vec<&str> = events.drain().iter().map(Event::name).collect();
    assert_eq!(
        names,
        ["USER_REGISTERED", "LOAN", "SHIP_PURCHASED", "SHIP_ORDER", "FLIGHT_PLAN"]
    );

    let ended = tokio::time::timeout(Duration::from_secs(5), events.recv()).await.unwrap();
    match ended {
        Event::FlightPlan(FlightPlanEvent { kind, plan, .. }) => {
            assert_eq!(kind, FlightPlanEventKind::Ended);
            assert_eq!(plan.id, "fp-1");
            assert!(plan.terminated_at.is_some());
        }
        other => panic!("expected flight plan event, got {other:?}"),
    }
    assert!(!client.is_tracking("fp-1"));
    assert!(client.tracked_flight_plans().is_empty());

    client.shutdown().await;
}

#[tokio::test]
async fn events_carry_typed_payloads() {
    let server = MockServer::start().await;
    let username = unique_username();
    mount_game(&server, &username).await;

    let client = trader(&server);
    let events = client.events();
    let session = client.register_user(&username).await.unwrap();
    client.take_loan(&session, "STARTUP").await.unwrap();
    let ships = client.available_ships(&session, None).await.unwrap();
    client.buy_ship(&session, "OE-UC", &ships[1].ship_type.to_lowercase()).await.unwrap();
    client.buy_good(&session, "ship-1", "FUEL", 20).await.unwrap();

    Mock::given(method("POST"))
        .and(path(format!("/users/{username}/sell-orders")))
        .and(body_json(json!({ "shipId": "ship-1", "good": "FUEL", "quantity": 5 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "credits": 179_950,
            "order": [{ "good": "FUEL", "pricePerUnit": 2, "quantity": 5, "total": 10 }],
            "ship": owned_ship(
                "ship-1",
                "JW-MK-I",
                "OE-UC",
                json!([{ "good": "FUEL", "quantity": 15, "totalVolume": 15 }]),
            ),
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/users/{username}/loans/loan-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": account_json(&username, 0.0, json!([]), json!([])),
        })))
        .expect(1)
        .mount(&server)
        .await;
    let sold = client.sell_good(&session, "ship-1", "FUEL", 5).await.unwrap();
    assert_eq!(sold.orders[0].total_price, 10.0);
    let repaid = client.pay_loan(&session, "loan-1").await.unwrap();
    assert!(repaid.loans.is_empty());

    let drained = events.drain();
    assert_eq!(drained.len(), 6);
    assert!(matches!(
        &drained[1],
        Event::Loan(LoanEvent { kind: LoanEventKind::Purchased, account, .. })
            if account.credits == 200_000.0
    ));
    assert!(matches!(
        &drained[3],
        Event::ShipOrder(ShipOrderEvent { kind: ShipOrderKind::Buy, order, .. })
            if order.credits == 179_940.0
    ));
    assert!(matches!(
        &drained[4],
        Event::ShipOrder(ShipOrderEvent { kind: ShipOrderKind::Sell, .. })
    ));
    assert!(matches!(&drained[5], Event::Loan(LoanEvent { kind: LoanEventKind::Paid, .. })));

    client.shutdown().await;
}

#[tokio::test]
async fn switch_user_only_emits_an_event() {
    let server = MockServer::start().await;
    let client = trader(&server);
    let events = client.events();

    let session = client.switch_user("tok-9", "bob").unwrap();
    assert_eq!(session.username(), "bob");
    assert_eq!(events.try_recv().map(|e| e.name()), Some("USER_SWITCHED"));
    assert!(server.received_requests().await.unwrap().is_empty());

    let a: Location =
        serde_json::from_value(json!({ "symbol": "A", "type": "PLANET", "name": "A", "x": 0, "y": 0 }))
            .unwrap();
    let b: Location =
        serde_json::from_value(json!({ "symbol": "B", "type": "MOON", "name": "B", "x": 3, "y": 4 }))
            .unwrap();
    assert_eq!(SpaceTrader::distance(&a, &b), 5.0);

    client.shutdown().await;
}
