//! Client events
//!
//! Every state-changing operation emits one [`Event`] onto the client's event
//! stream. Events are immutable snapshots of the record that changed plus the
//! time they were created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    EVENT_FLIGHT_PLAN, EVENT_LOAN, EVENT_SHIP_ORDER, EVENT_SHIP_PURCHASED, EVENT_USER_REGISTERED,
    EVENT_USER_SWITCHED,
};
use crate::session::Session;
use crate::types::{Account, FlightPlan, ShipOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightPlanEventKind {
    Created,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanEventKind {
    Purchased,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipOrderKind {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightPlanEvent {
    pub kind: FlightPlanEventKind,
    pub plan: FlightPlan,
    pub created_at: DateTime<Utc>,
}

/// Loan taken or repaid; carries the account as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanEvent {
    pub kind: LoanEventKind,
    pub account: Account,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipOrderEvent {
    pub kind: ShipOrderKind,
    pub order: ShipOrder,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipPurchasedEvent {
    pub account: Account,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRegisteredEvent {
    pub session: Session,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSwitchedEvent {
    pub session: Session,
    pub created_at: DateTime<Utc>,
}

/// Closed set of events emitted by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    FlightPlan(FlightPlanEvent),
    Loan(LoanEvent),
    ShipOrder(ShipOrderEvent),
    ShipPurchased(ShipPurchasedEvent),
    UserRegistered(UserRegisteredEvent),
    UserSwitched(UserSwitchedEvent),
}

impl Event {
    pub fn flight_plan(kind: FlightPlanEventKind, plan: FlightPlan) -> Self {
        Self::FlightPlan(FlightPlanEvent { kind, plan, created_at: Utc::now() })
    }

    pub fn loan(kind: LoanEventKind, account: Account) -> Self {
        Self::Loan(LoanEvent { kind, account, created_at: Utc::now() })
    }

    pub fn ship_order(kind: ShipOrderKind, order: ShipOrder) -> Self {
        Self::ShipOrder(ShipOrderEvent { kind, order, created_at: Utc::now() })
    }

    pub fn ship_purchased(account: Account) -> Self {
        Self::ShipPurchased(ShipPurchasedEvent { account, created_at: Utc::now() })
    }

    pub fn user_registered(session: Session) -> Self {
        Self::UserRegistered(UserRegisteredEvent { session, created_at: Utc::now() })
    }

    pub fn user_switched(session: Session) -> Self {
        Self::UserSwitched(UserSwitchedEvent { session, created_at: Utc::now() })
    }

    /// Stable event name, e.g. `FLIGHT_PLAN`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FlightPlan(_) => EVENT_FLIGHT_PLAN,
            Self::Loan(_) => EVENT_LOAN,
            Self::ShipOrder(_) => EVENT_SHIP_ORDER,
            Self::ShipPurchased(_) => EVENT_SHIP_PURCHASED,
            Self::UserRegistered(_) => EVENT_USER_REGISTERED,
            Self::UserSwitched(_) => EVENT_USER_SWITCHED,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::FlightPlan(e) => e.created_at,
            Self::Loan(e) => e.created_at,
            Self::ShipOrder(e) => e.created_at,
            Self::ShipPurchased(e) => e.created_at,
            Self::UserRegistered(e) => e.created_at,
            Self::UserSwitched(e) => e.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let session = Session::new("alice", "t");
        assert_eq!(Event::user_registered(session.clone()).name(), "USER_REGISTERED");
        assert_eq!(Event::user_switched(session).name(), "USER_SWITCHED");
    }

    #[test]
    fn test_created_at_is_stamped_on_construction() {
        let before = Utc::now();
        let event = Event::user_switched(Session::new("bob", "t"));
        let after = Utc::now();
        assert!(event.created_at() >= before && event.created_at() <= after);
    }
}
