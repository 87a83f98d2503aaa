//! Game records exchanged with the remote API
//!
//! Field names follow the wire format (camelCase JSON). Every record derives
//! both `Serialize` and `Deserialize` so that strict decoding can compare a
//! payload against the shape it was decoded into.

pub mod account;
pub mod flight_plan;
pub mod kinds;
pub mod loan;
pub mod location;
pub mod market;
pub mod order;
pub mod ship;
pub mod system;

pub use account::Account;
pub use flight_plan::{FlightPlan, SystemFlightPlan};
pub use kinds::{LoanType, LocationKind, ShipClass};
pub use loan::Loan;
pub use location::{DockedShip, Location};
pub use market::{Market, MarketGood, MarketLocation};
pub use order::{Order, ShipOrder};
pub use ship::{Cargo, PurchaseLocation, Ship};
pub use system::System;

/// Monetary amounts (credits).
pub type Currency = f64;

/// Ship performance modifiers.
pub type Modifier = f64;
