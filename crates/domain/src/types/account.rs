//! Player account

use serde::{Deserialize, Serialize};

use super::{Currency, Loan, Ship};

/// Account snapshot returned by user and purchase endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub username: String,
    pub credits: Currency,
    #[serde(default)]
    pub loans: Vec<Loan>,
    #[serde(default)]
    pub ships: Vec<Ship>,
}
