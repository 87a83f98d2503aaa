//! Loans

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Currency;

/// A loan offer, or a loan already taken (then `id`, `due`, `status` are set).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    #[serde(rename = "type")]
    pub loan_type: String,
    #[serde(default)]
    pub amount: Option<Currency>,
    #[serde(default)]
    pub collateral_required: Option<bool>,
    #[serde(default)]
    pub rate: Option<Currency>,
    #[serde(default)]
    pub term_in_days: Option<u32>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub due: Option<DateTime<Utc>>,
    #[serde(default)]
    pub repayment_amount: Option<Currency>,
    #[serde(default)]
    pub status: Option<String>,
}
