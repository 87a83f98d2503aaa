//! Marketplaces

use serde::{Deserialize, Serialize};

use super::{Currency, Location};

/// One good listed on a marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketGood {
    pub symbol: String,
    pub price_per_unit: Currency,
    pub volume_per_unit: i64,
    #[serde(default)]
    pub available: i64,
    #[serde(default)]
    pub quantity_available: i64,
    #[serde(default)]
    pub purchase_price_per_unit: Option<Currency>,
    #[serde(default)]
    pub sell_price_per_unit: Option<Currency>,
    #[serde(default)]
    pub spread: Option<Currency>,
}

/// A location's marketplace listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Market {
    #[serde(rename = "marketplace", default)]
    pub goods: Vec<MarketGood>,
}

/// Location payload returned by the marketplace endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketLocation {
    #[serde(flatten)]
    pub location: Location,
    #[serde(flatten)]
    pub market: Market,
}
