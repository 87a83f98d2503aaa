//! Closed vocabularies accepted by the remote API
//!
//! Parsing trims surrounding whitespace and ignores case, so user input such
//! as `" startup\r\n"` is accepted. Unknown values are rejected with
//! [`SpaceTradersError::Validation`] before any request is sent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SpaceTradersError;

fn normalize(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}

/// Loan products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanType {
    Startup,
    Enterprise,
}

impl LoanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Startup => "STARTUP",
            Self::Enterprise => "ENTERPRISE",
        }
    }
}

impl FromStr for LoanType {
    type Err = SpaceTradersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "STARTUP" => Ok(Self::Startup),
            "ENTERPRISE" => Ok(Self::Enterprise),
            _ => Err(SpaceTradersError::Validation(format!("invalid loan type: {}", s.trim()))),
        }
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ship classes used to filter the shipyard listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipClass {
    #[serde(rename = "MK-I")]
    MkI,
    #[serde(rename = "MK-II")]
    MkII,
    #[serde(rename = "MK-III")]
    MkIII,
}

impl ShipClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MkI => "MK-I",
            Self::MkII => "MK-II",
            Self::MkIII => "MK-III",
        }
    }

    /// Case-insensitive comparison against a ship's `class` field.
    pub fn matches(&self, class: &str) -> bool {
        class.trim().eq_ignore_ascii_case(self.as_str())
    }
}

impl FromStr for ShipClass {
    type Err = SpaceTradersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "MK-I" => Ok(Self::MkI),
            "MK-II" => Ok(Self::MkII),
            "MK-III" => Ok(Self::MkIII),
            other => Err(SpaceTradersError::Validation(format!("invalid class: {other}"))),
        }
    }
}

impl fmt::Display for ShipClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location types used by system searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationKind {
    Planet,
    Moon,
    GasGiant,
    Asteroid,
    Wormhole,
}

impl LocationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planet => "PLANET",
            Self::Moon => "MOON",
            Self::GasGiant => "GAS_GIANT",
            Self::Asteroid => "ASTEROID",
            Self::Wormhole => "WORMHOLE",
        }
    }
}

impl FromStr for LocationKind {
    type Err = SpaceTradersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "PLANET" => Ok(Self::Planet),
            "MOON" => Ok(Self::Moon),
            "GAS_GIANT" => Ok(Self::GasGiant),
            "ASTEROID" => Ok(Self::Asteroid),
            "WORMHOLE" => Ok(Self::Wormhole),
            other => Err(SpaceTradersError::Validation(format!("invalid location type: {other}"))),
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loan_type_parsing_is_lenient() {
        assert_eq!("startup".parse::<LoanType>().unwrap(), LoanType::Startup);
        assert_eq!(" Enterprise\r\n".parse::<LoanType>().unwrap(), LoanType::Enterprise);
    }

    #[test]
    fn test_loan_type_rejects_unknown() {
        let err = "payday".parse::<LoanType>().unwrap_err();
        assert_eq!(err, SpaceTradersError::Validation("invalid loan type: payday".into()));
    }

    #[test]
    fn test_ship_class_parsing() {
        assert_eq!("mk-ii".parse::<ShipClass>().unwrap(), ShipClass::MkII);
        assert_eq!("MK-III\n".parse::<ShipClass>().unwrap(), ShipClass::MkIII);
        assert!("MK-IV".parse::<ShipClass>().is_err());
        assert!(ShipClass::MkI.matches("mk-i"));
        assert!(!ShipClass::MkI.matches("MK-II"));
    }

    #[test]
    fn test_location_kind_round_trips_wire_name() {
        let kind: LocationKind = serde_json::from_str("\"GAS_GIANT\"").unwrap();
        assert_eq!(kind, LocationKind::GasGiant);
        assert_eq!(kind.to_string(), "GAS_GIANT");
    }
}
