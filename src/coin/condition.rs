//! Grading conditions tracked for each coin
//!
//! A collector records the grade of the copy they own; the catalog keeps one
//! estimated value per grade.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// Uncirculated, taken from a bank roll ("fleur de coin")
    #[serde(rename = "FDC")]
    Fdc,

    /// Brilliant uncirculated, from a coin card or set
    #[serde(rename = "BU")]
    Bu,

    /// Proof ("belle épreuve")
    #[serde(rename = "BE")]
    Be,
}

impl Condition {
    pub const ALL: [Condition; 3] = [Condition::Fdc, Condition::Bu, Condition::Be];

    /// Converts this condition to its database/wire string
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Fdc => "FDC",
            Self::Bu => "BU",
            Self::Be => "BE",
        }
    }

    /// Parses a condition tag, ignoring case and surrounding whitespace
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fdc" => Some(Self::Fdc),
            "bu" => Some(Self::Bu),
            "be" => Some(Self::Be),
            _ => None,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_string())
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_string(s).ok_or_else(|| format!("Unknown condition '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_roundtrip() {
        for condition in Condition::ALL {
            let parsed = Condition::from_db_string(condition.to_db_string());
            assert_eq!(Some(condition), parsed);
        }
    }

    #[test]
    fn test_condition_is_case_insensitive() {
        assert_eq!(Condition::from_db_string("fdc"), Some(Condition::Fdc));
        assert_eq!(Condition::from_db_string(" Bu "), Some(Condition::Bu));
        assert_eq!("be".parse::<Condition>(), Ok(Condition::Be));
    }

    #[test]
    fn test_condition_invalid() {
        assert_eq!(Condition::from_db_string("mint"), None);
        assert!("".parse::<Condition>().is_err());
    }

    #[test]
    fn test_condition_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Condition::Fdc).unwrap(), "\"FDC\"");
        let parsed: Condition = serde_json::from_str("\"BE\"").unwrap();
        assert_eq!(parsed, Condition::Be);
    }
}
