//! Tag battery reporting.

use serde::{Deserialize, Serialize};

use crate::TokenError;

/// Battery level read from the battery characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BatteryLevel {
    #[serde(rename = "00")]
    VeryLow,
    #[serde(rename = "01")]
    Low,
    #[serde(rename = "02")]
    Medium,
    #[serde(rename = "03")]
    Full,
}

impl BatteryLevel {
    pub fn token(self) -> &'static str {
        match self {
            BatteryLevel::VeryLow => "00",
            BatteryLevel::Low => "01",
            BatteryLevel::Medium => "02",
            BatteryLevel::Full => "03",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "00" => Some(BatteryLevel::VeryLow),
            "01" => Some(BatteryLevel::Low),
            "02" => Some(BatteryLevel::Medium),
            "03" => Some(BatteryLevel::Full),
            _ => None,
        }
    }

    /// The 0-3 scale the cloud APIs exchange.
    pub fn level(self) -> u8 {
        match self {
            BatteryLevel::VeryLow => 0,
            BatteryLevel::Low => 1,
            BatteryLevel::Medium => 2,
            BatteryLevel::Full => 3,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(BatteryLevel::VeryLow),
            1 => Some(BatteryLevel::Low),
            2 => Some(BatteryLevel::Medium),
            3 => Some(BatteryLevel::Full),
            _ => None,
        }
    }
}

impl std::str::FromStr for BatteryLevel {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| TokenError::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_and_levels_agree() {
        for level in [
            BatteryLevel::VeryLow,
            BatteryLevel::Low,
            BatteryLevel::Medium,
            BatteryLevel::Full,
        ] {
            assert_eq!(BatteryLevel::from_token(level.token()), Some(level));
            assert_eq!(BatteryLevel::from_level(level.level()), Some(level));
        }
    }

    #[test]
    fn unknown_readings_are_none() {
        assert_eq!(BatteryLevel::from_token("04"), None);
        assert_eq!(BatteryLevel::from_level(9), None);
    }

    #[test]
    fn ordering_follows_charge() {
        assert!(BatteryLevel::VeryLow < BatteryLevel::Low);
        assert!(BatteryLevel::Medium < BatteryLevel::Full);
    }
}
