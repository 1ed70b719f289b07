//! Ring and button volume levels.

use serde::{Deserialize, Serialize};

use crate::TokenError;

/// Ring volume as reported and accepted by the audio volume characteristic.
///
/// Ordered `Low < High` with no wraparound: stepping past either end yields
/// `None`, which is how callers know a volume button should be disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VolumeLevel {
    #[serde(rename = "01")]
    Low,
    #[serde(rename = "02")]
    High,
}

impl VolumeLevel {
    /// Token written to the audio volume characteristic.
    pub fn token(self) -> &'static str {
        match self {
            VolumeLevel::Low => "01",
            VolumeLevel::High => "02",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "01" => Some(VolumeLevel::Low),
            "02" => Some(VolumeLevel::High),
            _ => None,
        }
    }

    /// The next louder level, `None` at the top.
    pub fn next(self) -> Option<Self> {
        match self {
            VolumeLevel::Low => Some(VolumeLevel::High),
            VolumeLevel::High => None,
        }
    }

    /// The next quieter level, `None` at the bottom.
    pub fn previous(self) -> Option<Self> {
        match self {
            VolumeLevel::High => Some(VolumeLevel::Low),
            VolumeLevel::Low => None,
        }
    }
}

impl std::str::FromStr for VolumeLevel {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| TokenError::new(s))
    }
}

/// Volume of the tag's button-press chirp. Unknown tokens read as `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ButtonVolumeLevel {
    #[serde(rename = "00")]
    Muted,
    #[serde(rename = "01")]
    Low,
    #[serde(rename = "02")]
    High,
}

impl ButtonVolumeLevel {
    pub fn token(self) -> &'static str {
        match self {
            ButtonVolumeLevel::Muted => "00",
            ButtonVolumeLevel::Low => "01",
            ButtonVolumeLevel::High => "02",
        }
    }

    pub fn from_token(token: &str) -> Self {
        match token {
            "00" => ButtonVolumeLevel::Muted,
            "02" => ButtonVolumeLevel::High,
            _ => ButtonVolumeLevel::Low,
        }
    }
}
