//! Tracker tag protocol vocabulary
//!
//! Constants and small model types shared by everything that talks to a tag:
//! the GATT service table with its characteristic command tokens, and the
//! enums for ring volume, battery, status notifications and link state.

pub mod gatt;

mod battery;
mod connection;
mod status;
mod volume;

pub use battery::BatteryLevel;
pub use connection::ConnectionState;
pub use status::TagStatusEvent;
pub use volume::{ButtonVolumeLevel, VolumeLevel};

/// A characteristic token that does not decode to a known value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized characteristic token {token:?}")]
pub struct TokenError {
    pub token: String,
}

impl TokenError {
    pub(crate) fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
        }
    }
}
