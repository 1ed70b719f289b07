//! Link state of a tag as seen by the local radio.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    Disconnected,
    Scanned,
    Connected,
}

impl ConnectionState {
    /// Whether commands can go over the local link right now. A tag that has
    /// merely been scanned is visible but not commandable.
    pub fn is_connected(self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}
