//! Unsolicited tag status notifications.
//!
//! The ring and button characteristics notify with one-byte tokens. The same
//! token value means different events depending on which characteristic
//! fired, so decoding is per-characteristic.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagStatusEvent {
    RingStart,
    RingStop,
    ButtonClick,
    ButtonLongClick,
    ButtonDoubleClick,
}

impl TagStatusEvent {
    /// Decode a notification from the ring characteristic.
    pub fn from_ring_token(token: &str) -> Option<Self> {
        match token {
            "01" => Some(TagStatusEvent::RingStart),
            "00" => Some(TagStatusEvent::RingStop),
            _ => None,
        }
    }

    /// Decode a notification from the button characteristic.
    pub fn from_button_token(token: &str) -> Option<Self> {
        match token {
            "01" => Some(TagStatusEvent::ButtonClick),
            "02" => Some(TagStatusEvent::ButtonLongClick),
            "03" => Some(TagStatusEvent::ButtonDoubleClick),
            _ => None,
        }
    }

    pub fn is_ring_stop(self) -> bool {
        matches!(self, TagStatusEvent::RingStop)
    }
}
