//! GATT service protocol constants for tracker tags
//!
//! This module defines the tag control service, its characteristic UUIDs and
//! the command tokens written to them. Characteristic payloads are short hex
//! tokens rather than raw bytes, so helpers for both directions live here.

use data_encoding::{HEXLOWER, HEXLOWER_PERMISSIVE};

/// Tag control service UUID
pub const SERVICE_UUID: &str = "0000FD5A-0000-1000-8000-00805F9B34FB";

/// Ring Characteristic UUID (write on/off, notifies unsolicited stops)
pub const RING_UUID: &str = "DEE30001-182D-5496-B1AD-14F216324184";

/// Audio Volume Characteristic UUID (read current ring volume, write new)
pub const AUDIO_VOLUME_UUID: &str = "DEE30002-182D-5496-B1AD-14F216324184";

/// Button Characteristic UUID (write press/hold config, notifies clicks)
pub const BUTTON_UUID: &str = "DEE30003-182D-5496-B1AD-14F216324184";

/// Battery Characteristic UUID (read)
pub const BATTERY_UUID: &str = "DEE30004-182D-5496-B1AD-14F216324184";

/// E2E Encryption Characteristic UUID (read/write)
pub const E2E_UUID: &str = "DEE30007-182D-5496-B1AD-14F216324184";

/// UWB Enable Characteristic UUID (write on/off)
pub const UWB_UUID: &str = "DEE30008-182D-5496-B1AD-14F216324184";

/// UWB Ranging Config Characteristic UUID (write, hex-encoded session blob)
pub const UWB_RANGING_UUID: &str = "DEE30009-182D-5496-B1AD-14F216324184";

/// Lost Mode URL Characteristic UUID (read/write)
pub const LOST_URL_UUID: &str = "DEE3001B-182D-5496-B1AD-14F216324184";

/// Button Volume Characteristic UUID (read/write)
pub const BUTTON_VOLUME_UUID: &str = "DEE3001F-182D-5496-B1AD-14F216324184";

/// How long the transport waits on one characteristic exchange before
/// giving up.
pub const COMMAND_TIMEOUT_MS: u64 = 10_000;

/// Characteristic command tokens
pub mod commands {
    /// Enable - starts a ring, enables ranging, turns a feature on
    pub const ON: &str = "01";

    /// Disable - stops a ring, disables ranging, turns a feature off
    pub const OFF: &str = "00";
}

/// Encode a payload as the lowercase hex token a characteristic expects.
pub fn encode_token(bytes: &[u8]) -> String {
    HEXLOWER.encode(bytes)
}

/// Decode a characteristic token back into raw bytes. Case-insensitive.
pub fn decode_token(token: &str) -> Option<Vec<u8>> {
    HEXLOWER_PERMISSIVE.decode(token.as_bytes()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip() {
        assert_eq!(encode_token(&[0x01]), "01");
        assert_eq!(encode_token(&[0xde, 0xe3, 0x00, 0x01]), "dee30001");
        assert_eq!(decode_token("01"), Some(vec![0x01]));
        assert_eq!(decode_token(commands::OFF), Some(vec![0x00]));
    }

    #[test]
    fn decode_accepts_either_case() {
        assert_eq!(decode_token("DEE3"), Some(vec![0xde, 0xe3]));
        assert_eq!(decode_token("dee3"), Some(vec![0xde, 0xe3]));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert_eq!(decode_token("zz"), None);
        assert_eq!(decode_token("0"), None);
    }

    #[test]
    fn characteristics_share_the_tag_base() {
        for uuid in [
            RING_UUID,
            AUDIO_VOLUME_UUID,
            BUTTON_UUID,
            BATTERY_UUID,
            E2E_UUID,
            UWB_UUID,
            UWB_RANGING_UUID,
            LOST_URL_UUID,
            BUTTON_VOLUME_UUID,
        ] {
            assert!(uuid.starts_with("DEE3"));
            assert!(uuid.ends_with("-182D-5496-B1AD-14F216324184"));
        }
    }
}
