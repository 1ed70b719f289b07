//! Ranging session setup for tracker tags.

use data_encoding::HEXLOWER;
use rand::RngCore;

use crate::buffer::BitPackedBuffer;
use crate::params::{HoppingMode, ProtocolVersion, RangingSessionParameters, ShortAddress};

/// Slot duration the tag firmware expects on the wire, in RSTU. Deliberately
/// different from the 2400 the parameter object keeps; the tag rejects
/// sessions encoded with the library value.
const SLOT_DURATION_FIRMWARE_RSTU: u16 = 2000;

/// Ranging-session configuration for one tag session.
///
/// Built from a single input, the preamble code index; everything else is
/// fixed policy matched to the tag firmware (responder/controlee, channel 9,
/// six slots per round, 240 ms interval, hopping enabled, static all-zero
/// STS IV) plus a random non-zero session id and a random peer short address.
///
/// The same value backs two consumers that must agree field-for-field: the
/// platform ranging API takes [`RangingSessionConfig::params`], the tag takes
/// the blob from [`RangingSessionConfig::bytes`]. The blob's field offsets,
/// widths and byte order were reversed from the vendor app and are a firmware
/// contract; any deviation and the tag rejects or misreads the session.
pub struct RangingSessionConfig {
    params: RangingSessionParameters,
}

impl RangingSessionConfig {
    /// Size of the configuration blob the tag accepts.
    pub const SIZE: usize = 35;

    /// Session with a fresh random session id and peer address.
    pub fn new(preamble_code_index: u8) -> Self {
        Self::with_rng(preamble_code_index, &mut rand::thread_rng())
    }

    /// Same as [`RangingSessionConfig::new`], drawing randomness from the
    /// caller's source.
    pub fn with_rng<R: RngCore>(preamble_code_index: u8, rng: &mut R) -> Self {
        let params = RangingSessionParameters {
            session_id: generate_session_id(rng),
            peer_address: ShortAddress::random(rng),
            preamble_code_index,
            protocol_version: ProtocolVersion::FIRA_1_1,
            ranging_interval_ms: 240,
            slots_per_ranging_round: 6,
            in_band_termination_attempt_count: 3,
            hopping_mode: HoppingMode::FiraEnable,
            ranging_result_report_message: false,
            ..RangingSessionParameters::default()
        };
        log::debug!(
            "ranging session {:#010x}: channel {}, preamble code {}, peer {}",
            params.session_id,
            params.channel as u8,
            preamble_code_index,
            params.peer_address,
        );
        Self { params }
    }

    /// Parameter object for the platform ranging API.
    pub fn params(&self) -> &RangingSessionParameters {
        &self.params
    }

    /// The 35-byte configuration blob written to the tag, with the local
    /// device's short address filled in. Deterministic for a fixed session id,
    /// peer address and preamble code index. Byte 0 is a reserved header;
    /// multi-byte fields are big-endian.
    pub fn bytes(&self, local_address: ShortAddress) -> Vec<u8> {
        let p = &self.params;
        let mut buf = BitPackedBuffer::new(Self::SIZE);
        buf.set_bits(8, 1, 1);
        buf.set_bits(9, 1, 1);
        buf.set_bits(10, 1, 1);
        buf.set_bits(11, 1, 1);
        buf.set_bits(12, p.ranging_round_usage as u8, 2);
        buf.set_bits(22, p.multi_node_mode as u8, 2);
        buf.set_bits(16, p.fcs_type as u8, 2);
        buf.set_bits(18, 3, 2);
        buf.set_bits(20, p.prf_mode as u8, 2);
        buf.set_bits(22, p.sts_config as u8, 1);
        buf.set_bits(23, p.key_rotation as u8, 1);
        buf.set_bits(24, p.mac_address_mode as u8, 2);
        buf.set_bits(26, p.rframe_config as u8, 2);
        buf.set_bits(28, p.preamble_duration as u8, 1);
        buf.set_bits(29, p.psdu_data_rate as u8, 1);
        buf.set_bits(30, p.sfd_id, 2);
        buf.set_bits(32, p.sts_segment_count, 2);
        buf.set_bits(34, p.hopping_mode as u8, 1);
        buf.set_bytes(40, &p.session_id.to_be_bytes());
        buf.set_short(72, p.peer_address.bytes());
        buf.set_short(88, local_address.bytes());
        buf.set_byte(104, p.channel as u8);
        buf.set_short(112, SLOT_DURATION_FIRMWARE_RSTU.to_be_bytes());
        buf.set_short(128, p.ranging_interval_ms.to_be_bytes());
        buf.set_byte(144, 3);
        buf.set_byte(152, p.preamble_code_index);
        buf.set_byte(160, 1);
        buf.set_byte(168, 5);
        buf.set_short(176, 0u16.to_be_bytes());
        buf.set_bytes(192, &p.static_sts_iv);
        buf.set_byte(240, p.slots_per_ranging_round);
        buf.set_bytes(248, &[0, 0, 0, 0]);
        buf.into_bytes()
    }

    /// The blob hex-encoded, ready for the ranging characteristic write.
    pub fn hex(&self, local_address: ShortAddress) -> String {
        HEXLOWER.encode(&self.bytes(local_address))
    }
}

/// Random 32-bit session id; zero is reserved, so redraw until non-zero.
fn generate_session_id<R: RngCore>(rng: &mut R) -> u32 {
    loop {
        let id = rng.next_u32();
        if id != 0 {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::params::UwbChannel;

    /// Hands out exactly the queued words, in order.
    struct ScriptedRng(Vec<u32>);

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            self.0.remove(0)
        }

        fn next_u64(&mut self) -> u64 {
            self.next_u32() as u64
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(4) {
                let word = self.next_u32().to_be_bytes();
                chunk.copy_from_slice(&word[..chunk.len()]);
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn fixed_config(preamble_code_index: u8) -> RangingSessionConfig {
        // session id 0x11223344, peer address 0xAABB
        let mut rng = ScriptedRng(vec![0x1122_3344, 0xAABB]);
        RangingSessionConfig::with_rng(preamble_code_index, &mut rng)
    }

    #[test]
    fn blob_matches_the_firmware_image() {
        let config = fixed_config(9);
        let blob = config.bytes(ShortAddress::from_u16(0xCCDD));
        #[rustfmt::skip]
        let expected = vec![
            0x00,
            0x2F, 0x0C, 0x9C, 0x05,
            0x11, 0x22, 0x33, 0x44,
            0xAA, 0xBB,
            0xCC, 0xDD,
            0x09,
            0x07, 0xD0,
            0x00, 0xF0,
            0x03,
            0x09,
            0x01,
            0x05,
            0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x06,
            0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(blob, expected);
    }

    #[test]
    fn blob_shape_for_preamble_nine() {
        let config = fixed_config(9);
        let blob = config.bytes(ShortAddress::from_u16(0x0102));
        assert_eq!(blob.len(), RangingSessionConfig::SIZE);
        assert_eq!(blob[0], 0);
        assert_eq!(blob[13], 9, "channel");
        assert_eq!(blob[19], 9, "preamble code index");
        assert_eq!(blob[30], 6, "slots per round");
        assert_eq!(&blob[14..16], &[0x07, 0xD0], "slot duration 2000");
    }

    #[test]
    fn blob_is_deterministic_for_fixed_inputs() {
        let local = ShortAddress::from_u16(0xBEEF);
        let config = fixed_config(11);
        assert_eq!(config.bytes(local), config.bytes(local));

        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(
            RangingSessionConfig::with_rng(11, &mut a).bytes(local),
            RangingSessionConfig::with_rng(11, &mut b).bytes(local),
        );
    }

    #[test]
    fn addresses_land_at_their_offsets() {
        let config = fixed_config(10);
        let blob = config.bytes(ShortAddress::from_u16(0xCCDD));
        assert_eq!(&blob[9..11], &[0xAA, 0xBB], "peer address at bit 72");
        assert_eq!(&blob[11..13], &[0xCC, 0xDD], "local address at bit 88");
    }

    #[test]
    fn session_id_skips_zero() {
        let mut rng = ScriptedRng(vec![0, 0, 7, 0x4455]);
        let config = RangingSessionConfig::with_rng(12, &mut rng);
        assert_eq!(config.params().session_id, 7);
        assert_eq!(config.params().peer_address, ShortAddress::from_u16(0x4455));
    }

    #[test]
    fn session_ids_are_never_zero() {
        let mut rng = StdRng::seed_from_u64(0x7A67);
        for _ in 0..1000 {
            assert_ne!(RangingSessionConfig::with_rng(9, &mut rng).params().session_id, 0);
        }
    }

    #[test]
    fn params_agree_with_the_blob_except_slot_duration() {
        let config = fixed_config(12);
        let params = config.params();
        let blob = config.bytes(ShortAddress::from_u16(1));

        assert_eq!(blob[13], params.channel as u8);
        assert_eq!(blob[19], params.preamble_code_index);
        assert_eq!(blob[30], params.slots_per_ranging_round);
        assert_eq!(
            u16::from_be_bytes([blob[16], blob[17]]),
            params.ranging_interval_ms
        );
        assert_eq!(&blob[5..9], &params.session_id.to_be_bytes());
        assert_eq!(&blob[24..30], &params.static_sts_iv);

        // The documented firmware deviation.
        assert_eq!(params.slot_duration_rstu, 2400);
        assert_eq!(u16::from_be_bytes([blob[14], blob[15]]), 2000);
    }

    #[test]
    fn tag_profile_overrides_the_library_defaults() {
        let config = fixed_config(10);
        let params = config.params();
        assert_eq!(params.ranging_interval_ms, 240);
        assert_eq!(params.slots_per_ranging_round, 6);
        assert_eq!(params.in_band_termination_attempt_count, 3);
        assert_eq!(params.hopping_mode, HoppingMode::FiraEnable);
        assert!(!params.ranging_result_report_message);
        assert_eq!(params.channel, UwbChannel::Channel9);
        assert_eq!(params.protocol_version, ProtocolVersion::FIRA_1_1);
    }

    #[test]
    fn hex_is_the_lowercase_blob() {
        let config = fixed_config(9);
        let local = ShortAddress::from_u16(0xCCDD);
        let hex = config.hex(local);
        assert_eq!(hex.len(), RangingSessionConfig::SIZE * 2);
        assert_eq!(
            hex,
            "002f0c9c0511223344aabbccdd0907d000f00309010500000000000000000600000000"
        );
    }
}
