//! FiRa session parameter model.
//!
//! The enums carry the protocol's own discriminants so encoding a field is a
//! plain `as u8` cast. Defaults mirror the platform ranging library's
//! builder; fields the library marks required default to the values a tag
//! session uses (controlee/responder, unicast).

use std::fmt;

use rand::RngCore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DeviceType {
    Controlee = 0,
    Controller = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DeviceRole {
    Responder = 0,
    Initiator = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RangingRoundUsage {
    SsTwrDeferred = 1,
    DsTwrDeferred = 2,
    SsTwrNonDeferred = 3,
    DsTwrNonDeferred = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MacFcsType {
    Crc16 = 0,
    Crc32 = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PrfMode {
    Bprf = 0,
    Hprf = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MultiNodeMode {
    Unicast = 0,
    OneToMany = 1,
    ManyToMany = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StsConfig {
    Static = 0,
    Dynamic = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MacAddressMode {
    TwoBytes = 0,
    EightBytes = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RframeConfig {
    Sp0 = 0,
    Sp1 = 1,
    Sp3 = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PreambleDuration {
    T32Symbols = 0,
    T64Symbols = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PsduDataRate {
    Rate6m81 = 0,
    Rate7m80 = 1,
    Rate27m2 = 2,
    Rate31m2 = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AoaResultRequest {
    NoAoaReport = 0,
    ReqAoaResults = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HoppingMode {
    Disable = 0,
    FiraEnable = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UwbChannel {
    Channel5 = 5,
    Channel9 = 9,
}

/// FiRa protocol version advertised in the session parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolVersion {
    pub major: u8,
    pub minor: u8,
}

impl ProtocolVersion {
    /// The version tag firmware speaks.
    pub const FIRA_1_1: Self = Self { major: 1, minor: 1 };
}

/// Preamble code indices legal for BPRF sessions; tags range only on these.
pub const BPRF_PREAMBLE_CODES: [u8; 4] = [9, 10, 11, 12];

/// Pick a preamble code for a new session.
pub fn random_bprf_preamble_code<R: RngCore>(rng: &mut R) -> u8 {
    BPRF_PREAMBLE_CODES[rng.next_u32() as usize % BPRF_PREAMBLE_CODES.len()]
}

/// 16-bit UWB MAC short address, stored as its big-endian wire bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShortAddress([u8; 2]);

impl ShortAddress {
    pub const fn new(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }

    pub const fn from_u16(value: u16) -> Self {
        Self(value.to_be_bytes())
    }

    /// Draw a fresh address for a new session.
    pub fn random<R: RngCore>(rng: &mut R) -> Self {
        Self::from_u16((rng.next_u32() & 0xFFFF) as u16)
    }

    pub const fn to_u16(self) -> u16 {
        u16::from_be_bytes(self.0)
    }

    pub const fn bytes(self) -> [u8; 2] {
        self.0
    }
}

impl From<u16> for ShortAddress {
    fn from(value: u16) -> Self {
        Self::from_u16(value)
    }
}

impl fmt::Display for ShortAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.to_u16())
    }
}

/// Parameters for one ranging session.
///
/// Immutable once built; consumed twice, once as the platform ranging API's
/// configuration and once serialized into the tag's binary blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangingSessionParameters {
    pub device_type: DeviceType,
    pub device_role: DeviceRole,
    pub protocol_version: ProtocolVersion,
    pub session_id: u32,
    pub channel: UwbChannel,
    pub preamble_code_index: u8,
    pub ranging_round_usage: RangingRoundUsage,
    pub multi_node_mode: MultiNodeMode,
    pub fcs_type: MacFcsType,
    pub prf_mode: PrfMode,
    pub sts_config: StsConfig,
    pub key_rotation: bool,
    pub mac_address_mode: MacAddressMode,
    pub rframe_config: RframeConfig,
    pub preamble_duration: PreambleDuration,
    pub psdu_data_rate: PsduDataRate,
    pub aoa_result_request: AoaResultRequest,
    pub hopping_mode: HoppingMode,
    pub sfd_id: u8,
    pub sts_segment_count: u8,
    pub slot_duration_rstu: u16,
    pub ranging_interval_ms: u16,
    pub slots_per_ranging_round: u8,
    pub in_band_termination_attempt_count: u8,
    pub tx_adaptive_payload_power: bool,
    pub ranging_result_report_message: bool,
    pub vendor_id: [u8; 2],
    pub static_sts_iv: [u8; 6],
    pub peer_address: ShortAddress,
}

impl Default for RangingSessionParameters {
    fn default() -> Self {
        Self {
            device_type: DeviceType::Controlee,
            device_role: DeviceRole::Responder,
            protocol_version: ProtocolVersion::FIRA_1_1,
            session_id: 0,
            channel: UwbChannel::Channel9,
            preamble_code_index: 10,
            ranging_round_usage: RangingRoundUsage::DsTwrDeferred,
            multi_node_mode: MultiNodeMode::Unicast,
            fcs_type: MacFcsType::Crc16,
            prf_mode: PrfMode::Bprf,
            sts_config: StsConfig::Static,
            key_rotation: false,
            mac_address_mode: MacAddressMode::TwoBytes,
            rframe_config: RframeConfig::Sp3,
            preamble_duration: PreambleDuration::T64Symbols,
            psdu_data_rate: PsduDataRate::Rate6m81,
            aoa_result_request: AoaResultRequest::ReqAoaResults,
            hopping_mode: HoppingMode::Disable,
            sfd_id: 2,
            sts_segment_count: 1,
            slot_duration_rstu: 2400,
            ranging_interval_ms: 200,
            slots_per_ranging_round: 25,
            in_band_termination_attempt_count: 1,
            tx_adaptive_payload_power: false,
            ranging_result_report_message: true,
            vendor_id: [0, 0],
            static_sts_iv: [0; 6],
            peer_address: ShortAddress::new([0, 0]),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn discriminants_match_the_protocol() {
        assert_eq!(DeviceType::Controlee as u8, 0);
        assert_eq!(DeviceRole::Responder as u8, 0);
        assert_eq!(RangingRoundUsage::DsTwrDeferred as u8, 2);
        assert_eq!(MultiNodeMode::Unicast as u8, 0);
        assert_eq!(RframeConfig::Sp3 as u8, 3);
        assert_eq!(PreambleDuration::T64Symbols as u8, 1);
        assert_eq!(MacAddressMode::EightBytes as u8, 2);
        assert_eq!(HoppingMode::FiraEnable as u8, 1);
        assert_eq!(UwbChannel::Channel9 as u8, 9);
    }

    #[test]
    fn library_defaults() {
        let params = RangingSessionParameters::default();
        assert_eq!(params.slot_duration_rstu, 2400);
        assert_eq!(params.ranging_interval_ms, 200);
        assert_eq!(params.slots_per_ranging_round, 25);
        assert_eq!(params.preamble_code_index, 10);
        assert_eq!(params.in_band_termination_attempt_count, 1);
        assert_eq!(params.hopping_mode, HoppingMode::Disable);
        assert!(params.ranging_result_report_message);
        assert_eq!(params.channel, UwbChannel::Channel9);
    }

    #[test]
    fn short_address_round_trips() {
        let addr = ShortAddress::from_u16(0xABCD);
        assert_eq!(addr.bytes(), [0xAB, 0xCD]);
        assert_eq!(addr.to_u16(), 0xABCD);
        assert_eq!(ShortAddress::new([0xAB, 0xCD]), addr);
        assert_eq!(addr.to_string(), "ABCD");
    }

    #[test]
    fn random_addresses_direct_from_the_rng() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        assert_eq!(ShortAddress::random(&mut a), ShortAddress::random(&mut b));
    }

    #[test]
    fn preamble_picker_stays_in_the_bprf_set() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..100 {
            let code = random_bprf_preamble_code(&mut rng);
            assert!(BPRF_PREAMBLE_CODES.contains(&code));
        }
    }
}
