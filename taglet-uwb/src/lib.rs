//! UWB ranging session configuration for tracker tags
//!
//! Builds the parameter set a tag needs to open a secure ranging session and
//! serializes it into the exact byte layout the tag firmware expects. The
//! parameter object feeds the platform ranging API; the byte blob goes to the
//! tag over its ranging configuration characteristic.

mod buffer;
mod params;
mod session;

pub use buffer::BitPackedBuffer;
pub use params::{
    AoaResultRequest, BPRF_PREAMBLE_CODES, DeviceRole, DeviceType, HoppingMode, MacAddressMode,
    MacFcsType, MultiNodeMode, PreambleDuration, PrfMode, ProtocolVersion, PsduDataRate,
    RangingRoundUsage, RangingSessionParameters, RframeConfig, ShortAddress, StsConfig,
    UwbChannel, random_bprf_preamble_code,
};
pub use session::RangingSessionConfig;
