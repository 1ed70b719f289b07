//! Transport seam between the coordinator and one tag.

use taglet_proto::VolumeLevel;
use tokio::sync::{broadcast, watch};

/// Outcome of asking a tag to start ringing. The transport picks the
/// channel: the local link when the tag is in range, the cloud relay when
/// some other phone has it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingResult {
    /// Ringing over the local link; carries the volume the tag confirmed.
    SuccessBluetooth(VolumeLevel),
    /// Ringing through the relay. No volume control on this channel.
    SuccessNetwork,
    /// The tag did not acknowledge on any channel.
    Failed,
}

/// Capability set a host app provides for one tag.
///
/// Every command resolves to a plain acknowledged/failed answer; retry,
/// timeout and transport selection policy live behind this trait, not in
/// front of it. Command futures are `Send` because the coordinator drives
/// them from spawned tasks.
pub trait TagTransport: Send + Sync + 'static {
    /// Ask the tag to start ringing on whichever channel is available.
    fn start_ringing(&self) -> impl Future<Output = RingResult> + Send;

    /// Stop a ring that runs over the local link.
    fn stop_ringing_bluetooth(&self) -> impl Future<Output = bool> + Send;

    /// Stop a ring that runs through the relay.
    fn stop_ringing_network(&self) -> impl Future<Output = bool> + Send;

    /// Change the ring volume over the local link.
    fn set_ring_volume(&self, volume: VolumeLevel) -> impl Future<Output = bool> + Send;

    /// Local reachability of the tag. `true` means a direct connection is up.
    fn connectivity(&self) -> watch::Receiver<bool>;

    /// Unsolicited stop notifications: the tag's own button, or another
    /// client that silenced it first.
    fn remote_stop_events(&self) -> broadcast::Receiver<()>;
}
