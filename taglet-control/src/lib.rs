//! Ring command coordination for tracker tags.
//!
//! One [`RingCommandCoordinator`] drives one tag: callers press ring, stop
//! and volume, the coordinator serializes those commands against a
//! host-provided [`TagTransport`] and publishes every durable state change
//! on a watch channel. Transient failures travel on a separate broadcast,
//! so the durable state never carries error variants.

mod coordinator;
mod transport;

pub use coordinator::{RingCommandCoordinator, RingFailure, RingState, VolumeDirection};
pub use taglet_proto::VolumeLevel;
pub use transport::{RingResult, TagTransport};
