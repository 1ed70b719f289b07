//! Ring command coordination for one tag.
//!
//! The coordinator owns the ring state machine: commands fire onto the
//! runtime and serialize behind a single async mutex, so a dropped caller
//! never leaves the tag half-started and two commands never interleave
//! their transport calls. Durable state travels on a watch channel,
//! transient failures on a separate broadcast.

use std::sync::Arc;

use taglet_proto::VolumeLevel;
use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;

use crate::transport::{RingResult, TagTransport};

/// Direction of a requested volume step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeDirection {
    Down,
    Up,
}

impl VolumeDirection {
    fn step(self, from: VolumeLevel) -> Option<VolumeLevel> {
        match self {
            VolumeDirection::Up => from.next(),
            VolumeDirection::Down => from.previous(),
        }
    }
}

/// Observable ring state of one tag.
///
/// Exactly one value exists at a time and every transition happens under
/// the coordinator's command lock. Failures are not represented here; they
/// arrive through [`RingCommandCoordinator::failures`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RingState {
    /// Not ringing. Initial and terminal.
    Stopped,
    /// A start command is in flight; the channel is not known yet.
    Loading,
    /// Ringing over the local link. `pending` is set while a volume change
    /// waits for the tag's acknowledgement.
    RingingBluetooth {
        volume: VolumeLevel,
        pending: Option<VolumeDirection>,
    },
    /// Ringing through the cloud relay; no volume control on this channel.
    RingingNetwork,
}

/// Transient command failure. Observers surface these as one-shot notices;
/// the durable state already reflects where the machine settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RingFailure {
    #[error("tag did not acknowledge the ring request")]
    Start,
    #[error("tag did not acknowledge the stop request")]
    Stop,
    #[error("tag rejected the volume change")]
    Volume,
    #[error("could not move the ring off the relay")]
    Handoff,
}

struct Inner<T> {
    transport: T,
    /// Serializes every command and listener reaction.
    command_lock: Mutex<()>,
    state_tx: watch::Sender<RingState>,
    failure_tx: broadcast::Sender<RingFailure>,
}

/// Drives ring, stop and volume commands for one tag.
///
/// Commands are fire-and-forget: each spawns a task that queues on the
/// command lock, so callers may drop the returned handle without cancelling
/// anything. The coordinator also watches the transport for unsolicited
/// stops and for the tag coming into range mid-ring.
pub struct RingCommandCoordinator<T: TagTransport> {
    inner: Arc<Inner<T>>,
    listeners: Vec<JoinHandle<()>>,
}

impl<T: TagTransport> RingCommandCoordinator<T> {
    /// Wraps `transport` and spawns its event listeners onto the current
    /// runtime. The machine starts in [`RingState::Stopped`].
    pub fn new(transport: T) -> Self {
        let (state_tx, _) = watch::channel(RingState::Stopped);
        let (failure_tx, _) = broadcast::channel(16);
        let inner = Arc::new(Inner {
            transport,
            command_lock: Mutex::new(()),
            state_tx,
            failure_tx,
        });

        let listeners = vec![
            tokio::spawn(remote_stop_listener(inner.clone())),
            tokio::spawn(connectivity_listener(inner.clone())),
        ];
        Self { inner, listeners }
    }

    /// Durable state stream. A fresh receiver starts at the current state.
    pub fn state(&self) -> watch::Receiver<RingState> {
        self.inner.state_tx.subscribe()
    }

    /// Snapshot of the current state.
    pub fn current_state(&self) -> RingState {
        self.inner.state_tx.borrow().clone()
    }

    /// Transient failure events. Only failures sent after subscribing are
    /// delivered.
    pub fn failures(&self) -> broadcast::Receiver<RingFailure> {
        self.inner.failure_tx.subscribe()
    }

    /// Ask the tag to start ringing. Ignored unless currently stopped.
    pub fn ring(&self) -> JoinHandle<()> {
        let inner = self.inner.clone();
        tokio::spawn(async move { inner.start().await })
    }

    /// Silence an active ring on whichever channel it runs. Ignored when
    /// nothing rings.
    pub fn stop(&self) -> JoinHandle<()> {
        let inner = self.inner.clone();
        tokio::spawn(async move { inner.stop().await })
    }

    /// Step the ring volume. Only meaningful while ringing over the local
    /// link with no step already outstanding; ignored otherwise.
    pub fn step_volume(&self, direction: VolumeDirection) -> JoinHandle<()> {
        let inner = self.inner.clone();
        tokio::spawn(async move { inner.step_volume(direction).await })
    }

    /// Stops listening to transport events and issues one final best-effort
    /// stop. Commands already in flight still run to completion.
    pub fn close(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.abort();
        }
        let inner = self.inner.clone();
        tokio::spawn(async move { inner.stop().await });
    }
}

impl<T: TagTransport> Drop for RingCommandCoordinator<T> {
    fn drop(&mut self) {
        for listener in &self.listeners {
            listener.abort();
        }
    }
}

impl<T: TagTransport> Inner<T> {
    fn current(&self) -> RingState {
        self.state_tx.borrow().clone()
    }

    fn publish(&self, state: RingState) {
        log::debug!("ring state: {state:?}");
        self.state_tx.send_replace(state);
    }

    fn fail(&self, failure: RingFailure) {
        log::warn!("ring command: {failure}");
        let _ = self.failure_tx.send(failure);
    }

    async fn start(&self) {
        let _guard = self.command_lock.lock().await;
        if !matches!(self.current(), RingState::Stopped) {
            return;
        }
        self.publish(RingState::Loading);
        self.apply_start_result(self.transport.start_ringing().await);
    }

    fn apply_start_result(&self, result: RingResult) {
        match result {
            RingResult::SuccessBluetooth(volume) => self.publish(RingState::RingingBluetooth {
                volume,
                pending: None,
            }),
            RingResult::SuccessNetwork => self.publish(RingState::RingingNetwork),
            RingResult::Failed => {
                self.fail(RingFailure::Start);
                self.publish(RingState::Stopped);
            }
        }
    }

    async fn stop(&self) {
        let _guard = self.command_lock.lock().await;
        let stopped = match self.current() {
            RingState::RingingBluetooth { .. } => self.transport.stop_ringing_bluetooth().await,
            RingState::RingingNetwork => self.transport.stop_ringing_network().await,
            RingState::Stopped | RingState::Loading => return,
        };
        if stopped {
            self.publish(RingState::Stopped);
        } else {
            self.fail(RingFailure::Stop);
        }
    }

    async fn step_volume(&self, direction: VolumeDirection) {
        let (volume, target) = {
            let _guard = self.command_lock.lock().await;
            let RingState::RingingBluetooth {
                volume,
                pending: None,
            } = self.current()
            else {
                return;
            };
            let Some(target) = direction.step(volume) else {
                return;
            };
            self.publish(RingState::RingingBluetooth {
                volume,
                pending: Some(direction),
            });
            (volume, target)
        };

        // The transport call runs outside the lock; the pending marker is
        // what keeps a second step from piling up behind it.
        let accepted = self.transport.set_ring_volume(target).await;

        let _guard = self.command_lock.lock().await;
        let expected = RingState::RingingBluetooth {
            volume,
            pending: Some(direction),
        };
        if self.current() != expected {
            // Something else (a remote stop, a queued stop) took the state
            // while the call was in flight. Its outcome stands, not ours.
            return;
        }
        if accepted {
            self.publish(RingState::RingingBluetooth {
                volume: target,
                pending: None,
            });
        } else {
            self.fail(RingFailure::Volume);
            self.publish(RingState::RingingBluetooth {
                volume,
                pending: None,
            });
        }
    }

    /// The tag already went silent on its own; no transport call, any state
    /// yields.
    async fn remote_stopped(&self) {
        let _guard = self.command_lock.lock().await;
        if !matches!(self.current(), RingState::Stopped) {
            self.publish(RingState::Stopped);
        }
    }

    /// The tag came into range while ringing through the relay: kill the
    /// relay ring first, then restart on the local link. The relay ring has
    /// to die before the local one starts or the tag rings on both channels.
    async fn connected_late(&self) {
        let _guard = self.command_lock.lock().await;
        if !matches!(self.current(), RingState::RingingNetwork) {
            return;
        }
        self.publish(RingState::Loading);
        if self.transport.stop_ringing_network().await {
            self.apply_start_result(self.transport.start_ringing().await);
        } else {
            self.fail(RingFailure::Handoff);
            self.publish(RingState::Stopped);
        }
    }
}

async fn remote_stop_listener<T: TagTransport>(inner: Arc<Inner<T>>) {
    let mut events = inner.transport.remote_stop_events();
    loop {
        match events.recv().await {
            Ok(()) => inner.remote_stopped().await,
            // Missed notifications still mean at least one stop happened.
            Err(broadcast::error::RecvError::Lagged(_)) => inner.remote_stopped().await,
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn connectivity_listener<T: TagTransport>(inner: Arc<Inner<T>>) {
    let mut connectivity = inner.transport.connectivity();
    while connectivity.changed().await.is_ok() {
        let connected = *connectivity.borrow();
        if connected {
            inner.connected_late().await;
        }
    }
}
