//! Ring console - walks a simulated tag through the whole ring flow:
//! a relay ring while the tag is away, the handoff when it comes back
//! into range, a volume press, and the tag's own button ending it all.
//!
//! Usage:
//!   cargo run -p taglet-control --example ring-console

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use taglet_control::{
    RingCommandCoordinator, RingResult, RingState, TagTransport, VolumeDirection, VolumeLevel,
};
use taglet_uwb::{RangingSessionConfig, ShortAddress, random_bprf_preamble_code};
use tokio::sync::{broadcast, watch};

/// Pretend tag: answers on the local link while `in_range` is set, through
/// the relay otherwise, and always obeys.
struct SimulatedTag {
    in_range: AtomicBool,
    connectivity: watch::Sender<bool>,
    button: broadcast::Sender<()>,
}

impl SimulatedTag {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            in_range: AtomicBool::new(false),
            connectivity: watch::channel(false).0,
            button: broadcast::channel(4).0,
        })
    }

    fn come_into_range(&self) {
        self.in_range.store(true, Ordering::Relaxed);
        self.connectivity.send_replace(true);
    }

    fn press_button(&self) {
        let _ = self.button.send(());
    }
}

/// Coordinator-side handle to the tag; a newtype because the orphan rule
/// forbids implementing the foreign `TagTransport` on `Arc<SimulatedTag>`.
struct TagHandle(Arc<SimulatedTag>);

impl TagTransport for TagHandle {
    async fn start_ringing(&self) -> RingResult {
        if self.0.in_range.load(Ordering::Relaxed) {
            println!("  tag: ringing over bluetooth");
            RingResult::SuccessBluetooth(VolumeLevel::Low)
        } else {
            println!("  tag: ringing via the relay");
            RingResult::SuccessNetwork
        }
    }

    async fn stop_ringing_bluetooth(&self) -> bool {
        println!("  tag: bluetooth ring stopped");
        true
    }

    async fn stop_ringing_network(&self) -> bool {
        println!("  tag: relay ring stopped");
        true
    }

    async fn set_ring_volume(&self, volume: VolumeLevel) -> bool {
        println!("  tag: volume now {volume:?}");
        true
    }

    fn connectivity(&self) -> watch::Receiver<bool> {
        self.0.connectivity.subscribe()
    }

    fn remote_stop_events(&self) -> broadcast::Receiver<()> {
        self.0.button.subscribe()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let tag = SimulatedTag::new();
    let mut coordinator = RingCommandCoordinator::new(TagHandle(tag.clone()));
    let mut state = coordinator.state();

    // Follow the durable state the way a UI would.
    let mut ui_state = coordinator.state();
    tokio::spawn(async move {
        while ui_state.changed().await.is_ok() {
            println!("state: {:?}", *ui_state.borrow());
        }
    });
    let mut failures = coordinator.failures();
    tokio::spawn(async move {
        while let Ok(failure) = failures.recv().await {
            println!("notice: {failure}");
        }
    });

    println!("ringing a tag that is out of range...");
    coordinator.ring().await?;
    state
        .wait_for(|s| matches!(s, RingState::RingingNetwork))
        .await?;

    println!("\ntag comes back into range mid-ring...");
    tag.come_into_range();
    state
        .wait_for(|s| matches!(s, RingState::RingingBluetooth { .. }))
        .await?;

    println!("\nturning the ring up...");
    coordinator.step_volume(VolumeDirection::Up).await?;

    // A freshly connected tag would also get a ranging session pushed to
    // its UWB characteristic; this is the exact blob it would receive.
    let code = random_bprf_preamble_code(&mut rand::thread_rng());
    let session = RangingSessionConfig::new(code);
    let local = ShortAddress::from_u16(0x0001);
    println!("\nuwb session for precision finding: {}", session.hex(local));

    println!("\nthe tag's own button ends the ring...");
    tag.press_button();
    state.wait_for(|s| matches!(s, RingState::Stopped)).await?;

    coordinator.close();
    Ok(())
}
