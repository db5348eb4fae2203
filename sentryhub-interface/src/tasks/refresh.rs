//! Refresh task
//!
//! Drives the controller clock:
//! - Timed value refreshes and the inactivity timeout on every tick
//! - Status LED updates
//! - Delivery of finished Wi-Fi scans as soon as they arrive

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{info, trace};

use crate::channels::ScanCompletion;
use crate::hardware::LinuxHardware;
use crate::hub::Hub;

/// Tick interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 100;

/// Wait for the next scan completion or tick deadline, then act on it
///
/// Returns the next tick deadline.
pub fn refresh_step(
    hub: &Hub<LinuxHardware>,
    scans: &Receiver<ScanCompletion>,
    next_tick: Instant,
    interval: Duration,
) -> Instant {
    let wait = next_tick.saturating_duration_since(Instant::now());
    match scans.recv_timeout(wait) {
        Ok(done) => {
            hub.complete_scan(done);
        }
        Err(RecvTimeoutError::Timeout) => {}
        Err(RecvTimeoutError::Disconnected) => std::thread::sleep(wait),
    }

    let now = Instant::now();
    if now < next_tick {
        return next_tick;
    }

    if hub.tick() {
        trace!("tick redrew the display");
    }
    hub.with_controller(|c| c.hardware_mut().update_status());

    // Skip missed ticks rather than bursting to catch up
    let next = next_tick + interval;
    if next <= now {
        now + interval
    } else {
        next
    }
}

/// Run the refresh loop on its own thread until the hub shuts down
pub fn spawn_refresh(
    hub: Arc<Hub<LinuxHardware>>,
    scans: Receiver<ScanCompletion>,
    interval: Duration,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("refresh".into())
        .spawn(move || {
            info!("refresh task started, every {:?}", interval);
            let mut next_tick = Instant::now() + interval;
            while hub.is_running() {
                next_tick = refresh_step(&hub, &scans, next_tick, interval);
            }
            info!("refresh task stopped");
        })
}
