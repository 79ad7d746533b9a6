//! Device entry types
//!
//! This module defines the per-device state stored in the registry.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::{Notify, RwLock};

use crate::signal::{Measurement, SignalModel, SignalParams};
use crate::stats::DeviceStats;

/// Registration slot of a device, assigned in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub usize);

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A simulated PMU
///
/// Owned by the registry and shared with exactly one streaming task. The
/// signal state is written only by that task; `active` is written by the
/// shutdown sweep and read by the task.
pub struct Device {
    id: DeviceId,
    name: String,
    id_code: u16,
    destination: SocketAddr,

    /// Digital status word, passed through to frames untouched
    status: AtomicU16,

    /// Cleared once on shutdown, never set again
    active: AtomicBool,

    /// Wakes the streaming task early when `active` is cleared
    wake: Notify,

    /// Latest synthesized measurement
    signal: RwLock<Measurement>,

    frames_sent: AtomicU64,
    bytes_sent: AtomicU64,
    send_failures: AtomicU64,

    /// Micros since `registered_at` of the last successful send, plus one (0 = never)
    last_sent: AtomicU64,

    registered_at: Instant,
}

impl Device {
    pub(super) fn new(
        id: DeviceId,
        name: String,
        id_code: u16,
        destination: SocketAddr,
        params: &SignalParams,
    ) -> Self {
        Self {
            id,
            name,
            id_code,
            destination,
            status: AtomicU16::new(0),
            active: AtomicBool::new(true),
            wake: Notify::new(),
            signal: RwLock::new(Measurement::initial(params)),
            frames_sent: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            send_failures: AtomicU64::new(0),
            last_sent: AtomicU64::new(0),
            registered_at: Instant::now(),
        }
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// C37.118 ID code written into every frame
    pub fn id_code(&self) -> u16 {
        self.id_code
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    pub fn status(&self) -> u16 {
        self.status.load(Ordering::Relaxed)
    }

    /// Replace the status word sent from the next tick on
    pub fn set_status(&self, status: u16) {
        self.status.store(status, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Clear the active flag and wake the streaming task
    ///
    /// Returns `true` if the device was active before the call.
    pub fn deactivate(&self) -> bool {
        let was_active = self.active.swap(false, Ordering::SeqCst);
        if was_active {
            self.wake.notify_one();
        }
        was_active
    }

    /// Resolves once `deactivate` has been called (or a permit is pending)
    pub(crate) async fn deactivated(&self) {
        self.wake.notified().await;
    }

    /// Current signal state
    pub async fn signal(&self) -> Measurement {
        *self.signal.read().await
    }

    /// Advance the signal one tick and store the result
    pub(crate) async fn advance(&self, model: &SignalModel) -> Measurement {
        let mut signal = self.signal.write().await;
        *signal = model.step(signal.angle);
        *signal
    }

    pub(crate) fn record_sent(&self, bytes: usize) {
        self.frames_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(bytes as u64, Ordering::Relaxed);
        let micros = self.registered_at.elapsed().as_micros() as u64;
        self.last_sent.store(micros.saturating_add(1), Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.send_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of this device's counters
    pub fn stats(&self) -> DeviceStats {
        let last_sent = self.last_sent.load(Ordering::Relaxed);

        DeviceStats {
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            uptime: self.registered_at.elapsed(),
            last_sent_at: (last_sent > 0)
                .then(|| self.registered_at + Duration::from_micros(last_sent - 1)),
        }
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("id_code", &self.id_code)
            .field("destination", &self.destination)
            .field("active", &self.is_active())
            .finish()
    }
}
