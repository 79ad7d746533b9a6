//! Per-device streaming tasks
//!
//! Every registered device gets one tokio task that, once per tick, advances
//! the device's signal, encodes a data frame and sends it:
//!
//! ```text
//!   ┌──────────────► wait for tick (or deactivation wake-up)
//!   │                        │
//!   │                  active? ── no ──► exit
//!   │                        │ yes
//!   │               SignalModel::step
//!   │                        │
//!   │                DataFrame::encode
//!   │                        │
//!   └──────────────── Transport::send_to
//! ```
//!
//! Cancellation is cooperative: a task is never aborted, it exits at its own
//! check of the device's `active` flag. Send errors are logged and counted
//! but never end the task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::protocol::{DataFrame, Timestamp};
use crate::registry::{Device, DeviceId};
use crate::signal::SignalModel;
use crate::transport::Transport;

use super::config::MIN_TICK_INTERVAL;

/// Owns the streaming task of every device
pub struct StreamingSupervisor<T: Transport> {
    transport: Arc<T>,
    model: SignalModel,
    tick_interval: Duration,
    tasks: Mutex<Vec<(DeviceId, JoinHandle<()>)>>,
}

impl<T: Transport> StreamingSupervisor<T> {
    pub fn new(transport: Arc<T>, model: SignalModel, tick_interval: Duration) -> Self {
        Self {
            transport,
            model,
            tick_interval: tick_interval.max(MIN_TICK_INTERVAL),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Start the streaming task for `device`
    ///
    /// The first frame goes out immediately, then one per tick.
    pub async fn spawn(&self, device: Arc<Device>) {
        let id = device.id();
        let transport = Arc::clone(&self.transport);
        let model = self.model;
        let interval = self.tick_interval;

        let handle = tokio::spawn(stream_device(device, transport, model, interval));
        self.tasks.lock().await.push((id, handle));
    }

    /// Number of tasks that have not finished yet
    pub async fn running_count(&self) -> usize {
        self.tasks
            .lock()
            .await
            .iter()
            .filter(|(_, handle)| !handle.is_finished())
            .count()
    }

    /// Wait for every task to finish
    ///
    /// Tasks only finish once their device is deactivated, so callers clear
    /// the active flags first. Returns the number of tasks joined.
    ///
    /// Cancel safe: a handle leaves the task list only after its task has
    /// been joined, so a dropped drain can be resumed by calling it again.
    /// `running_count` waits while a drain is in progress.
    pub async fn drain(&self) -> usize {
        let mut tasks = self.tasks.lock().await;
        let mut joined = 0;

        while let Some((id, handle)) = tasks.last_mut() {
            let id = *id;
            let result = handle.await;
            tasks.pop();
            joined += 1;

            if let Err(e) = result {
                tracing::error!(id = %id, error = %e, "Streaming task failed");
            }
        }

        tracing::debug!(joined = joined, "Streaming tasks drained");
        joined
    }
}

async fn stream_device<T: Transport>(
    device: Arc<Device>,
    transport: Arc<T>,
    model: SignalModel,
    tick_interval: Duration,
) {
    let destination = device.destination();
    let nominal = model.params().nominal_frequency;

    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        device = device.name(),
        id = %device.id(),
        destination = %destination,
        interval_ms = tick_interval.as_millis() as u64,
        "Streaming started"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = device.deactivated() => {}
        }

        if !device.is_active() {
            break;
        }

        let measurement = device.advance(&model).await;
        let frame = DataFrame::from_measurement(
            device.id_code(),
            Timestamp::now(),
            device.status(),
            &measurement,
            nominal,
        );

        match transport.send_to(frame.encode(), destination).await {
            Ok(n) => {
                device.record_sent(n);
                tracing::trace!(
                    device = device.name(),
                    angle = measurement.angle,
                    frequency = measurement.frequency,
                    bytes = n,
                    "Frame sent"
                );
            }
            Err(e) => {
                device.record_failure();
                tracing::warn!(
                    device = device.name(),
                    destination = %destination,
                    error = %e,
                    "Failed to send frame"
                );
            }
        }
    }

    let stats = device.stats();
    tracing::info!(
        device = device.name(),
        id = %device.id(),
        ticks = stats.ticks(),
        frames_sent = stats.frames_sent,
        send_failures = stats.send_failures,
        frame_rate = stats.frame_rate(),
        "Streaming stopped"
    );
}
