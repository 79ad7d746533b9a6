//! PMU simulator
//!
//! Ties the registry to the streaming supervisor: registering a device starts
//! its task, and shutdown deactivates every device then waits for all tasks.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use crate::error::Result;
use crate::registry::{Device, DeviceRegistry, RegistryError};
use crate::server::config::SimulatorConfig;
use crate::server::supervisor::StreamingSupervisor;
use crate::signal::SignalModel;
use crate::stats::SimulatorStats;
use crate::transport::{Transport, UdpTransport};

/// Multi-device PMU simulator
pub struct PmuSimulator<T: Transport> {
    config: SimulatorConfig,
    registry: Arc<DeviceRegistry>,
    supervisor: StreamingSupervisor<T>,
    /// Serializes registration against the shutdown sweep
    lifecycle: Mutex<()>,
    started_at: Instant,
}

impl PmuSimulator<UdpTransport> {
    /// Bind a UDP socket at `config.bind_addr` and create the simulator
    pub async fn bind(config: SimulatorConfig) -> Result<Self> {
        let transport = UdpTransport::bind(config.bind_addr).await?;
        tracing::info!(local = %transport.local_addr()?, "PMU simulator bound");
        Ok(Self::new(config, transport))
    }
}

impl<T: Transport> PmuSimulator<T> {
    /// Create a simulator sending through `transport`
    pub fn new(config: SimulatorConfig, transport: T) -> Self {
        let registry = Arc::new(DeviceRegistry::with_config(
            config.registry.clone(),
            config.signal,
        ));
        let supervisor = StreamingSupervisor::new(
            Arc::new(transport),
            SignalModel::new(config.signal),
            config.tick_interval,
        );

        Self {
            config,
            registry,
            supervisor,
            lifecycle: Mutex::new(()),
            started_at: Instant::now(),
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Get a reference to the device registry
    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    pub fn transport(&self) -> &Arc<T> {
        self.supervisor.transport()
    }

    /// Register a device and start streaming it
    pub async fn add_device(
        &self,
        name: &str,
        destination: SocketAddr,
    ) -> std::result::Result<Arc<Device>, RegistryError> {
        let _guard = self.lifecycle.lock().await;

        let device = self.registry.register(name, destination).await?;
        self.supervisor.spawn(Arc::clone(&device)).await;

        Ok(device)
    }

    /// Deactivate every device and wait for all streaming tasks to exit
    ///
    /// After this returns no further frames are sent and new registrations
    /// are rejected. Calling it again is a no-op.
    pub async fn shutdown(&self) -> SimulatorStats {
        let _guard = self.lifecycle.lock().await;

        let deactivated = self.registry.deactivate_all().await;
        let joined = self.supervisor.drain().await;

        let stats = self.stats().await;
        tracing::info!(
            deactivated = deactivated,
            joined = joined,
            frames_sent = stats.total_frames_sent,
            send_failures = stats.total_send_failures,
            "PMU simulator stopped"
        );
        stats
    }

    /// Number of streaming tasks still running
    pub async fn running_tasks(&self) -> usize {
        self.supervisor.running_count().await
    }

    /// Aggregate statistics over all devices
    pub async fn stats(&self) -> SimulatorStats {
        let devices = self.registry.devices().await;

        let mut stats = SimulatorStats {
            registered_devices: devices.len(),
            active_devices: devices.iter().filter(|d| d.is_active()).count(),
            uptime: self.started_at.elapsed(),
            ..Default::default()
        };
        for device in &devices {
            stats.accumulate(&device.stats());
        }
        stats
    }
}
