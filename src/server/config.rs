//! Simulator configuration

use std::net::SocketAddr;
use std::time::Duration;

use crate::registry::RegistryConfig;
use crate::signal::SignalParams;

/// Shortest accepted tick interval
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Simulator configuration options
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Local address the UDP socket binds to (port 0 = ephemeral)
    pub bind_addr: SocketAddr,

    /// Time between two frames of the same device
    pub tick_interval: Duration,

    /// Signal model parameters shared by all devices
    pub signal: SignalParams,

    /// Device registry settings
    pub registry: RegistryConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 0)),
            tick_interval: Duration::from_secs(1),
            signal: SignalParams::default(),
            registry: RegistryConfig::default(),
        }
    }
}

impl SimulatorConfig {
    /// Create a new config with a custom local bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the local bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the tick interval
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval.max(MIN_TICK_INTERVAL);
        self
    }

    /// Set the device capacity
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.registry.capacity = capacity;
        self
    }

    /// Set the signal model parameters
    pub fn signal(mut self, params: SignalParams) -> Self {
        self.signal = params;
        self
    }

    /// Set the registry configuration
    pub fn registry(mut self, config: RegistryConfig) -> Self {
        self.registry = config;
        self
    }
}
