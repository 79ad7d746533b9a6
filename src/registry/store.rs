//! Device registry implementation
//!
//! The central registry that owns every simulated device. Devices are kept in
//! registration order and never removed; a device's slot index is its
//! [`DeviceId`].

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::signal::SignalParams;

use super::config::RegistryConfig;
use super::entry::{Device, DeviceId};
use super::error::RegistryError;

struct Slots {
    devices: Vec<Arc<Device>>,
    /// Set by the shutdown sweep; rejects further registrations
    closed: bool,
}

/// Capacity-bounded registry of all devices
///
/// Thread-safe via `RwLock`. Registration and the shutdown sweep take the
/// write lock, so a structural change can never interleave with a sweep.
pub struct DeviceRegistry {
    slots: RwLock<Slots>,

    /// Initial signal state parameters for new devices
    params: SignalParams,

    /// Configuration
    config: RegistryConfig,
}

impl DeviceRegistry {
    /// Create a new registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default(), SignalParams::default())
    }

    /// Create a new registry with custom configuration
    pub fn with_config(config: RegistryConfig, params: SignalParams) -> Self {
        Self {
            slots: RwLock::new(Slots {
                devices: Vec::with_capacity(config.capacity.min(1024)),
                closed: false,
            }),
            params,
            config,
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Register a new device
    ///
    /// The device starts active with the initial signal state. Duplicate
    /// names are allowed; every call creates an independent device. A
    /// rejected registration leaves the registry unchanged.
    pub async fn register(
        &self,
        name: &str,
        destination: SocketAddr,
    ) -> Result<Arc<Device>, RegistryError> {
        if name.is_empty() || name.len() > self.config.max_name_len {
            return Err(RegistryError::InvalidName {
                name: name.to_string(),
                max_len: self.config.max_name_len,
            });
        }

        let mut slots = self.slots.write().await;

        if slots.closed {
            return Err(RegistryError::Closed);
        }

        if slots.devices.len() >= self.config.capacity {
            tracing::warn!(
                device = name,
                capacity = self.config.capacity,
                "Registration rejected: capacity reached"
            );
            return Err(RegistryError::CapacityExceeded {
                capacity: self.config.capacity,
            });
        }

        let index = slots.devices.len();
        let id_code = self.config.first_id_code.wrapping_add(index as u16);
        let device = Arc::new(Device::new(
            DeviceId(index),
            name.to_string(),
            id_code,
            destination,
            &self.params,
        ));
        slots.devices.push(Arc::clone(&device));

        tracing::info!(
            device = name,
            id = %device.id(),
            id_code = id_code,
            destination = %destination,
            "Device registered"
        );

        Ok(device)
    }

    /// Look up a device by slot
    pub async fn get(&self, id: DeviceId) -> Option<Arc<Device>> {
        self.slots.read().await.devices.get(id.0).cloned()
    }

    /// Snapshot of all devices in registration order
    pub async fn devices(&self) -> Vec<Arc<Device>> {
        self.slots.read().await.devices.clone()
    }

    /// Number of registered devices
    pub async fn device_count(&self) -> usize {
        self.slots.read().await.devices.len()
    }

    /// Number of devices whose streaming task should still be running
    pub async fn active_count(&self) -> usize {
        self.slots
            .read()
            .await
            .devices
            .iter()
            .filter(|d| d.is_active())
            .count()
    }

    /// Whether the shutdown sweep has run
    pub async fn is_closed(&self) -> bool {
        self.slots.read().await.closed
    }

    /// Close the registry and clear every device's active flag
    ///
    /// Returns the number of devices that were active. This only clears the
    /// flags: a task may still be finishing its current tick when it returns.
    /// Use `PmuSimulator::shutdown`, which also waits for every streaming
    /// task, when no frame may be sent afterwards.
    pub async fn deactivate_all(&self) -> usize {
        let mut slots = self.slots.write().await;
        slots.closed = true;

        let count = slots.devices.iter().filter(|d| d.deactivate()).count();

        tracing::info!(deactivated = count, "All devices deactivated");
        count
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> SocketAddr {
        "127.0.0.1:4712".parse().unwrap()
    }

    #[tokio::test]
    async fn test_register_device() {
        let registry = DeviceRegistry::new();

        let device = registry.register("A", addr()).await.unwrap();

        assert_eq!(device.id(), DeviceId(0));
        assert_eq!(device.id_code(), 1);
        assert!(device.is_active());
        assert_eq!(registry.device_count().await, 1);
        assert_eq!(registry.active_count().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_names_are_independent() {
        let registry = DeviceRegistry::new();

        let a = registry.register("A", addr()).await.unwrap();
        let b = registry.register("A", addr()).await.unwrap();

        assert_ne!(a.id(), b.id());
        assert_eq!(a.id_code(), 1);
        assert_eq!(b.id_code(), 2);
        assert_eq!(registry.device_count().await, 2);
    }

    #[tokio::test]
    async fn test_capacity_bound() {
        let registry = DeviceRegistry::with_config(
            RegistryConfig::default().capacity(3),
            SignalParams::default(),
        );

        for i in 0..3 {
            registry.register(&format!("pmu{}", i), addr()).await.unwrap();
        }

        let result = registry.register("overflow", addr()).await;
        assert_eq!(result.unwrap_err(), RegistryError::CapacityExceeded { capacity: 3 });
        assert_eq!(registry.device_count().await, 3);
    }

    #[tokio::test]
    async fn test_invalid_names() {
        let registry = DeviceRegistry::with_config(
            RegistryConfig::default().max_name_len(4),
            SignalParams::default(),
        );

        assert!(matches!(
            registry.register("", addr()).await,
            Err(RegistryError::InvalidName { .. })
        ));
        assert!(matches!(
            registry.register("toolong", addr()).await,
            Err(RegistryError::InvalidName { .. })
        ));
        assert!(registry.register("four", addr()).await.is_ok());
        assert_eq!(registry.device_count().await, 1);
    }

    #[tokio::test]
    async fn test_get_device() {
        let registry = DeviceRegistry::new();
        registry.register("A", addr()).await.unwrap();
        registry.register("B", addr()).await.unwrap();

        assert_eq!(registry.get(DeviceId(1)).await.unwrap().name(), "B");
        assert!(registry.get(DeviceId(2)).await.is_none());
    }

    #[tokio::test]
    async fn test_deactivate_all_closes_registry() {
        let registry = DeviceRegistry::new();
        let a = registry.register("A", addr()).await.unwrap();
        let b = registry.register("B", addr()).await.unwrap();

        assert_eq!(registry.deactivate_all().await, 2);

        assert!(!a.is_active());
        assert!(!b.is_active());
        assert_eq!(registry.active_count().await, 0);
        assert!(registry.is_closed().await);

        let result = registry.register("C", addr()).await;
        assert_eq!(result.unwrap_err(), RegistryError::Closed);
        assert_eq!(registry.device_count().await, 2);

        // Second sweep finds nothing left to deactivate
        assert_eq!(registry.deactivate_all().await, 0);
    }

    #[tokio::test]
    async fn test_first_id_code() {
        let registry = DeviceRegistry::with_config(
            RegistryConfig::default().first_id_code(100),
            SignalParams::default(),
        );

        let a = registry.register("A", addr()).await.unwrap();
        let b = registry.register("B", addr()).await.unwrap();

        assert_eq!(a.id_code(), 100);
        assert_eq!(b.id_code(), 101);
    }

    #[tokio::test]
    async fn test_concurrent_registration_respects_capacity() {
        let registry = Arc::new(DeviceRegistry::with_config(
            RegistryConfig::default().capacity(10),
            SignalParams::default(),
        ));

        let mut handles = Vec::new();
        for i in 0..25 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry.register(&format!("pmu{}", i), addr()).await.is_ok()
            }));
        }

        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                accepted += 1;
            }
        }

        assert_eq!(accepted, 10);
        assert_eq!(registry.device_count().await, 10);

        // Slots are dense and unique
        let ids: Vec<usize> = registry.devices().await.iter().map(|d| d.id().0).collect();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
    }
}
