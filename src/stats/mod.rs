//! Streaming statistics

pub mod metrics;

pub use metrics::{DeviceStats, SimulatorStats};
