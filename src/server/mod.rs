//! Simulator runtime
//!
//! This module provides:
//! - Simulator configuration
//! - The streaming supervisor running one task per device
//! - `PmuSimulator`, which wires registration and shutdown together

pub mod config;
pub mod simulator;
pub mod supervisor;

pub use config::SimulatorConfig;
pub use simulator::PmuSimulator;
pub use supervisor::StreamingSupervisor;
