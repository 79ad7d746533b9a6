//! # pmu-sim
//!
//! Simulates any number of synchrophasor measurement units (PMUs). Each
//! device synthesizes a slowly rotating phasor and streams one fixed-layout
//! IEEE C37.118-style data frame per tick to its own UDP destination.
//!
//! ## Modules
//!
//! - `protocol`: data frame layout, timestamps, encoding and decoding
//! - `signal`: deterministic phasor/frequency/ROCOF generator
//! - `registry`: capacity-bounded owner of all devices
//! - `server`: per-device streaming tasks and the `PmuSimulator` facade
//! - `transport`: UDP and in-process datagram senders
//! - `command` / `console`: the `addPMU` / `stop` text interface
//! - `stats`: per-device and simulator-wide counters
//!
//! ## Example
//!
//! ```no_run
//! use pmu_sim::{PmuSimulator, SimulatorConfig};
//!
//! # async fn example() -> pmu_sim::error::Result<()> {
//! let simulator = PmuSimulator::bind(SimulatorConfig::default()).await?;
//! simulator
//!     .add_device("substation-a", "127.0.0.1:4712".parse().unwrap())
//!     .await?;
//!
//! // ... frames stream once per second ...
//!
//! simulator.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod console;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod signal;
pub mod stats;
pub mod transport;

pub use command::Command;
pub use error::{Error, Result};
pub use protocol::{DataFrame, Timestamp};
pub use registry::{Device, DeviceId, DeviceRegistry, RegistryConfig};
pub use server::{PmuSimulator, SimulatorConfig, StreamingSupervisor};
pub use signal::{Measurement, SignalModel, SignalParams};
pub use transport::{ChannelTransport, Transport, UdpTransport};
