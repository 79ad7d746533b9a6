//! Device registry
//!
//! The registry owns every simulated device and bounds how many can exist.
//! Each device is shared with exactly one streaming task through an
//! `Arc<Device>`; tasks can read and update their own device but cannot add
//! or remove entries.
//!
//! # Architecture
//!
//! ```text
//!                        Arc<DeviceRegistry>
//!                   ┌───────────────────────────┐
//!                   │ slots: RwLock<Vec<        │
//!                   │   Arc<Device> {           │
//!                   │     signal, status,       │
//!                   │     active: AtomicBool,   │
//!                   │   }                       │
//!                   │ >                         │
//!                   └─────────────┬─────────────┘
//!                                 │
//!         ┌───────────────────────┼───────────────────────┐
//!         │                       │                       │
//!         ▼                       ▼                       ▼
//!    [task #0]               [task #1]               [task #2]
//!    advance()               advance()               advance()
//!    encode()                encode()                encode()
//!    send_to() ──► UDP       send_to() ──► UDP       send_to() ──► UDP
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod store;

pub use config::RegistryConfig;
pub use entry::{Device, DeviceId};
pub use error::RegistryError;
pub use store::DeviceRegistry;
