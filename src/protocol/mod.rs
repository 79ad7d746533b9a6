//! Synchrophasor wire protocol
//!
//! This module provides:
//! - Data frame constants (sync word, declared size, scaling)
//! - Wall-clock timestamp splitting
//! - Data frame encoding and decoding

pub mod constants;
pub mod data_frame;
pub mod timestamp;

pub use constants::{DATA_FRAME_LEN, DATA_FRAME_SYNC, DECLARED_FRAME_SIZE};
pub use data_frame::DataFrame;
pub use timestamp::Timestamp;
