//! Signal synthesis for simulated devices

pub mod model;

pub use model::{Measurement, SignalModel, SignalParams};
