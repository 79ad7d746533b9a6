//! Phasor signal synthesis
//!
//! Each tick advances the phase angle by a fixed step and derives magnitude,
//! frequency and ROCOF from it:
//!
//! ```text
//! angle'    = (angle + step) mod 360
//! magnitude = base + amp_m * sin(angle')
//! frequency = nominal + amp_f * cos(angle')
//! rocof     = amp_r * sin(angle')
//! ```

/// Signal model parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalParams {
    /// Phase advance per tick in degrees
    pub step_degrees: f64,
    /// Magnitude at zero modulation
    pub base_magnitude: f64,
    /// Magnitude modulation amplitude
    pub amplitude_m: f64,
    /// Nominal system frequency in Hz
    pub nominal_frequency: f64,
    /// Frequency modulation amplitude in Hz
    pub amplitude_f: f64,
    /// ROCOF amplitude in Hz/s
    pub amplitude_r: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            step_degrees: 1.0,
            base_magnitude: 1.0,
            amplitude_m: 0.1,
            nominal_frequency: 50.0,
            amplitude_f: 0.05,
            amplitude_r: 0.01,
        }
    }
}

impl SignalParams {
    /// Set the per-tick phase step
    pub fn step_degrees(mut self, step: f64) -> Self {
        self.step_degrees = step;
        self
    }

    /// Set the nominal frequency (typically 50 or 60 Hz)
    pub fn nominal_frequency(mut self, hz: f64) -> Self {
        self.nominal_frequency = hz;
        self
    }
}

/// One instant of a device's signal state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Phase angle in degrees, in [0, 360)
    pub angle: f64,
    /// Phasor magnitude
    pub magnitude: f64,
    /// Frequency in Hz
    pub frequency: f64,
    /// Rate of change of frequency in Hz/s
    pub rocof: f64,
}

impl Measurement {
    /// State of a freshly registered device
    pub fn initial(params: &SignalParams) -> Self {
        Self {
            angle: 0.0,
            magnitude: params.base_magnitude,
            frequency: params.nominal_frequency,
            rocof: 0.0,
        }
    }
}

/// Deterministic rotating-phasor generator
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalModel {
    params: SignalParams,
}

impl SignalModel {
    pub fn new(params: SignalParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SignalParams {
        &self.params
    }

    /// Compute the measurement following `angle`
    ///
    /// Non-finite input angles restart from zero.
    pub fn step(&self, angle: f64) -> Measurement {
        let start = if angle.is_finite() { angle } else { 0.0 };
        let angle = wrap_degrees(start + self.params.step_degrees);
        let (sin, cos) = angle.to_radians().sin_cos();

        Measurement {
            angle,
            magnitude: self.params.base_magnitude + self.params.amplitude_m * sin,
            frequency: self.params.nominal_frequency + self.params.amplitude_f * cos,
            rocof: self.params.amplitude_r * sin,
        }
    }
}

/// Normalize to [0, 360)
fn wrap_degrees(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
