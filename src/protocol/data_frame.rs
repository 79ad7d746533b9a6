//! Data frame encoding and decoding
//!
//! Fixed-layout subset of an IEEE C37.118 data frame carrying one
//! rectangular integer phasor, frequency deviation and ROCOF. No CRC.
//!
//! ```text
//! offset  size  field
//!      0     2  SYNC        0xAA01
//!      2     2  FRAMESIZE   declared size (legacy constant)
//!      4     2  IDCODE
//!      6     2  TS high     Unix seconds >> 16
//!      8     4  TS low      (seconds & 0xFFFF) << 16 | fraction
//!     12     2  STAT
//!     14     4  PHASOR re   round(mag * cos(angle) * 1000)
//!     18     4  PHASOR im   round(mag * sin(angle) * 1000)
//!     22     2  FREQ        round((f - nominal) * 1000 + 5000)
//!     24     2  DFREQ       round(rocof * 1000)
//! ```
//!
//! All multi-byte fields are big-endian. Scaled values that do not fit their
//! field are narrowed with wrapping integer conversion, so out-of-range
//! measurements may alias rather than fail.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::FrameError;
use crate::signal::Measurement;

use super::constants::{
    DATA_FRAME_LEN, DATA_FRAME_SYNC, DECLARED_FRAME_SIZE, FIXED_POINT_SCALE,
    FREQ_DEVIATION_OFFSET,
};
use super::timestamp::Timestamp;

/// One encoded-ready data frame
///
/// Holds the already-scaled integer fields exactly as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataFrame {
    /// Sync word
    pub sync: u16,
    /// Declared frame size field
    pub frame_size: u16,
    /// Device ID code
    pub id_code: u16,
    /// Wall-clock time of the measurement
    pub timestamp: Timestamp,
    /// Digital status word
    pub status: u16,
    /// Phasor real part, scaled by 1000
    pub phasor_real: i32,
    /// Phasor imaginary part, scaled by 1000
    pub phasor_imag: i32,
    /// Frequency deviation from nominal, scaled by 1000 and offset by 5000
    pub freq: u16,
    /// ROCOF scaled by 1000
    pub dfreq: i16,
}

impl DataFrame {
    /// Scale a measurement into frame fields
    pub fn from_measurement(
        id_code: u16,
        timestamp: Timestamp,
        status: u16,
        measurement: &Measurement,
        nominal_frequency: f64,
    ) -> Self {
        let angle = measurement.angle.to_radians();
        let real = measurement.magnitude * angle.cos() * FIXED_POINT_SCALE;
        let imag = measurement.magnitude * angle.sin() * FIXED_POINT_SCALE;
        let freq = (measurement.frequency - nominal_frequency) * FIXED_POINT_SCALE
            + FREQ_DEVIATION_OFFSET;
        let dfreq = measurement.rocof * FIXED_POINT_SCALE;

        Self {
            sync: DATA_FRAME_SYNC,
            frame_size: DECLARED_FRAME_SIZE,
            id_code,
            timestamp,
            status,
            phasor_real: narrow(real) as i32,
            phasor_imag: narrow(imag) as i32,
            freq: narrow(freq) as u16,
            dfreq: narrow(dfreq) as i16,
        }
    }

    /// Encode into a fresh buffer of [`DATA_FRAME_LEN`] bytes
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(DATA_FRAME_LEN);
        self.encode_into(&mut buf);
        buf.freeze()
    }

    /// Append the encoded frame to `buf`
    pub fn encode_into(&self, buf: &mut BytesMut) {
        buf.reserve(DATA_FRAME_LEN);
        buf.put_u16(self.sync);
        buf.put_u16(self.frame_size);
        buf.put_u16(self.id_code);
        buf.put_u16(self.timestamp.high);
        buf.put_u32(self.timestamp.low);
        buf.put_u16(self.status);
        buf.put_i32(self.phasor_real);
        buf.put_i32(self.phasor_imag);
        buf.put_u16(self.freq);
        buf.put_i16(self.dfreq);
    }

    /// Decode a frame from the start of `data`
    ///
    /// Trailing bytes beyond [`DATA_FRAME_LEN`] are ignored. The declared
    /// frame size field is returned as-is and not validated.
    pub fn decode(mut data: &[u8]) -> Result<Self, FrameError> {
        if data.len() < DATA_FRAME_LEN {
            return Err(FrameError::Truncated {
                expected: DATA_FRAME_LEN,
                actual: data.len(),
            });
        }

        let sync = data.get_u16();
        if sync != DATA_FRAME_SYNC {
            return Err(FrameError::InvalidSync(sync));
        }

        Ok(Self {
            sync,
            frame_size: data.get_u16(),
            id_code: data.get_u16(),
            timestamp: Timestamp {
                high: data.get_u16(),
                low: data.get_u32(),
            },
            status: data.get_u16(),
            phasor_real: data.get_i32(),
            phasor_imag: data.get_i32(),
            freq: data.get_u16(),
            dfreq: data.get_i16(),
        })
    }

    /// Phasor magnitude in measurement units
    pub fn phasor_magnitude(&self) -> f64 {
        let re = f64::from(self.phasor_real) / FIXED_POINT_SCALE;
        let im = f64::from(self.phasor_imag) / FIXED_POINT_SCALE;
        re.hypot(im)
    }

    /// Phasor angle in degrees, normalized to [0, 360)
    pub fn phasor_angle_degrees(&self) -> f64 {
        let deg = f64::from(self.phasor_imag)
            .atan2(f64::from(self.phasor_real))
            .to_degrees();
        if deg < 0.0 {
            deg + 360.0
        } else {
            deg
        }
    }

    /// Frequency in Hz, given the nominal frequency used when encoding
    pub fn frequency(&self, nominal_frequency: f64) -> f64 {
        nominal_frequency + (f64::from(self.freq) - FREQ_DEVIATION_OFFSET) / FIXED_POINT_SCALE
    }

    /// ROCOF in Hz/s
    pub fn rocof(&self) -> f64 {
        f64::from(self.dfreq) / FIXED_POINT_SCALE
    }
}

/// Round and narrow through i64 so the final cast wraps to the field width
fn narrow(value: f64) -> i64 {
    value.round() as i64
}
