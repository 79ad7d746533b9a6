//! Frame timestamps
//!
//! The data frame carries wall-clock time in two fields:
//!
//! ```text
//! +----------------+--------------------------------+
//! | high (16 bits) | low (32 bits)                  |
//! | secs >> 16     | (secs & 0xFFFF) << 16 | ticks  |
//! +----------------+--------------------------------+
//! ```
//!
//! `ticks` is the sub-second fraction in units of 1/65536 s, so within one
//! 65536 s window the low field grows monotonically with time.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::constants::TIME_BASE;

/// Wall-clock timestamp split into frame fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    /// High 16 bits of Unix seconds
    pub high: u16,
    /// Low 16 bits of Unix seconds in the upper half, fraction ticks in the lower half
    pub low: u32,
}

impl Timestamp {
    /// Sample the system clock
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    /// Build from a point in time; times before the epoch clamp to zero
    pub fn from_system_time(time: SystemTime) -> Self {
        let since_epoch = time.duration_since(UNIX_EPOCH).unwrap_or_default();
        Self::from_unix(since_epoch)
    }

    /// Build from a duration since the Unix epoch
    pub fn from_unix(since_epoch: Duration) -> Self {
        let secs = since_epoch.as_secs();
        let ticks = (u64::from(since_epoch.subsec_nanos()) * u64::from(TIME_BASE)) / 1_000_000_000;

        Self {
            high: (secs >> 16) as u16,
            low: (((secs & 0xFFFF) as u32) << 16) | ticks as u32,
        }
    }

    /// Reassemble the (32-bit) Unix seconds
    pub fn unix_seconds(&self) -> u32 {
        (u32::from(self.high) << 16) | (self.low >> 16)
    }

    /// Sub-second fraction in 1/65536 s ticks
    pub fn fraction(&self) -> u16 {
        (self.low & 0xFFFF) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_fields() {
        // 0x1234_5678 seconds + half a second
        let ts = Timestamp::from_unix(Duration::new(0x1234_5678, 500_000_000));

        assert_eq!(ts.high, 0x1234);
        assert_eq!(ts.low, 0x5678_8000);
        assert_eq!(ts.unix_seconds(), 0x1234_5678);
        assert_eq!(ts.fraction(), 0x8000);
    }

    #[test]
    fn test_fraction_never_spills_into_seconds() {
        let ts = Timestamp::from_unix(Duration::new(7, 999_999_999));

        assert_eq!(ts.unix_seconds(), 7);
        assert_eq!(ts.fraction(), 0xFFFF);
    }

    #[test]
    fn test_low_field_increases_with_time() {
        let base = Duration::new(1_700_000_000, 250_000_000);
        let a = Timestamp::from_unix(base);
        let b = Timestamp::from_unix(base + Duration::from_millis(20));
        let c = Timestamp::from_unix(base + Duration::from_secs(1));

        assert!(a.low < b.low);
        assert!(b.low < c.low);
    }

    #[test]
    fn test_before_epoch_clamps() {
        let ts = Timestamp::from_system_time(UNIX_EPOCH - Duration::from_secs(10));

        assert_eq!(ts, Timestamp { high: 0, low: 0 });
    }
}
