//! Statistics for simulated devices

use std::time::{Duration, Instant};

/// Per-device streaming statistics
#[derive(Debug, Clone, Default)]
pub struct DeviceStats {
    /// Frames handed to the transport successfully
    pub frames_sent: u64,
    /// Total bytes sent
    pub bytes_sent: u64,
    /// Sends that returned an error
    pub send_failures: u64,
    /// Time since registration
    pub uptime: Duration,
    /// Time of the last successful send
    pub last_sent_at: Option<Instant>,
}

impl DeviceStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks attempted so far (sent plus failed)
    pub fn ticks(&self) -> u64 {
        self.frames_sent + self.send_failures
    }

    /// Average frames per second since registration
    pub fn frame_rate(&self) -> f64 {
        let secs = self.uptime.as_secs_f64();
        if secs > 0.0 {
            self.frames_sent as f64 / secs
        } else {
            0.0
        }
    }
}

/// Simulator-wide statistics
#[derive(Debug, Clone, Default)]
pub struct SimulatorStats {
    /// Devices ever registered
    pub registered_devices: usize,
    /// Devices still streaming
    pub active_devices: usize,
    /// Frames sent across all devices
    pub total_frames_sent: u64,
    /// Bytes sent across all devices
    pub total_bytes_sent: u64,
    /// Send failures across all devices
    pub total_send_failures: u64,
    /// Time since the simulator was created
    pub uptime: Duration,
}

impl SimulatorStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one device's counters into the totals
    pub fn accumulate(&mut self, device: &DeviceStats) {
        self.total_frames_sent += device.frames_sent;
        self.total_bytes_sent += device.bytes_sent;
        self.total_send_failures += device.send_failures;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_stats_new() {
        let stats = DeviceStats::new();
        assert_eq!(stats.frames_sent, 0);
        assert_eq!(stats.bytes_sent, 0);
        assert_eq!(stats.send_failures, 0);
        assert_eq!(stats.ticks(), 0);
        assert!(stats.last_sent_at.is_none());
    }

    #[test]
    fn test_device_stats_frame_rate() {
        let stats = DeviceStats {
            frames_sent: 30,
            uptime: Duration::from_secs(10),
            ..Default::default()
        };

        assert!((stats.frame_rate() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_device_stats_frame_rate_zero_uptime() {
        let stats = DeviceStats {
            frames_sent: 5,
            ..Default::default()
        };

        assert_eq!(stats.frame_rate(), 0.0);
    }

    #[test]
    fn test_ticks_counts_failures() {
        let stats = DeviceStats {
            frames_sent: 4,
            send_failures: 2,
            ..Default::default()
        };

        assert_eq!(stats.ticks(), 6);
    }

    #[test]
    fn test_simulator_stats_accumulate() {
        let mut total = SimulatorStats::new();
        let a = DeviceStats {
            frames_sent: 3,
            bytes_sent: 78,
            send_failures: 1,
            ..Default::default()
        };
        let b = DeviceStats {
            frames_sent: 2,
            bytes_sent: 52,
            ..Default::default()
        };

        total.accumulate(&a);
        total.accumulate(&b);

        assert_eq!(total.total_frames_sent, 5);
        assert_eq!(total.total_bytes_sent, 130);
        assert_eq!(total.total_send_failures, 1);
    }
}
