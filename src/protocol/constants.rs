//! C37.118 data frame constants

/// Sync word for a data frame (0xAA leader, frame type 0, version 1)
pub const DATA_FRAME_SYNC: u16 = 0xAA01;

/// Value written to the frame-size header field.
///
/// This is the legacy declared size and does not match [`DATA_FRAME_LEN`].
/// Receivers must not rely on it to size the datagram.
pub const DECLARED_FRAME_SIZE: u16 = 18;

/// Number of bytes actually written and sent per data frame
pub const DATA_FRAME_LEN: usize = 26;

/// Scale applied to phasor components, frequency deviation and ROCOF
pub const FIXED_POINT_SCALE: f64 = 1000.0;

/// Offset added to the scaled frequency deviation
pub const FREQ_DEVIATION_OFFSET: f64 = 5000.0;

/// Sub-second ticks per second in the timestamp-low field
pub const TIME_BASE: u32 = 1 << 16;
