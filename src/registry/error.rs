//! Registry error types
//!
//! Error types for device registry operations. None of them leave the
//! registry in a modified state.

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Registry already holds `capacity` devices
    CapacityExceeded { capacity: usize },
    /// Name is empty or longer than the configured maximum
    InvalidName { name: String, max_len: usize },
    /// Registry was closed by shutdown
    Closed,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::CapacityExceeded { capacity } => {
                write!(f, "Max PMU limit reached ({} devices)", capacity)
            }
            RegistryError::InvalidName { name, max_len } if name.is_empty() => {
                write!(f, "Invalid PMU name: name must be 1 to {} bytes", max_len)
            }
            RegistryError::InvalidName { name, max_len } => {
                write!(
                    f,
                    "Invalid PMU name '{}': longer than {} bytes",
                    name, max_len
                )
            }
            RegistryError::Closed => write!(f, "Simulator is shutting down"),
        }
    }
}

impl std::error::Error for RegistryError {}
