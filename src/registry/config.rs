//! Registry configuration

/// Maximum simultaneously registered devices
pub const DEFAULT_CAPACITY: usize = 100;

/// Longest accepted device name in bytes
pub const DEFAULT_MAX_NAME_LEN: usize = 49;

/// Configuration for the device registry
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Hard bound on the number of registered devices
    pub capacity: usize,

    /// Maximum device name length in bytes
    pub max_name_len: usize,

    /// ID code given to the first registered device; later devices count up
    pub first_id_code: u16,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_name_len: DEFAULT_MAX_NAME_LEN,
            first_id_code: 1,
        }
    }
}

impl RegistryConfig {
    /// Set the device capacity
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the maximum name length
    pub fn max_name_len(mut self, len: usize) -> Self {
        self.max_name_len = len;
        self
    }

    /// Set the first ID code
    pub fn first_id_code(mut self, id_code: u16) -> Self {
        self.first_id_code = id_code;
        self
    }
}
