//! Router configuration

/// Default size in bytes of each read loop's transfer buffer
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024;

/// Tunable settings for a [`Router`](super::Router)
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Size in bytes of the transfer buffer each read loop allocates
    pub read_buffer_size: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

impl RouterConfig {
    /// Set the transfer buffer size, floored at one byte
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default();
        assert_eq!(config.read_buffer_size, 1024);
    }

    #[test]
    fn test_builder_sets_buffer_size() {
        let config = RouterConfig::default().read_buffer_size(64);
        assert_eq!(config.read_buffer_size, 64);
    }

    #[test]
    fn test_buffer_size_is_floored_at_one() {
        let config = RouterConfig::default().read_buffer_size(0);
        assert_eq!(config.read_buffer_size, 1);
    }
}
