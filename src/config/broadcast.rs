//! Broadcast worker pool configuration

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Jobs allowed to wait for a worker before submissions are refused
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Finished jobs whose status stays queryable; older ones are evicted
    #[serde(default = "default_retained_jobs")]
    pub retained_jobs: usize,
}

impl BroadcastConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.workers == 0 {
            return Err(ValidationError::InvalidWorkerCount);
        }
        if self.queue_capacity == 0 {
            return Err(ValidationError::InvalidQueueCapacity);
        }
        if self.retained_jobs == 0 {
            return Err(ValidationError::InvalidJobRetention);
        }
        Ok(())
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
            retained_jobs: default_retained_jobs(),
        }
    }
}

fn default_workers() -> usize {
    2
}

fn default_queue_capacity() -> usize {
    16
}

fn default_retained_jobs() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = BroadcastConfig::default();
        assert_eq!((config.workers, config.queue_capacity), (2, 16));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let config = BroadcastConfig {
            workers: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidWorkerCount));

        let config = BroadcastConfig {
            queue_capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidQueueCapacity));

        let config = BroadcastConfig {
            retained_jobs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidJobRetention));
    }
}
