//! Pool configuration.

use crate::error::{Error, Result};

/// Worker threads a pool runs with when no count is configured.
pub const DEFAULT_WORKER_THREADS: usize = 4;

/// Configuration for a [`WorkerPool`](crate::executor::WorkerPool).
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of worker threads, or `None` for the default of
    /// [`DEFAULT_WORKER_THREADS`]. Fixed for the pool's lifetime.
    pub num_threads: Option<usize>,

    /// Prefix used to name worker threads (`<prefix>-<id>`).
    pub thread_name_prefix: String,

    /// Stack size for worker threads, or `None` for the platform default.
    pub stack_size: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_threads: None,
            thread_name_prefix: "threadwell".to_string(),
            stack_size: Some(2 * 1024 * 1024),
        }
    }
}

impl Config {
    /// Start building a configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Check the configuration for unusable values.
    pub fn validate(&self) -> Result<()> {
        if let Some(n) = self.num_threads {
            if n == 0 {
                return Err(Error::config("num_threads must be > 0"));
            }
            if n > 1024 {
                return Err(Error::config("num_threads too large (max 1024)"));
            }
        }

        if self.thread_name_prefix.is_empty() {
            return Err(Error::config("thread_name_prefix must not be empty"));
        }

        Ok(())
    }

    /// Resolved worker thread count.
    pub fn worker_threads(&self) -> usize {
        self.num_threads.unwrap_or(DEFAULT_WORKER_THREADS)
    }
}

/// Builder for [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a builder holding the default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the worker thread count.
    pub fn num_threads(mut self, n: usize) -> Self {
        self.config.num_threads = Some(n);
        self
    }

    /// Size the pool to the machine's hardware parallelism.
    pub fn auto_threads(mut self) -> Self {
        self.config.num_threads = Some(num_cpus::get());
        self
    }

    /// Set the worker thread name prefix.
    pub fn thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    /// Set the worker thread stack size in bytes.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_resolves_to_four_threads() {
        let config = Config::default();
        assert_eq!(config.worker_threads(), DEFAULT_WORKER_THREADS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_threads_rejected() {
        let result = Config::builder().num_threads(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn oversized_pool_rejected() {
        let result = Config::builder().num_threads(4096).build();
        assert!(result.is_err());
    }

    #[test]
    fn auto_threads_matches_parallelism() {
        let config = Config::builder().auto_threads().build().unwrap();
        assert_eq!(config.worker_threads(), num_cpus::get());
        assert!(config.worker_threads() > 0);
    }

    #[test]
    fn builder_sets_thread_naming() {
        let config = Config::builder()
            .num_threads(2)
            .thread_name_prefix("io")
            .stack_size(512 * 1024)
            .build()
            .unwrap();

        assert_eq!(config.worker_threads(), 2);
        assert_eq!(config.thread_name_prefix, "io");
        assert_eq!(config.stack_size, Some(512 * 1024));
    }
}
