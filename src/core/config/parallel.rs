//! Parallel page recognition configuration.

use crate::core::config::ConfigValidator;
use crate::core::constants::DEFAULT_PARALLEL_PAGE_THRESHOLD;
use crate::core::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Controls whether per-page OCR is fanned out across a rayon thread pool.
///
/// Only recognition is parallelized. Section organization and chunk packing
/// always run once, sequentially, over the page-ordered region stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelPolicy {
    /// Maximum number of threads to use for parallel processing.
    /// If None, rayon will use the default thread pool size (typically number of CPU cores).
    #[serde(default)]
    pub max_threads: Option<usize>,

    /// Recognize pages concurrently instead of strictly one after another.
    #[serde(default)]
    pub parallel_pages: bool,

    /// Documents with fewer pages than this are recognized sequentially even when
    /// `parallel_pages` is set.
    #[serde(default = "ParallelPolicy::default_page_threshold")]
    pub page_threshold: usize,
}

impl ParallelPolicy {
    /// Create a new ParallelPolicy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of threads.
    pub fn with_max_threads(mut self, max_threads: Option<usize>) -> Self {
        self.max_threads = max_threads;
        self
    }

    /// Enable or disable concurrent page recognition.
    pub fn with_parallel_pages(mut self, enabled: bool) -> Self {
        self.parallel_pages = enabled;
        self
    }

    /// Set the minimum page count for concurrent recognition.
    pub fn with_page_threshold(mut self, threshold: usize) -> Self {
        self.page_threshold = threshold;
        self
    }

    /// Returns true when a document with `page_count` pages should be recognized concurrently.
    pub fn should_parallelize(&self, page_count: usize) -> bool {
        self.parallel_pages && page_count >= self.page_threshold.max(2)
    }

    /// Install the global rayon thread pool with the configured number of threads.
    ///
    /// This method should be called once at application startup before any parallel
    /// processing occurs. If `max_threads` is None, this method does nothing and
    /// rayon will use its default thread pool size.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the thread pool was successfully configured
    /// - `Ok(false)` if `max_threads` is None (no configuration needed)
    /// - `Err` if the thread pool has already been initialized
    pub fn install_global_thread_pool(&self) -> Result<bool, rayon::ThreadPoolBuildError> {
        if let Some(num_threads) = self.max_threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build_global()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn default_page_threshold() -> usize {
        DEFAULT_PARALLEL_PAGE_THRESHOLD
    }
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self {
            max_threads: None,
            parallel_pages: false,
            page_threshold: Self::default_page_threshold(),
        }
    }
}

impl ConfigValidator for ParallelPolicy {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_threads == Some(0) {
            return Err(ConfigError::invalid_field(
                "parallel.max_threads",
                "at least 1 when set",
                0,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_by_default() {
        let policy = ParallelPolicy::default();
        assert!(!policy.should_parallelize(100));
    }

    #[test]
    fn test_page_threshold() {
        let policy = ParallelPolicy::new()
            .with_parallel_pages(true)
            .with_page_threshold(4);
        assert!(!policy.should_parallelize(3));
        assert!(policy.should_parallelize(4));
    }

    #[test]
    fn test_single_page_never_parallel() {
        let policy = ParallelPolicy::new()
            .with_parallel_pages(true)
            .with_page_threshold(0);
        assert!(!policy.should_parallelize(1));
    }

    #[test]
    fn test_zero_threads_rejected() {
        let policy = ParallelPolicy::new().with_max_threads(Some(0));
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let policy: ParallelPolicy = serde_json::from_str(r#"{"parallel_pages": true}"#).unwrap();
        assert!(policy.parallel_pages);
        assert_eq!(policy.max_threads, None);
        assert_eq!(policy.page_threshold, DEFAULT_PARALLEL_PAGE_THRESHOLD);
    }
}
