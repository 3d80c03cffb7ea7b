//! FPGA fitness configuration.
//!
//! [`FpgaConfig`] only controls *how* the pass is executed. The assigned
//! fitness values never depend on it.

/// Configuration for [`FpgaFitness`](super::FpgaFitness).
///
/// # Defaults
///
/// ```
/// use u_fpga_fitness::fpga::FpgaConfig;
///
/// let config = FpgaConfig::default();
/// assert!(config.parallel);
/// assert_eq!(config.parallel_threshold, 64);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_fpga_fitness::fpga::FpgaConfig;
///
/// let config = FpgaConfig::default()
///     .with_parallel(true)
///     .with_parallel_threshold(256);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FpgaConfig {
    /// Whether to compute strength and fitness in parallel using rayon.
    pub parallel: bool,

    /// Minimum population size for the parallel path.
    ///
    /// The pass is O(n²) comparator calls; below this size the thread-pool
    /// overhead dominates and the sequential path is used even when
    /// `parallel` is set.
    pub parallel_threshold: usize,
}

impl Default for FpgaConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 64,
        }
    }
}

impl FpgaConfig {
    /// Enables or disables parallel computation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the minimum population size for the parallel path.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Preset that always runs on the calling thread.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Whether a population of `size` solutions takes the parallel path.
    pub fn runs_parallel(&self, size: usize) -> bool {
        self.parallel && size >= self.parallel_threshold
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.parallel_threshold == 0 {
            return Err("parallel_threshold must be at least 1".into());
        }
        Ok(())
    }
}
