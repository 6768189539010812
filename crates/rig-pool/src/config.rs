//! Pool capacity and the pooling policy predicate.
//!
//! Pooling is only worth its keep when more than one test runs at a time
//! and the suite can tolerate drivers being launched ahead of use (i.e.
//! headless, against an isolated backend). Rather than bury that policy
//! inside the pool, the predicate lives here where suites can read it,
//! tweak its inputs, or override it outright.

/// Default number of ready drivers to keep warm.
pub const DEFAULT_CAPACITY: usize = 2;

/// Configuration for a `DriverPool`.
///
/// The `pooling` override short-circuits the policy predicate; leave it
/// unset to let the environment decide.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of ready drivers held by the pool.
    pub capacity: usize,

    /// Whether drivers run headless. Visible drivers are never pooled;
    /// nobody wants spare browser windows opening ahead of use.
    pub headless: bool,

    /// Whether the suite runs against an isolated backend (e.g. a local
    /// emulator). Pre-launching drivers against shared infrastructure is
    /// not worth the risk.
    pub isolated: bool,

    /// Expected parallelism, defaulting to the host core count. A serial
    /// suite gains nothing from a warm pool.
    pub parallelism: usize,

    /// Explicit pooling override. `Some(_)` wins over the predicate.
    pub pooling: Option<bool>,
}

impl PoolConfig {
    /// Creates a config with defaults: capacity 2, headless, not
    /// isolated, parallelism detected from the host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pool capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the headless flag.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Marks the suite as running against an isolated backend.
    #[must_use]
    pub fn isolated(mut self, isolated: bool) -> Self {
        self.isolated = isolated;
        self
    }

    /// Overrides the detected parallelism.
    #[must_use]
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Forces pooling on or off, bypassing the predicate.
    #[must_use]
    pub fn with_pooling(mut self, pooling: bool) -> Self {
        self.pooling = Some(pooling);
        self
    }

    /// Decides whether the pool should run its replenishment task.
    ///
    /// The explicit override wins; otherwise pooling requires a headless,
    /// isolated, multi-core environment. When this returns false the pool
    /// degenerates to create-on-demand.
    #[must_use]
    pub fn pooling_enabled(&self) -> bool {
        self.pooling
            .unwrap_or(self.isolated && self.headless && self.parallelism > 1)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            headless: true,
            isolated: false,
            parallelism: detected_parallelism(),
            pooling: None,
        }
    }
}

/// Host core count, falling back to 1 when detection fails.
fn detected_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicate_requires_all_three_conditions() {
        let base = PoolConfig::new()
            .headless(true)
            .isolated(true)
            .with_parallelism(4);
        assert!(base.pooling_enabled());

        assert!(!base.clone().headless(false).pooling_enabled());
        assert!(!base.clone().isolated(false).pooling_enabled());
        assert!(!base.clone().with_parallelism(1).pooling_enabled());
    }

    #[test]
    fn override_beats_predicate() {
        let off = PoolConfig::new()
            .headless(true)
            .isolated(true)
            .with_parallelism(8)
            .with_pooling(false);
        assert!(!off.pooling_enabled());

        let on = PoolConfig::new()
            .headless(false)
            .with_parallelism(1)
            .with_pooling(true);
        assert!(on.pooling_enabled());
    }

    #[test]
    fn defaults_are_sane() {
        let config = PoolConfig::default();
        assert_eq!(config.capacity, DEFAULT_CAPACITY);
        assert!(config.parallelism >= 1);
    }
}
