//! Solver configuration (spec §6, §10).

use std::time::Duration;

use crate::constructive::ParameterPoint;

/// Options recognized by [`crate::solve`] (spec §6).
///
/// Builder-style, matching the `with_*` conventions used elsewhere in this
/// crate (e.g. `Vehicle::with_depot`) rather than a separate config-file
/// format.
#[derive(Debug, Clone)]
pub struct SolveConfig {
    nb_searches: usize,
    depth: usize,
    nb_threads: usize,
    timeout: Option<Duration>,
    heuristic_params: Option<Vec<ParameterPoint>>,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self { nb_searches: 8, depth: 4, nb_threads: 4, timeout: None, heuristic_params: None }
    }
}

impl SolveConfig {
    /// Creates a config with the defaults: 8 searches, depth 4, 4 threads,
    /// no timeout, and the curated parameter-point list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many parameter points to try, capped to the parameter list's
    /// length at solve time.
    pub fn with_nb_searches(mut self, nb_searches: usize) -> Self {
        self.nb_searches = nb_searches.max(1);
        self
    }

    /// Sets the local-search outer-loop bound without improvement.
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth.max(1);
        self
    }

    /// Sets the worker thread count.
    pub fn with_nb_threads(mut self, nb_threads: usize) -> Self {
        self.nb_threads = nb_threads.max(1);
        self
    }

    /// Sets a wall-clock timeout, divided equally among searches.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides the built-in curated parameter-point list.
    pub fn with_heuristic_params(mut self, params: Vec<ParameterPoint>) -> Self {
        self.heuristic_params = Some(params);
        self
    }

    /// Number of parameter points to try.
    pub fn nb_searches(&self) -> usize {
        self.nb_searches
    }

    /// Local-search outer-loop bound without improvement.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Worker thread count.
    pub fn nb_threads(&self) -> usize {
        self.nb_threads
    }

    /// Wall-clock timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Parameter-point override, if any.
    pub fn heuristic_params(&self) -> Option<&[ParameterPoint]> {
        self.heuristic_params.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SolveConfig::new();
        assert_eq!(config.nb_searches(), 8);
        assert_eq!(config.depth(), 4);
        assert_eq!(config.nb_threads(), 4);
        assert!(config.timeout().is_none());
        assert!(config.heuristic_params().is_none());
    }

    #[test]
    fn test_builder_clamps_to_at_least_one() {
        let config = SolveConfig::new().with_nb_searches(0).with_depth(0).with_nb_threads(0);
        assert_eq!(config.nb_searches(), 1);
        assert_eq!(config.depth(), 1);
        assert_eq!(config.nb_threads(), 1);
    }

    #[test]
    fn test_builder_sets_timeout() {
        let config = SolveConfig::new().with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    }
}
