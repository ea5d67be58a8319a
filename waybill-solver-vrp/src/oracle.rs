//! `VrpOracle` implementation backed by `vrp-core`.

use log::debug;
use waybill_core::{Assignment, Oracle, OracleError, RoutingModel, SearchParameters};

use crate::vrp::{SearchLimits, VrpSolveContext};

/// Configuration for [`VrpOracle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VrpOracleConfig {
    /// Upper bound on `vrp-core` generations when the search parameters set
    /// no iteration limit.
    pub max_generations: usize,
}

impl Default for VrpOracleConfig {
    fn default() -> Self {
        Self {
            max_generations: 50,
        }
    }
}

/// Routing engine using the `vrp-core` evolutionary metaheuristics.
///
/// # Examples
/// ```
/// use waybill_core::{RoutingSolver, SearchParameters, Solver, SolverConfig};
/// use waybill_core::test_support::two_job_request;
/// use waybill_solver_vrp::VrpOracle;
///
/// let config = SolverConfig {
///     search: SearchParameters::default().with_iteration_limit(20),
///     ..SolverConfig::default()
/// };
/// let solver = RoutingSolver::with_config(VrpOracle::new(), config);
/// let response = solver.solve(&two_job_request()).unwrap();
/// assert_eq!(response.result.total_delivery_duration, 7);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct VrpOracle {
    config: VrpOracleConfig,
}

impl VrpOracle {
    /// Construct an engine using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(VrpOracleConfig::default())
    }

    /// Construct an engine with explicit configuration.
    #[must_use]
    pub const fn with_config(config: VrpOracleConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &VrpOracleConfig {
        &self.config
    }
}

impl Oracle for VrpOracle {
    fn solve(
        &self,
        model: &RoutingModel<'_>,
        params: &SearchParameters,
    ) -> Result<Assignment, OracleError> {
        let limits = SearchLimits::new(&self.config, params);
        debug!(
            "vrp-core search: {} generations, {}s",
            limits.generations, limits.seconds
        );
        VrpSolveContext::new(limits).solve(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_config_runs_fifty_generations() {
        assert_eq!(VrpOracle::new().config().max_generations, 50);
    }

    #[rstest]
    fn explicit_config_is_kept() {
        let oracle = VrpOracle::with_config(VrpOracleConfig { max_generations: 7 });
        assert_eq!(oracle.config(), &VrpOracleConfig { max_generations: 7 });
    }
}
