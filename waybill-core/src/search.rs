//! Search parameters handed to an [`crate::Oracle`].

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Construction heuristic for the first solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum FirstSolutionStrategy {
    /// Extend each route with the cheapest arc from its last node.
    #[default]
    PathCheapestArc,
    /// Place job nodes by decreasing demand, each at the position that raises
    /// route cost the least across all vehicles.
    ParallelCheapestInsertion,
}

/// Improvement strategy applied after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum Metaheuristic {
    /// Penalise frequently used arcs to escape local optima.
    #[default]
    GuidedLocalSearch,
    /// Stop at the first local optimum.
    GreedyDescent,
}

/// Limits and strategies for one solve.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use waybill_core::{Metaheuristic, SearchParameters};
///
/// let params = SearchParameters::default();
/// assert_eq!(params.metaheuristic, Metaheuristic::GuidedLocalSearch);
/// assert_eq!(params.time_limit, Duration::from_secs(1));
/// assert_eq!(params.gls_lambda_percent, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SearchParameters {
    /// Construction heuristic tried first. The native engine falls back to
    /// the other one when it cannot place every job; `vrp-core` builds its
    /// own initial population and ignores this field.
    pub first_solution: FirstSolutionStrategy,
    /// Improvement strategy.
    pub metaheuristic: Metaheuristic,
    /// Wall-clock budget for the improvement phase.
    pub time_limit: Duration,
    /// Optional cap on improvement iterations.
    pub iteration_limit: Option<u64>,
    /// Guided local search lambda as a percentage of the average arc cost.
    pub gls_lambda_percent: u64,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            first_solution: FirstSolutionStrategy::default(),
            metaheuristic: Metaheuristic::default(),
            time_limit: Duration::from_secs(1),
            iteration_limit: None,
            gls_lambda_percent: 10,
        }
    }
}

impl SearchParameters {
    /// Replace the time budget.
    #[must_use]
    pub const fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    /// Cap the number of improvement iterations.
    #[must_use]
    pub const fn with_iteration_limit(mut self, iterations: u64) -> Self {
        self.iteration_limit = Some(iterations);
        self
    }

    /// Replace the construction heuristic.
    #[must_use]
    pub const fn with_first_solution(mut self, strategy: FirstSolutionStrategy) -> Self {
        self.first_solution = strategy;
        self
    }

    /// Replace the improvement strategy.
    #[must_use]
    pub const fn with_metaheuristic(mut self, metaheuristic: Metaheuristic) -> Self {
        self.metaheuristic = metaheuristic;
        self
    }
}
