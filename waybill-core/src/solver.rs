//! The solve pipeline: validate, model, search, decode.

use std::time::Instant;

use log::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    Diagnostics, FleetModelBuilder, GraphBuilder, ModelConfig, Oracle, ProblemInstance,
    RoutingModel, SearchParameters, SolutionDecoder, SolveError, SolveRequest, SolveResponse,
    ValidationError,
};

/// Find routes for a request.
///
/// Implementations return [`SolveError::Validation`] for malformed requests
/// and [`SolveError::Infeasible`] when no assignment fits the limits, rather
/// than panicking or returning an empty result.
/// Solvers must be `Send + Sync` to operate safely across threads.
pub trait Solver: Send + Sync {
    /// Solve a request, producing routes or an error.
    fn solve(&self, request: &SolveRequest) -> Result<SolveResponse, SolveError>;
}

/// Model and search settings for a [`RoutingSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SolverConfig {
    /// Constraint model settings.
    pub model: ModelConfig,
    /// Engine limits and strategies.
    pub search: SearchParameters,
}

/// Runs the full pipeline around an [`Oracle`].
///
/// # Examples
/// ```
/// use waybill_core::{
///     Assignment, Oracle, OracleError, RoutingModel, RoutingSolver, SearchParameters,
///     SolveError, SolveRequest, Solver,
/// };
///
/// struct NoRoutes;
///
/// impl Oracle for NoRoutes {
///     fn solve(
///         &self,
///         _model: &RoutingModel<'_>,
///         _params: &SearchParameters,
///     ) -> Result<Assignment, OracleError> {
///         Err(OracleError::Infeasible)
///     }
/// }
///
/// let solver = RoutingSolver::new(NoRoutes);
/// let err = solver.solve(&SolveRequest::default()).unwrap_err();
/// assert!(matches!(err, SolveError::Validation(_)));
/// ```
#[derive(Debug, Clone)]
pub struct RoutingSolver<O> {
    oracle: O,
    config: SolverConfig,
}

impl<O: Oracle> RoutingSolver<O> {
    /// Solver with default settings.
    pub fn new(oracle: O) -> Self {
        Self::with_config(oracle, SolverConfig::default())
    }

    /// Solver with explicit settings.
    pub const fn with_config(oracle: O, config: SolverConfig) -> Self {
        Self { oracle, config }
    }

    /// Active settings.
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The wrapped engine.
    pub const fn oracle(&self) -> &O {
        &self.oracle
    }
}

impl<O: Oracle> Solver for RoutingSolver<O> {
    fn solve(&self, request: &SolveRequest) -> Result<SolveResponse, SolveError> {
        let instance = ProblemInstance::new(request)?;
        let graph = GraphBuilder::new(instance.matrix())
            .build(instance.jobs())
            .map_err(ValidationError::from)?;
        let fleet = FleetModelBuilder::new(graph.node_count())
            .build(instance.vehicles())
            .map_err(ValidationError::from)?;
        let model = RoutingModel::new(&instance, &graph, &fleet, &self.config.model);

        let started = Instant::now();
        let assignment = self.oracle.solve(&model, &self.config.search)?;
        let elapsed = started.elapsed();

        let result = SolutionDecoder::new(&model).decode(&assignment)?;
        info!(
            "solved {} jobs on {} vehicles: total duration {}, objective {}, {elapsed:?}",
            instance.jobs().len(),
            fleet.len(),
            result.total_delivery_duration,
            assignment.objective()
        );
        Ok(SolveResponse {
            result,
            diagnostics: Diagnostics {
                objective: assignment.objective(),
                time_limit: model.time_limit(),
                elapsed,
            },
        })
    }
}
