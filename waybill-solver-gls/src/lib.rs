//! Native routing engine for Waybill.
//!
//! [`GlsOracle`] implements the [`Oracle`] contract with a first solution
//! built by the requested [`waybill_core::FirstSolutionStrategy`], followed by guided local
//! search. Waypoints
//! start unvisited; local search inserts them where their detour costs less
//! than their skip penalty.
//!
//! The engine is single-threaded and deterministic for a given iteration
//! limit. The wall-clock budget is checked between moves, and the best
//! solution seen is returned when it runs out.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod budget;
mod construction;
mod guided;
mod local_search;
mod plan;

use log::debug;
use waybill_core::{Assignment, Oracle, OracleError, RoutingModel, SearchParameters};

use crate::budget::Budget;

/// Constructive first solution plus guided local search.
///
/// Construction starts with `params.first_solution` and falls back to the
/// other strategy before reporting [`OracleError::Infeasible`].
///
/// # Examples
/// ```
/// use waybill_core::{RoutingSolver, Solver};
/// use waybill_core::test_support::two_job_request;
/// use waybill_solver_gls::GlsOracle;
///
/// let solver = RoutingSolver::new(GlsOracle);
/// let response = solver.solve(&two_job_request()).unwrap();
/// assert_eq!(response.result.total_delivery_duration, 7);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GlsOracle;

impl Oracle for GlsOracle {
    fn solve(
        &self,
        model: &RoutingModel<'_>,
        params: &SearchParameters,
    ) -> Result<Assignment, OracleError> {
        let mut budget = Budget::new(params);
        let routes = construction::first_solution(model, params.first_solution)?;
        let best = guided::search(model, routes, params, &mut budget);
        let objective = model.objective(&best);
        debug!(
            "gls finished after {} iterations with objective {objective}",
            budget.iterations()
        );
        Ok(Assignment::from_routes(model.manager(), &best, objective))
    }
}
