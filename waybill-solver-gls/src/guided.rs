//! Guided local search.
//!
//! After each local optimum the arcs with the highest utility
//! `cost / (1 + penalty)` are penalised, and local search resumes on the
//! objective plus `lambda` times the penalties of the arcs in use.

use std::collections::HashMap;

use log::{debug, trace};
use waybill_core::{Metaheuristic, RoutingModel, SearchParameters, SolverIndex};

use crate::budget::Budget;
use crate::local_search;
use crate::plan::{Evaluator, Plan};

/// Penalty counts per arc and the weight applied to them.
#[derive(Debug, Clone, Default)]
pub(crate) struct ArcPenalties {
    counts: HashMap<(SolverIndex, SolverIndex), u64>,
    lambda: u64,
}

impl ArcPenalties {
    fn count(&self, from: SolverIndex, to: SolverIndex) -> u64 {
        self.counts.get(&(from, to)).copied().unwrap_or_default()
    }

    /// `lambda` times the penalty counts along `start -> route -> end`.
    pub(crate) fn route_weight(
        &self,
        model: &RoutingModel<'_>,
        vehicle: usize,
        route: &[SolverIndex],
    ) -> u64 {
        if self.lambda == 0 || self.counts.is_empty() {
            return 0;
        }
        let total: u64 = arcs(model, vehicle, route)
            .map(|(from, to)| self.count(from, to))
            .sum();
        total.saturating_mul(self.lambda)
    }

    /// Penalise the maximum-utility arcs of `routes`. Returns `false` when no
    /// arc has positive utility, which leaves nothing to guide.
    fn penalise(&mut self, model: &RoutingModel<'_>, routes: &[Vec<SolverIndex>]) -> bool {
        let mut best: Vec<(SolverIndex, SolverIndex)> = Vec::new();
        // Utilities are compared as fractions `cost / (1 + count)`.
        let mut best_utility = (0_u64, 1_u64);
        for (vehicle, route) in routes.iter().enumerate() {
            for (from, to) in arcs(model, vehicle, route) {
                let utility = (
                    model.arc_cost(from, to),
                    self.count(from, to).saturating_add(1),
                );
                let lhs = u128::from(utility.0) * u128::from(best_utility.1);
                let rhs = u128::from(best_utility.0) * u128::from(utility.1);
                if lhs > rhs {
                    best_utility = utility;
                    best.clear();
                    best.push((from, to));
                } else if lhs == rhs && utility.0 > 0 {
                    best.push((from, to));
                }
            }
        }
        for arc in &best {
            *self.counts.entry(*arc).or_default() += 1;
        }
        trace!("penalised {} arcs", best.len());
        !best.is_empty()
    }
}

/// Every arc of a vehicle's route, start and end included.
pub(crate) fn arcs<'r>(
    model: &RoutingModel<'_>,
    vehicle: usize,
    route: &'r [SolverIndex],
) -> impl Iterator<Item = (SolverIndex, SolverIndex)> + 'r {
    let manager = model.manager();
    let start = manager.start(vehicle);
    let end = manager.end(vehicle);
    std::iter::once(start)
        .chain(route.iter().copied())
        .zip(route.iter().copied().chain(std::iter::once(end)))
}

/// Improve `routes` until the budget runs out and return the best plan seen.
pub(crate) fn search(
    model: &RoutingModel<'_>,
    routes: Vec<Vec<SolverIndex>>,
    params: &SearchParameters,
    budget: &mut Budget,
) -> Vec<Vec<SolverIndex>> {
    let mut penalties = ArcPenalties::default();
    let mut plan = Plan::new(&Evaluator::new(model, &penalties), routes);
    let mut best = plan.routes().to_vec();
    let mut best_objective = plan.objective();
    debug!("initial solution objective {best_objective}");

    while !budget.exhausted() {
        local_search::descend(&mut plan, &Evaluator::new(model, &penalties), budget);
        budget.tick();

        let objective = plan.objective();
        if objective < best_objective {
            debug!("iteration {}: objective {objective}", budget.iterations());
            best_objective = objective;
            best = plan.routes().to_vec();
        }

        if params.metaheuristic == Metaheuristic::GreedyDescent {
            break;
        }
        if penalties.lambda == 0 {
            penalties.lambda = lambda(objective, plan.routes(), params.gls_lambda_percent);
        }
        if !penalties.penalise(model, plan.routes()) {
            break;
        }
        plan.rescore(&Evaluator::new(model, &penalties));
    }
    best
}

/// `objective * percent / 100`, averaged over the arcs in use, at least one.
fn lambda(objective: u64, routes: &[Vec<SolverIndex>], percent: u64) -> u64 {
    let arcs = routes.iter().map(|route| route.len() as u64 + 1).sum::<u64>();
    objective
        .saturating_mul(percent)
        .checked_div(arcs.saturating_mul(100))
        .unwrap_or_default()
        .max(1)
}
