//! Incrementally scored routes.
//!
//! A [`Plan`] caches one [`RouteScore`] per vehicle so that a move touching
//! one or two routes is priced without re-walking the others.

use waybill_core::{RouteEvaluation, RoutingModel, SolverIndex, TIME};

use crate::guided::ArcPenalties;

/// True evaluation of a route plus its guided-search penalty term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RouteScore {
    pub(crate) evaluation: RouteEvaluation,
    pub(crate) guide: u64,
}

/// Prices routes against a model and the current arc penalties.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Evaluator<'m, 'a> {
    model: &'m RoutingModel<'a>,
    penalties: &'m ArcPenalties,
    span_cost_coefficient: u64,
}

impl<'m, 'a> Evaluator<'m, 'a> {
    pub(crate) fn new(model: &'m RoutingModel<'a>, penalties: &'m ArcPenalties) -> Self {
        let span_cost_coefficient = model
            .dimension(TIME)
            .map_or(0, |dimension| dimension.span_cost_coefficient());
        Self {
            model,
            penalties,
            span_cost_coefficient,
        }
    }

    pub(crate) const fn model(&self) -> &'m RoutingModel<'a> {
        self.model
    }

    pub(crate) fn score(&self, vehicle: usize, route: &[SolverIndex]) -> RouteScore {
        RouteScore {
            evaluation: self.model.evaluate_route(vehicle, route),
            guide: self.penalties.route_weight(self.model, vehicle, route),
        }
    }
}

/// Replacement route for one vehicle inside a [`Candidate`].
#[derive(Debug, Clone)]
pub(crate) struct Change {
    pub(crate) vehicle: usize,
    pub(crate) route: Vec<SolverIndex>,
    pub(crate) score: RouteScore,
}

/// A priced move, ready to apply.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub(crate) changes: Vec<Change>,
    /// Optional node the move starts visiting.
    pub(crate) performed: Option<SolverIndex>,
    /// Optional node the move stops visiting.
    pub(crate) dropped: Option<SolverIndex>,
    /// Skip penalties once the move is applied.
    pub(crate) skipped: u64,
    pub(crate) augmented: u64,
}

/// Routes for every vehicle and the optional nodes left out.
#[derive(Debug, Clone)]
pub(crate) struct Plan {
    routes: Vec<Vec<SolverIndex>>,
    scores: Vec<RouteScore>,
    unperformed: Vec<SolverIndex>,
    skipped: u64,
    span_cost_coefficient: u64,
}

impl Plan {
    /// Score `routes` and collect every optional node they leave out.
    pub(crate) fn new(evaluator: &Evaluator<'_, '_>, routes: Vec<Vec<SolverIndex>>) -> Self {
        let model = evaluator.model();
        let mut visited = vec![false; model.manager().size()];
        for index in routes.iter().flatten() {
            if let Some(flag) = visited.get_mut(index.0) {
                *flag = true;
            }
        }
        let unperformed: Vec<SolverIndex> = model
            .disjunctions()
            .iter()
            .map(|disjunction| disjunction.index)
            .filter(|index| !visited.get(index.0).copied().unwrap_or(false))
            .collect();
        let skipped = unperformed
            .iter()
            .filter_map(|&index| model.penalty(index))
            .sum();
        let scores = routes
            .iter()
            .enumerate()
            .map(|(vehicle, route)| evaluator.score(vehicle, route))
            .collect();
        Self {
            routes,
            scores,
            unperformed,
            skipped,
            span_cost_coefficient: evaluator.span_cost_coefficient,
        }
    }

    pub(crate) fn routes(&self) -> &[Vec<SolverIndex>] {
        &self.routes
    }

    pub(crate) fn route(&self, vehicle: usize) -> &[SolverIndex] {
        self.routes.get(vehicle).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn unperformed(&self) -> &[SolverIndex] {
        &self.unperformed
    }

    /// Arc costs, the time span term and skip penalties.
    pub(crate) fn objective(&self) -> u64 {
        self.totals(&[], self.skipped).0
    }

    /// Objective plus the guided-search penalty term.
    pub(crate) fn augmented(&self) -> u64 {
        self.totals(&[], self.skipped).1
    }

    /// Re-price every route, for example after the arc penalties change.
    pub(crate) fn rescore(&mut self, evaluator: &Evaluator<'_, '_>) {
        for (vehicle, (route, score)) in self.routes.iter().zip(&mut self.scores).enumerate() {
            *score = evaluator.score(vehicle, route);
        }
    }

    /// Price replacing some routes. Returns `None` when a replacement breaks
    /// a dimension bound.
    pub(crate) fn price(
        &self,
        evaluator: &Evaluator<'_, '_>,
        routes: Vec<(usize, Vec<SolverIndex>)>,
        performed: Option<SolverIndex>,
        dropped: Option<SolverIndex>,
    ) -> Option<Candidate> {
        let model = evaluator.model();
        let mut changes = Vec::with_capacity(routes.len());
        for (vehicle, route) in routes {
            let score = evaluator.score(vehicle, &route);
            if !score.evaluation.feasible {
                return None;
            }
            changes.push(Change {
                vehicle,
                route,
                score,
            });
        }
        let mut skipped = self.skipped;
        if let Some(index) = performed {
            skipped = skipped.saturating_sub(model.penalty(index).unwrap_or_default());
        }
        if let Some(index) = dropped {
            skipped = skipped.saturating_add(model.penalty(index).unwrap_or_default());
        }
        let (_, augmented) = self.totals(&changes, skipped);
        Some(Candidate {
            changes,
            performed,
            dropped,
            skipped,
            augmented,
        })
    }

    pub(crate) fn apply(&mut self, candidate: Candidate) {
        for change in candidate.changes {
            if let Some(route) = self.routes.get_mut(change.vehicle) {
                *route = change.route;
            }
            if let Some(score) = self.scores.get_mut(change.vehicle) {
                *score = change.score;
            }
        }
        if let Some(index) = candidate.performed {
            self.unperformed.retain(|&other| other != index);
        }
        if let Some(index) = candidate.dropped {
            self.unperformed.push(index);
        }
        self.skipped = candidate.skipped;
    }

    /// Route cost plus span term, and the guide sum, with `changes` applied.
    fn route_totals(&self, changes: &[Change]) -> (u64, u64) {
        let mut cost = 0_u64;
        let mut span = 0_u64;
        let mut guide = 0_u64;
        for (vehicle, current) in self.scores.iter().enumerate() {
            let score = changes
                .iter()
                .find(|change| change.vehicle == vehicle)
                .map_or(current, |change| &change.score);
            cost = cost.saturating_add(score.evaluation.cost);
            span = span.max(score.evaluation.duration);
            guide = guide.saturating_add(score.guide);
        }
        (
            cost.saturating_add(span.saturating_mul(self.span_cost_coefficient)),
            guide,
        )
    }

    /// `(objective, augmented)` with `changes` applied and `skipped` penalties.
    fn totals(&self, changes: &[Change], skipped: u64) -> (u64, u64) {
        let (routes, guide) = self.route_totals(changes);
        let objective = routes.saturating_add(skipped);
        (objective, objective.saturating_add(guide))
    }
}
