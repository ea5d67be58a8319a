//! Constraint model shared by every routing engine.
//!
//! The model owns the [`IndexManager`] and borrows the graph and fleet. It
//! describes the arc cost, the `Time` and `Capacity` dimensions and the
//! optional-node disjunctions. Engines query it; they never mutate it.

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{AugmentedGraph, FleetModel, IndexManager, NodeIndex, ProblemInstance, SolverIndex};

/// Name of the cumulative time dimension.
pub const TIME: &str = "Time";
/// Name of the cumulative load dimension.
pub const CAPACITY: &str = "Capacity";

/// Default per-vehicle route duration limit.
pub const DEFAULT_TIME_LIMIT: u64 = 5000;
/// Default coefficient applied to the global time span.
pub const DEFAULT_SPAN_COST_COEFFICIENT: u64 = 100;

/// How the per-vehicle route duration limit is chosen.
///
/// # Examples
/// ```
/// use waybill_core::TimeConstraint;
///
/// assert_eq!(TimeConstraint::default().resolve(), 5000);
/// let sampled = TimeConstraint::Sampled { min: 3000, max: 5000, seed: 42 };
/// assert_eq!(sampled.resolve(), sampled.resolve());
/// assert!((3000..=5000).contains(&sampled.resolve()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum TimeConstraint {
    /// Use this limit for every vehicle.
    Fixed(u64),
    /// Draw one limit uniformly from `[min, max]` with a seeded generator.
    Sampled {
        /// Inclusive lower bound.
        min: u64,
        /// Inclusive upper bound.
        max: u64,
        /// Generator seed.
        seed: u64,
    },
}

impl Default for TimeConstraint {
    fn default() -> Self {
        Self::Fixed(DEFAULT_TIME_LIMIT)
    }
}

impl TimeConstraint {
    /// The concrete limit. Sampling is deterministic for a given seed.
    #[must_use]
    pub fn resolve(&self) -> u64 {
        match *self {
            Self::Fixed(limit) => limit,
            Self::Sampled { min, max, seed } => {
                let (low, high) = (min.min(max), min.max(max));
                ChaCha8Rng::seed_from_u64(seed).gen_range(low..=high)
            }
        }
    }
}

/// Penalty charged for leaving a waypoint unvisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum SkipPenalty {
    /// Twice the largest single travel time in the graph.
    #[default]
    TwiceMaxArc,
    /// A caller-chosen penalty.
    Fixed(u64),
}

impl SkipPenalty {
    /// Concrete penalty for `graph`.
    #[must_use]
    pub fn resolve(&self, graph: &AugmentedGraph) -> u64 {
        match *self {
            Self::TwiceMaxArc => graph.max_arc().saturating_mul(2),
            Self::Fixed(penalty) => penalty,
        }
    }
}

/// Tunables applied when building a [`RoutingModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ModelConfig {
    /// Route duration limit policy.
    pub time_constraint: TimeConstraint,
    /// Waypoint skip penalty policy.
    pub skip_penalty: SkipPenalty,
    /// Weight of the global time span in the objective.
    pub span_cost_coefficient: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            time_constraint: TimeConstraint::default(),
            skip_penalty: SkipPenalty::default(),
            span_cost_coefficient: DEFAULT_SPAN_COST_COEFFICIENT,
        }
    }
}

/// What a dimension accumulates along an arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transit {
    /// Travel to the next node plus its service time.
    ArcCost,
    /// Demand of the node being left.
    Demand,
}

/// A cumulative quantity tracked along every route.
///
/// Cumuls start at zero with no slack and must stay within the vehicle's
/// bound at every node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    name: &'static str,
    transit: Transit,
    bounds: Vec<u64>,
    span_cost_coefficient: u64,
}

impl Dimension {
    /// Dimension name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Transit kind.
    #[must_use]
    pub const fn transit(&self) -> Transit {
        self.transit
    }

    /// Upper bound on the cumul for the vehicle at `vehicle`.
    #[must_use]
    pub fn bound(&self, vehicle: usize) -> u64 {
        self.bounds.get(vehicle).copied().unwrap_or_default()
    }

    /// Global span cost coefficient.
    #[must_use]
    pub const fn span_cost_coefficient(&self) -> u64 {
        self.span_cost_coefficient
    }
}

/// An optional node and the penalty for leaving it unvisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disjunction {
    /// The optional solver index.
    pub index: SolverIndex,
    /// Cost of not visiting it.
    pub penalty: u64,
}

/// Cost and dimension totals of one vehicle's route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEvaluation {
    /// Sum of arc costs from start to end.
    pub cost: u64,
    /// `Time` cumul at the end index.
    pub duration: u64,
    /// `Capacity` cumul at the end index.
    pub load: u64,
    /// Whether both cumuls stay within the vehicle's bounds.
    pub feasible: bool,
}

/// The routing problem as engines see it.
#[derive(Debug, Clone)]
pub struct RoutingModel<'a> {
    graph: &'a AugmentedGraph,
    fleet: &'a FleetModel,
    manager: IndexManager,
    dimensions: [Dimension; 2],
    disjunctions: Vec<Disjunction>,
    penalties: Vec<Option<u64>>,
    time_limit: u64,
}

impl<'a> RoutingModel<'a> {
    /// Build the model for a validated instance.
    #[must_use]
    pub fn new(
        instance: &ProblemInstance<'_>,
        graph: &'a AugmentedGraph,
        fleet: &'a FleetModel,
        config: &ModelConfig,
    ) -> Self {
        let manager = IndexManager::new(graph, fleet, instance.jobs());
        let time_limit = config.time_constraint.resolve();

        // The start node's service is charged before the first arc, so it
        // comes out of the duration budget up front.
        let time_bounds = fleet
            .start_nodes()
            .iter()
            .map(|&start| time_limit.saturating_sub(graph.service(start)))
            .collect();
        let dimensions = [
            Dimension {
                name: TIME,
                transit: Transit::ArcCost,
                bounds: time_bounds,
                span_cost_coefficient: config.span_cost_coefficient,
            },
            Dimension {
                name: CAPACITY,
                transit: Transit::Demand,
                bounds: fleet.capacities().to_vec(),
                span_cost_coefficient: 0,
            },
        ];

        let penalty = config.skip_penalty.resolve(graph);
        let mut penalties = vec![None; manager.size()];
        let mut disjunctions = Vec::new();
        for index in manager.regular_indices() {
            let is_waypoint = manager
                .index_to_node(index)
                .is_some_and(|node| manager.job_at(node).is_none());
            if is_waypoint {
                disjunctions.push(Disjunction { index, penalty });
                if let Some(slot) = penalties.get_mut(index.0) {
                    *slot = Some(penalty);
                }
            }
        }

        debug!(
            "routing model: {} indices, {} vehicles, {} optional nodes, time limit {time_limit}",
            manager.size(),
            fleet.len(),
            disjunctions.len()
        );

        Self {
            graph,
            fleet,
            manager,
            dimensions,
            disjunctions,
            penalties,
            time_limit,
        }
    }

    /// The index layout.
    #[must_use]
    pub const fn manager(&self) -> &IndexManager {
        &self.manager
    }

    /// The augmented graph.
    #[must_use]
    pub const fn graph(&self) -> &'a AugmentedGraph {
        self.graph
    }

    /// The fleet.
    #[must_use]
    pub const fn fleet(&self) -> &'a FleetModel {
        self.fleet
    }

    /// Number of vehicles.
    #[must_use]
    pub const fn vehicle_count(&self) -> usize {
        self.manager.vehicle_count()
    }

    /// Resolved route duration limit before start-service deduction.
    #[must_use]
    pub const fn time_limit(&self) -> u64 {
        self.time_limit
    }

    /// Both dimensions, `Time` first.
    #[must_use]
    pub const fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Look up a dimension by name.
    #[must_use]
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|dimension| dimension.name == name)
    }

    /// The optional nodes.
    #[must_use]
    pub fn disjunctions(&self) -> &[Disjunction] {
        &self.disjunctions
    }

    /// Skip penalty of `index`, or `None` when it must be visited.
    #[must_use]
    pub fn penalty(&self, index: SolverIndex) -> Option<u64> {
        self.penalties.get(index.0).copied().flatten()
    }

    /// Whether `index` is a regular node that has to be visited.
    #[must_use]
    pub fn is_mandatory(&self, index: SolverIndex) -> bool {
        index.0 < self.manager.regular_count() && self.penalty(index).is_none()
    }

    fn node(&self, index: SolverIndex) -> NodeIndex {
        self.manager.index_to_node(index).unwrap_or(NodeIndex::DEPOT)
    }

    /// Objective cost of the arc `from -> to`.
    #[must_use]
    pub fn arc_cost(&self, from: SolverIndex, to: SolverIndex) -> u64 {
        self.graph.arc_cost(self.node(from), self.node(to))
    }

    /// Transit of `dimension` along `from -> to`.
    #[must_use]
    pub fn transit(&self, dimension: &Dimension, from: SolverIndex, to: SolverIndex) -> u64 {
        match dimension.transit {
            Transit::ArcCost => self.arc_cost(from, to),
            Transit::Demand => self.graph.demand(self.node(from)),
        }
    }

    /// Walk `start -> interior... -> end` for the vehicle at `vehicle`.
    ///
    /// Transits are non-negative, so checking the end cumuls against the
    /// bounds covers every intermediate node.
    #[must_use]
    pub fn evaluate_route(&self, vehicle: usize, interior: &[SolverIndex]) -> RouteEvaluation {
        let [time, capacity] = &self.dimensions;
        let start = self.manager.start(vehicle);
        let end = self.manager.end(vehicle);
        let mut duration = 0_u64;
        let mut load = 0_u64;
        let mut from = start;
        for &to in interior.iter().chain(std::iter::once(&end)) {
            duration = duration.saturating_add(self.transit(time, from, to));
            load = load.saturating_add(self.transit(capacity, from, to));
            from = to;
        }
        RouteEvaluation {
            cost: duration,
            duration,
            load,
            feasible: duration <= time.bound(vehicle) && load <= capacity.bound(vehicle),
        }
    }

    /// Full objective of a plan: arc costs, the time span term and the
    /// penalties of optional nodes no route visits.
    #[must_use]
    pub fn objective(&self, routes: &[Vec<SolverIndex>]) -> u64 {
        let mut visited = vec![false; self.manager.size()];
        let mut arcs = 0_u64;
        let mut span = 0_u64;
        for (vehicle, route) in routes.iter().enumerate() {
            let evaluation = self.evaluate_route(vehicle, route);
            arcs = arcs.saturating_add(evaluation.cost);
            span = span.max(evaluation.duration);
            for index in route {
                if let Some(flag) = visited.get_mut(index.0) {
                    *flag = true;
                }
            }
        }
        let skipped: u64 = self
            .disjunctions
            .iter()
            .filter(|disjunction| !visited.get(disjunction.index.0).copied().unwrap_or(false))
            .map(|disjunction| disjunction.penalty)
            .sum();
        let [time, _] = &self.dimensions;
        arcs.saturating_add(span.saturating_mul(time.span_cost_coefficient))
            .saturating_add(skipped)
    }
}
