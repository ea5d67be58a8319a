//! The engine contract and the raw assignment it returns.

use thiserror::Error;

use crate::{IndexManager, RoutingModel, SearchParameters, SolverIndex};

/// Successor links produced by an engine.
///
/// `next(i)` is the index visited after `i`. End indices and unperformed
/// optional nodes have no successor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    next: Vec<Option<SolverIndex>>,
    objective: u64,
}

impl Assignment {
    /// Wrap raw successor links.
    #[must_use]
    pub const fn new(next: Vec<Option<SolverIndex>>, objective: u64) -> Self {
        Self { next, objective }
    }

    /// Build links from one interior index list per vehicle.
    ///
    /// Vehicles beyond `routes.len()` go straight from start to end.
    ///
    /// # Examples
    /// ```
    /// use waybill_core::{Assignment, FleetModelBuilder, GraphBuilder, IndexManager};
    /// use waybill_core::{SolverIndex, TravelTimeMatrix, Vehicle, VehicleId};
    ///
    /// let matrix = TravelTimeMatrix::new(vec![vec![0, 1], vec![1, 0]]);
    /// let graph = GraphBuilder::new(&matrix).build(&[]).unwrap();
    /// let vehicles = [Vehicle { id: VehicleId(1), capacity: vec![1], start_index: 0 }];
    /// let fleet = FleetModelBuilder::new(graph.node_count()).build(&vehicles).unwrap();
    /// let manager = IndexManager::new(&graph, &fleet, &[]);
    ///
    /// let assignment = Assignment::from_routes(&manager, &[vec![SolverIndex(0)]], 3);
    /// assert_eq!(assignment.next(manager.start(0)), Some(SolverIndex(0)));
    /// assert_eq!(assignment.next(SolverIndex(0)), Some(manager.end(0)));
    /// assert_eq!(assignment.next(manager.end(0)), None);
    /// ```
    #[must_use]
    pub fn from_routes(manager: &IndexManager, routes: &[Vec<SolverIndex>], objective: u64) -> Self {
        let mut next = vec![None; manager.size()];
        for vehicle in 0..manager.vehicle_count() {
            let interior = routes.get(vehicle).map_or(&[][..], Vec::as_slice);
            let mut from = manager.start(vehicle);
            for &to in interior.iter().chain(std::iter::once(&manager.end(vehicle))) {
                if let Some(slot) = next.get_mut(from.0) {
                    *slot = Some(to);
                }
                from = to;
            }
        }
        Self { next, objective }
    }

    /// Successor of `index`.
    #[must_use]
    pub fn next(&self, index: SolverIndex) -> Option<SolverIndex> {
        self.next.get(index.0).copied().flatten()
    }

    /// Number of indices covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.next.len()
    }

    /// Whether the assignment covers no indices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }

    /// Objective value reported by the engine.
    #[must_use]
    pub const fn objective(&self) -> u64 {
        self.objective
    }
}

/// Errors returned by [`Oracle::solve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// No assignment satisfies the hard constraints.
    #[error("no feasible assignment")]
    Infeasible,
    /// The engine failed for a non-feasibility reason.
    #[error("engine failure: {message}")]
    Engine {
        /// Engine-provided description.
        message: String,
    },
}

/// A routing engine.
///
/// Implementations read the model, honour the limits in `params`, and
/// return their best assignment. Engines must be `Send + Sync` and keep no
/// state between calls.
pub trait Oracle: Send + Sync {
    /// Solve `model` within `params`.
    fn solve(
        &self,
        model: &RoutingModel<'_>,
        params: &SearchParameters,
    ) -> Result<Assignment, OracleError>;
}
