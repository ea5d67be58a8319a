//! Mapping between job IDs, graph nodes and solver indices.
//!
//! The solver sees each vehicle's start and end as separate indices, even when
//! several vehicles share a node. Nodes that are neither a start nor an end
//! come first and keep one index each:
//!
//! ```text
//! [ regular nodes ... | start of v0 .. start of vV-1 | end of v0 .. end of vV-1 ]
//! ```

use log::warn;

use crate::{AugmentedGraph, FleetModel, Job, JobId, NodeIndex, SolverIndex};

/// Bidirectional lookup built once per solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexManager {
    index_nodes: Vec<NodeIndex>,
    node_indices: Vec<Option<SolverIndex>>,
    node_jobs: Vec<Option<JobId>>,
    regular_count: usize,
    vehicle_count: usize,
}

impl IndexManager {
    /// Lay out solver indices for `graph` and `fleet` and record which job sits
    /// at each node.
    ///
    /// When several jobs share a node the first one owns it.
    #[must_use]
    pub fn new(graph: &AugmentedGraph, fleet: &FleetModel, jobs: &[Job]) -> Self {
        let node_count = graph.node_count();
        let mut terminal = vec![false; node_count];
        for node in fleet.start_nodes().iter().chain(fleet.end_nodes()) {
            if let Some(flag) = terminal.get_mut(node.0) {
                *flag = true;
            }
        }

        let mut index_nodes: Vec<NodeIndex> = terminal
            .iter()
            .enumerate()
            .filter(|(_, is_terminal)| !**is_terminal)
            .map(|(node, _)| NodeIndex(node))
            .collect();
        let regular_count = index_nodes.len();
        index_nodes.extend_from_slice(fleet.start_nodes());
        index_nodes.extend_from_slice(fleet.end_nodes());

        let mut node_indices = vec![None; node_count];
        for (index, node) in index_nodes.iter().take(regular_count).enumerate() {
            if let Some(slot) = node_indices.get_mut(node.0) {
                *slot = Some(SolverIndex(index));
            }
        }

        let mut node_jobs: Vec<Option<JobId>> = vec![None; node_count];
        for job in jobs {
            let Some(node) = NodeIndex::from_location(job.location_index) else {
                continue;
            };
            match node_jobs.get_mut(node.0) {
                Some(slot @ None) => *slot = Some(job.id),
                Some(Some(owner)) => warn!(
                    "job {} shares node {node} with job {owner}; routes will report job {owner}",
                    job.id
                ),
                None => {}
            }
        }

        Self {
            index_nodes,
            node_indices,
            node_jobs,
            regular_count,
            vehicle_count: fleet.len(),
        }
    }

    /// Total number of solver indices.
    #[must_use]
    pub fn size(&self) -> usize {
        self.index_nodes.len()
    }

    /// Number of vehicles.
    #[must_use]
    pub const fn vehicle_count(&self) -> usize {
        self.vehicle_count
    }

    /// Number of regular (non-terminal) indices.
    #[must_use]
    pub const fn regular_count(&self) -> usize {
        self.regular_count
    }

    /// Regular indices in ascending order.
    pub fn regular_indices(&self) -> impl Iterator<Item = SolverIndex> + '_ {
        (0..self.regular_count).map(SolverIndex)
    }

    /// Start index of the vehicle at `vehicle`.
    #[must_use]
    pub const fn start(&self, vehicle: usize) -> SolverIndex {
        SolverIndex(self.regular_count + vehicle)
    }

    /// End index of the vehicle at `vehicle`.
    #[must_use]
    pub const fn end(&self, vehicle: usize) -> SolverIndex {
        SolverIndex(self.regular_count + self.vehicle_count + vehicle)
    }

    /// Whether `index` is a vehicle start.
    #[must_use]
    pub const fn is_start(&self, index: SolverIndex) -> bool {
        index.0 >= self.regular_count && index.0 < self.regular_count + self.vehicle_count
    }

    /// Whether `index` is a vehicle end.
    #[must_use]
    pub const fn is_end(&self, index: SolverIndex) -> bool {
        index.0 >= self.regular_count + self.vehicle_count
            && index.0 < self.regular_count + 2 * self.vehicle_count
    }

    /// Graph node behind a solver index.
    #[must_use]
    pub fn index_to_node(&self, index: SolverIndex) -> Option<NodeIndex> {
        self.index_nodes.get(index.0).copied()
    }

    /// Solver index of a regular node. Terminal nodes have one index per
    /// vehicle and are reached through [`IndexManager::start`] and
    /// [`IndexManager::end`] instead.
    #[must_use]
    pub fn node_to_index(&self, node: NodeIndex) -> Option<SolverIndex> {
        self.node_indices.get(node.0).copied().flatten()
    }

    /// Job that owns `node`, if any.
    #[must_use]
    pub fn job_at(&self, node: NodeIndex) -> Option<JobId> {
        self.node_jobs.get(node.0).copied().flatten()
    }

    /// Job visited at a solver index, if any.
    #[must_use]
    pub fn job_at_index(&self, index: SolverIndex) -> Option<JobId> {
        self.index_to_node(index).and_then(|node| self.job_at(node))
    }
}
