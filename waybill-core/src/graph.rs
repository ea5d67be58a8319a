//! Augmented travel-time graph with a synthetic depot at node 0.
//!
//! Every original location `i` becomes node `i + 1`. The depot row and column
//! are zero, so returning to it is free and it never influences the cost of
//! a route. Per-node service and demand vectors are filled from the jobs.

use log::{debug, warn};
use thiserror::Error;

use crate::{Job, JobId, NodeIndex, TravelTimeMatrix};

/// A job referenced a location outside the travel-time matrix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("job {job} references location {location_index} but the matrix has {locations} locations")]
pub struct RangeError {
    /// Offending job.
    pub job: JobId,
    /// Location it referenced.
    pub location_index: usize,
    /// Number of locations in the matrix.
    pub locations: usize,
}

/// Travel times, service durations and demands indexed by [`NodeIndex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentedGraph {
    travel: Vec<Vec<u64>>,
    service: Vec<u64>,
    demand: Vec<u64>,
}

/// Builds an [`AugmentedGraph`] from a matrix and its jobs.
///
/// # Examples
/// ```
/// use waybill_core::{GraphBuilder, Job, JobId, NodeIndex, TravelTimeMatrix};
///
/// # fn main() -> Result<(), waybill_core::RangeError> {
/// let matrix = TravelTimeMatrix::new(vec![vec![0, 4], vec![4, 0]]);
/// let jobs = [Job { id: JobId(1), location_index: 1, service: 2, delivery: vec![1] }];
/// let graph = GraphBuilder::new(&matrix).build(&jobs)?;
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.travel(NodeIndex(1), NodeIndex(2)), 4);
/// assert_eq!(graph.travel(NodeIndex::DEPOT, NodeIndex(2)), 0);
/// assert_eq!(graph.service(NodeIndex(2)), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder<'a> {
    matrix: &'a TravelTimeMatrix,
}

impl<'a> GraphBuilder<'a> {
    /// Start building from `matrix`.
    #[must_use]
    pub const fn new(matrix: &'a TravelTimeMatrix) -> Self {
        Self { matrix }
    }

    /// Augment the matrix and place every job on its node.
    ///
    /// When two jobs share a location the later one overwrites the service
    /// and demand of the earlier one. The overlap is logged.
    pub fn build(self, jobs: &[Job]) -> Result<AugmentedGraph, RangeError> {
        let locations = self.matrix.locations();
        let nodes = locations + 1;

        let mut travel = Vec::with_capacity(nodes);
        travel.push(vec![0; nodes]);
        for row in self.matrix.rows() {
            let mut augmented = Vec::with_capacity(nodes);
            augmented.push(0);
            augmented.extend(row.iter().copied());
            augmented.resize(nodes, 0);
            travel.push(augmented);
        }

        let mut service = vec![0; nodes];
        let mut demand = vec![0; nodes];
        let mut placed: Vec<Option<JobId>> = vec![None; nodes];
        for job in jobs {
            let range = RangeError {
                job: job.id,
                location_index: job.location_index,
                locations,
            };
            let node = NodeIndex::from_location(job.location_index).ok_or_else(|| range.clone())?;
            let slot = placed.get_mut(node.0).ok_or_else(|| range.clone())?;
            if let Some(previous) = slot.replace(job.id) {
                warn!(
                    "jobs {previous} and {} share location {}; keeping the later service and demand",
                    job.id, job.location_index
                );
            }
            *service.get_mut(node.0).ok_or_else(|| range.clone())? = job.service;
            *demand.get_mut(node.0).ok_or(range)? = job.primary_demand().unwrap_or_default();
        }

        debug!("augmented graph built with {nodes} nodes for {} jobs", jobs.len());
        Ok(AugmentedGraph {
            travel,
            service,
            demand,
        })
    }
}

impl AugmentedGraph {
    /// Number of nodes, depot included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.service.len()
    }

    /// Travel time between two nodes. Nodes outside the graph read as zero.
    #[must_use]
    pub fn travel(&self, from: NodeIndex, to: NodeIndex) -> u64 {
        self.travel
            .get(from.0)
            .and_then(|row| row.get(to.0))
            .copied()
            .unwrap_or_default()
    }

    /// Service time spent at `node`.
    #[must_use]
    pub fn service(&self, node: NodeIndex) -> u64 {
        self.service.get(node.0).copied().unwrap_or_default()
    }

    /// Quantity delivered at `node`.
    #[must_use]
    pub fn demand(&self, node: NodeIndex) -> u64 {
        self.demand.get(node.0).copied().unwrap_or_default()
    }

    /// Cost of the arc `from -> to`: travel plus service at the destination.
    #[must_use]
    pub fn arc_cost(&self, from: NodeIndex, to: NodeIndex) -> u64 {
        self.travel(from, to).saturating_add(self.service(to))
    }

    /// Largest single travel time in the graph.
    #[must_use]
    pub fn max_arc(&self) -> u64 {
        self.travel
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or_default()
    }

    /// Per-node service times, depot first.
    #[must_use]
    pub fn service_durations(&self) -> &[u64] {
        &self.service
    }

    /// Per-node demands, depot first.
    #[must_use]
    pub fn demands(&self) -> &[u64] {
        &self.demand
    }
}
