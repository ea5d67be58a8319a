//! Test-only builders for requests and models.
//!
//! Available to unit tests and, through the `test-support` feature, to the
//! engine crates' behaviour and property tests.

use crate::{
    AugmentedGraph, FleetModel, FleetModelBuilder, GraphBuilder, Job, JobId, ModelConfig,
    ProblemInstance, RoutingModel, SolveRequest, TravelTimeMatrix, ValidationError, Vehicle,
    VehicleId,
};

/// Vehicle `id` with a single capacity entry.
///
/// # Examples
/// ```rust
/// use waybill_core::test_support::vehicle;
///
/// let vehicle = vehicle(1, 10, 0);
/// assert_eq!(vehicle.primary_capacity(), Some(10));
/// ```
#[must_use]
pub fn vehicle(id: u64, capacity: u64, start_index: usize) -> Vehicle {
    Vehicle {
        id: VehicleId(id),
        capacity: vec![capacity],
        start_index,
    }
}

/// Job `id` with a single delivery entry.
#[must_use]
pub fn job(id: u64, location_index: usize, service: u64, demand: u64) -> Job {
    Job {
        id: JobId(id),
        location_index,
        service,
        delivery: vec![demand],
    }
}

/// Assemble a request from raw parts.
#[must_use]
pub fn request(vehicles: Vec<Vehicle>, jobs: Vec<Job>, matrix: Vec<Vec<u64>>) -> SolveRequest {
    SolveRequest {
        vehicles,
        jobs,
        matrix: TravelTimeMatrix::new(matrix),
    }
}

/// One vehicle with capacity 10 at location 0 and two jobs on a short line.
///
/// Visiting job 1 then job 2 costs `(2 + 1) + (3 + 1) = 7`.
#[must_use]
pub fn two_job_request() -> SolveRequest {
    request(
        vec![vehicle(1, 10, 0)],
        vec![job(1, 1, 1, 3), job(2, 2, 1, 4)],
        vec![vec![0, 2, 5], vec![2, 0, 3], vec![5, 3, 0]],
    )
}

/// Two vehicles with capacity 6 at location 0 and four jobs on a line with
/// demands 2, 2, 4 and 4.
///
/// The light jobs sit nearest the start, so filling one vehicle at a time
/// strands a heavy job. Pairing each light job with a heavy one fits exactly.
#[must_use]
pub fn tight_packing_request() -> SolveRequest {
    let positions = [0_u64, 1, 2, 5, 6];
    let matrix = positions
        .iter()
        .map(|from| positions.iter().map(|to| from.abs_diff(*to)).collect())
        .collect();
    request(
        vec![vehicle(1, 6, 0), vehicle(2, 6, 0)],
        vec![job(1, 1, 1, 2), job(2, 2, 1, 2), job(3, 3, 1, 4), job(4, 4, 1, 4)],
        matrix,
    )
}

/// A request with its graph and fleet built, ready to yield a model.
#[derive(Debug, Clone)]
pub struct ModelParts {
    /// The validated request.
    pub request: SolveRequest,
    /// Its augmented graph.
    pub graph: AugmentedGraph,
    /// Its fleet.
    pub fleet: FleetModel,
}

impl ModelParts {
    /// Validate `request` and build its graph and fleet.
    pub fn new(request: SolveRequest) -> Result<Self, ValidationError> {
        let instance = ProblemInstance::new(&request)?;
        let graph = GraphBuilder::new(instance.matrix()).build(instance.jobs())?;
        let fleet = FleetModelBuilder::new(graph.node_count()).build(instance.vehicles())?;
        Ok(Self {
            request,
            graph,
            fleet,
        })
    }

    /// Build a model over the stored parts.
    pub fn model(&self, config: &ModelConfig) -> Result<RoutingModel<'_>, ValidationError> {
        let instance = ProblemInstance::new(&self.request)?;
        Ok(RoutingModel::new(&instance, &self.graph, &self.fleet, config))
    }
}
