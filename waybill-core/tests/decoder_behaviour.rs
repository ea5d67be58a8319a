//! Behavioural tests for `SolutionDecoder` using rstest-bdd.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use waybill_core::{
    Assignment, DecodeError, FleetModelBuilder, GraphBuilder, Job, JobId, ModelConfig, NodeIndex,
    ProblemInstance, RoutingModel, SolutionDecoder, SolveRequest, SolveResult, TravelTimeMatrix,
    Vehicle, VehicleId,
};

/// How the `when` step builds its assignment.
#[derive(Debug, Clone, Copy)]
enum Plan<'p> {
    Locations(&'p [usize]),
    Empty,
    Sized(usize),
}

#[derive(Debug, Default)]
struct DecoderWorld {
    request: RefCell<SolveRequest>,
    outcome: RefCell<Option<Result<SolveResult, DecodeError>>>,
}

impl DecoderWorld {
    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn decode(&self, plan: Plan<'_>) {
        let request = self.request.borrow();
        let instance = ProblemInstance::new(&request).expect("request validates");
        let graph = GraphBuilder::new(instance.matrix())
            .build(instance.jobs())
            .expect("jobs in range");
        let fleet = FleetModelBuilder::new(graph.node_count())
            .build(instance.vehicles())
            .expect("valid fleet");
        let model = RoutingModel::new(&instance, &graph, &fleet, &ModelConfig::default());
        let manager = model.manager();
        let assignment = match plan {
            Plan::Locations(locations) => {
                let route: Vec<_> = locations
                    .iter()
                    .map(|&location| {
                        let node = NodeIndex::from_location(location).expect("location in range");
                        manager.node_to_index(node).expect("regular node")
                    })
                    .collect();
                Assignment::from_routes(manager, &[route], 0)
            }
            Plan::Empty => Assignment::from_routes(manager, &[], 0),
            Plan::Sized(size) => Assignment::new(vec![None; size], 0),
        };
        let outcome = SolutionDecoder::new(&model).decode(&assignment);
        self.outcome.replace(Some(outcome));
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn expect_outcome(&self) -> Result<SolveResult, DecodeError> {
        self.outcome
            .borrow()
            .as_ref()
            .cloned()
            .expect("outcome should be recorded before assertions")
    }
}

fn job(id: u64, location_index: usize, service: u64) -> Job {
    Job {
        id: JobId(id),
        location_index,
        service,
        delivery: vec![1],
    }
}

fn vehicle(id: u64) -> Vehicle {
    Vehicle {
        id: VehicleId(id),
        capacity: vec![10],
        start_index: 0,
    }
}

#[fixture]
fn world() -> DecoderWorld {
    DecoderWorld::default()
}

#[given("a vehicle at location 0 with jobs at locations 1 and 2")]
fn given_two_jobs(world: &DecoderWorld) {
    world.request.replace(SolveRequest {
        vehicles: vec![vehicle(1)],
        jobs: vec![job(1, 1, 1), job(2, 2, 1)],
        matrix: TravelTimeMatrix::new(vec![vec![0, 2, 5], vec![2, 0, 3], vec![5, 3, 0]]),
    });
}

#[given("two vehicles starting on the location of job 5")]
fn given_shared_start(world: &DecoderWorld) {
    world.request.replace(SolveRequest {
        vehicles: vec![vehicle(1), vehicle(2)],
        jobs: vec![job(5, 0, 4)],
        matrix: TravelTimeMatrix::new(vec![vec![0, 1], vec![1, 0]]),
    });
}

#[when("the route visiting locations 1 then 2 is decoded")]
fn when_route_decoded(world: &DecoderWorld) {
    world.decode(Plan::Locations(&[1, 2]));
}

#[when("empty routes are decoded")]
fn when_empty_decoded(world: &DecoderWorld) {
    world.decode(Plan::Empty);
}

#[when("an assignment covering 2 indices is decoded")]
fn when_sized_decoded(world: &DecoderWorld) {
    world.decode(Plan::Sized(2));
}

#[then("vehicle 1 serves jobs 1 then 2")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_jobs_in_order(world: &DecoderWorld) {
    let result = world.expect_outcome().expect("expected decode success");
    let plan = result.routes.get(&VehicleId(1)).expect("vehicle 1 routed");
    assert_eq!(plan.jobs, vec![JobId(1), JobId(2)]);
}

#[then("the total delivery duration is 7")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_total_seven(world: &DecoderWorld) {
    let result = world.expect_outcome().expect("expected decode success");
    assert_eq!(result.total_delivery_duration, 7);
}

#[then("the total delivery duration is 8")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_total_eight(world: &DecoderWorld) {
    let result = world.expect_outcome().expect("expected decode success");
    assert_eq!(result.total_delivery_duration, 8);
}

#[then("job 5 appears exactly once")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_job_once(world: &DecoderWorld) {
    let result = world.expect_outcome().expect("expected decode success");
    assert_eq!(result.jobs().collect::<Vec<_>>(), vec![JobId(5)]);
}

#[then("decoding fails with an assignment size error")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_size_error(world: &DecoderWorld) {
    let err = world.expect_outcome().expect_err("expected decode failure");
    assert!(matches!(err, DecodeError::AssignmentSize { actual: 2, .. }));
}

#[scenario(path = "tests/features/decoder.feature", index = 0)]
fn decodes_two_job_route(world: DecoderWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/decoder.feature", index = 1)]
fn shared_start_job_reported_once(world: DecoderWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/decoder.feature", index = 2)]
fn foreign_assignment_rejected(world: DecoderWorld) {
    let _ = world;
}
