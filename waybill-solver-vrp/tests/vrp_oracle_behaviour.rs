//! Behavioural tests for `VrpOracle` using rstest-bdd.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use waybill_core::test_support::{job, request, vehicle};
use waybill_core::{
    JobId, RoutingSolver, SearchParameters, SolveError, SolveRequest, SolveResponse, Solver,
    SolverConfig, VehicleId,
};
use waybill_solver_vrp::VrpOracle;

#[derive(Debug)]
struct VrpWorld {
    request: RefCell<SolveRequest>,
    outcome: RefCell<Option<Result<SolveResponse, SolveError>>>,
}

impl VrpWorld {
    fn new() -> Self {
        Self {
            request: RefCell::new(request(
                Vec::new(),
                Vec::new(),
                vec![vec![0, 2, 5], vec![2, 0, 3], vec![5, 3, 0]],
            )),
            outcome: RefCell::new(None),
        }
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn expect_outcome(&self) -> Result<SolveResponse, SolveError> {
        self.outcome
            .borrow()
            .as_ref()
            .cloned()
            .expect("outcome should be recorded before assertions")
    }
}

#[fixture]
fn world() -> VrpWorld {
    VrpWorld::new()
}

#[given("one vehicle with capacity {capacity} at location 0")]
fn given_vehicle(world: &VrpWorld, capacity: u64) {
    world.request.borrow_mut().vehicles = vec![vehicle(1, capacity, 0)];
}

#[given("jobs at locations 1 and 2 with demands 3 and 4")]
fn given_two_jobs(world: &VrpWorld) {
    world.request.borrow_mut().jobs = vec![job(1, 1, 1, 3), job(2, 2, 1, 4)];
}

#[when("the vrp-core solver runs")]
fn when_solver_runs(world: &VrpWorld) {
    let config = SolverConfig {
        search: SearchParameters::default().with_iteration_limit(10),
        ..SolverConfig::default()
    };
    let solver = RoutingSolver::with_config(VrpOracle::new(), config);
    let request = world.request.borrow().clone();
    world.outcome.replace(Some(solver.solve(&request)));
}

#[then("vehicle 1 serves jobs 1 then 2")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_jobs_in_order(world: &VrpWorld) {
    let response = world.expect_outcome().expect("expected solve success");
    let plan = response
        .result
        .routes
        .get(&VehicleId(1))
        .expect("vehicle 1 routed");
    assert_eq!(plan.jobs, vec![JobId(1), JobId(2)]);
}

#[then("the solve fails as infeasible")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_infeasible(world: &VrpWorld) {
    let err = world.expect_outcome().expect_err("expected infeasibility");
    assert_eq!(err, SolveError::Infeasible);
}

#[scenario(path = "tests/features/vrp_oracle.feature", index = 0)]
fn two_jobs_on_a_line(world: VrpWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/vrp_oracle.feature", index = 1)]
fn aggregate_demand_exceeds_vehicle(world: VrpWorld) {
    let _ = world;
}
