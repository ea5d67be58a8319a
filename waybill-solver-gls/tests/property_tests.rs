//! Property-based tests for `GlsOracle`.
//!
//! # Invariants tested
//!
//! - **Capacity conservation:** the jobs a vehicle serves never exceed its
//!   capacity, and no job is served twice.
//! - **Time bound:** no route's delivery duration exceeds the time limit.
//! - **Completeness:** a successful solve serves every job.
//! - **Feasible instances solve:** when every vehicle can take its share of
//!   jobs regardless of which jobs they are, the solve succeeds.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use waybill_core::{
    Job, JobId, ModelConfig, RoutingSolver, SearchParameters, SolveError, SolveRequest,
    SolveResponse, Solver, SolverConfig, TimeConstraint, TravelTimeMatrix, Vehicle, VehicleId,
};
use waybill_solver_gls::GlsOracle;

const TIME_LIMIT: u64 = 200;
const CAPACITY: u64 = 12;
const GENEROUS_TIME_LIMIT: u64 = 10_000;

/// Up to six locations, up to three vehicles and at most one job per
/// location.
fn request_strategy() -> impl Strategy<Value = SolveRequest> {
    (2_usize..=6, 1_usize..=3).prop_flat_map(|(n, vehicles)| {
        (
            proptest::collection::vec(proptest::collection::vec(0_u64..40, n), n),
            proptest::collection::vec((5_u64..15, 0..n), vehicles),
            proptest::collection::vec((any::<bool>(), 0_u64..10, 1_u64..6), n),
        )
            .prop_map(|(rows, fleet, slots)| SolveRequest {
                vehicles: fleet
                    .into_iter()
                    .enumerate()
                    .map(|(i, (capacity, start_index))| Vehicle {
                        id: VehicleId(i as u64 + 1),
                        capacity: vec![capacity],
                        start_index,
                    })
                    .collect(),
                jobs: slots
                    .into_iter()
                    .enumerate()
                    .filter(|(_, (placed, _, _))| *placed)
                    .map(|(location_index, (_, service, demand))| Job {
                        id: JobId(location_index as u64 + 1),
                        location_index,
                        service,
                        delivery: vec![demand],
                    })
                    .collect(),
                matrix: TravelTimeMatrix::new(rows),
            })
    })
}

/// Every vehicle starts at location 0 with capacity 12 and owes
/// `per_vehicle` jobs. Each demand is at most `12 / per_vehicle`, so any
/// `per_vehicle` jobs fit one vehicle, and no route can reach the time limit.
fn feasible_request_strategy() -> impl Strategy<Value = SolveRequest> {
    (1_usize..=3, 1_usize..=3).prop_flat_map(|(vehicles, per_vehicle)| {
        let jobs = vehicles * per_vehicle;
        let locations = jobs + 1;
        let max_demand = CAPACITY
            .checked_div(per_vehicle as u64)
            .unwrap_or(CAPACITY);
        (
            proptest::collection::vec(proptest::collection::vec(0_u64..40, locations), locations),
            proptest::collection::vec((0_u64..10, 1..=max_demand), jobs),
        )
            .prop_map(move |(rows, slots)| SolveRequest {
                vehicles: (1..=vehicles as u64)
                    .map(|id| Vehicle {
                        id: VehicleId(id),
                        capacity: vec![CAPACITY],
                        start_index: 0,
                    })
                    .collect(),
                jobs: slots
                    .into_iter()
                    .enumerate()
                    .map(|(i, (service, demand))| Job {
                        id: JobId(i as u64 + 1),
                        location_index: i + 1,
                        service,
                        delivery: vec![demand],
                    })
                    .collect(),
                matrix: TravelTimeMatrix::new(rows),
            })
    })
}

fn solve(request: &SolveRequest, time_limit: u64) -> Result<SolveResponse, SolveError> {
    let config = SolverConfig {
        model: ModelConfig {
            time_constraint: TimeConstraint::Fixed(time_limit),
            ..ModelConfig::default()
        },
        search: SearchParameters::default().with_iteration_limit(5),
    };
    RoutingSolver::with_config(GlsOracle, config).solve(request)
}

/// Loads within capacity, durations within `time_limit`, each job served
/// exactly once.
fn check_plan(
    request: &SolveRequest,
    response: &SolveResponse,
    time_limit: u64,
) -> Result<(), TestCaseError> {
    let demand_of: HashMap<JobId, u64> = request
        .jobs
        .iter()
        .map(|job| (job.id, job.delivery.first().copied().unwrap_or_default()))
        .collect();
    let mut seen = HashSet::new();
    for vehicle in &request.vehicles {
        let plan = response.result.routes.get(&vehicle.id).expect("every vehicle has a route");
        let load: u64 = plan.jobs.iter().filter_map(|id| demand_of.get(id)).sum();
        let capacity = vehicle.capacity.first().copied().unwrap_or_default();
        prop_assert!(load <= capacity, "vehicle {} carries {load} > {capacity}", vehicle.id);
        prop_assert!(plan.delivery_duration <= time_limit);
        for job in &plan.jobs {
            prop_assert!(seen.insert(*job), "job {job} served twice");
        }
    }
    prop_assert_eq!(seen.len(), request.jobs.len());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn solutions_respect_capacity_and_time(request in request_strategy()) {
        let response = match solve(&request, TIME_LIMIT) {
            Ok(response) => response,
            Err(err) => {
                prop_assert_eq!(err, SolveError::Infeasible);
                return Ok(());
            }
        };
        check_plan(&request, &response, TIME_LIMIT)?;
    }

    #[test]
    fn instances_that_fit_are_always_solved(request in feasible_request_strategy()) {
        let response = solve(&request, GENEROUS_TIME_LIMIT)
            .map_err(|err| TestCaseError::fail(format!("instance that fits failed: {err}")))?;
        check_plan(&request, &response, GENEROUS_TIME_LIMIT)?;
    }
}
