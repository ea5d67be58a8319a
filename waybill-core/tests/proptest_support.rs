//! Proptest strategies for core pipeline property tests.
//!
//! Generated requests always validate: matrices are square and every job and
//! vehicle location falls inside them.

use proptest::prelude::*;
use waybill_core::{Job, JobId, SolveRequest, TravelTimeMatrix, Vehicle, VehicleId};

/// Square matrix with `1..=max_locations` rows and travel times below 50.
pub fn matrix_strategy(max_locations: usize) -> impl Strategy<Value = Vec<Vec<u64>>> {
    (1..=max_locations).prop_flat_map(|n| {
        proptest::collection::vec(proptest::collection::vec(0_u64..50, n), n)
    })
}

/// Request with one vehicle at location 0 and up to one job per location.
///
/// Each job sits on its own location so job identity and per-node service
/// agree.
pub fn request_strategy(max_locations: usize) -> impl Strategy<Value = SolveRequest> {
    matrix_strategy(max_locations).prop_flat_map(|rows| {
        let n = rows.len();
        (
            Just(rows),
            proptest::collection::vec((any::<bool>(), 0_u64..10, 0_u64..5), n),
        )
            .prop_map(|(rows, slots)| {
                let jobs = slots
                    .into_iter()
                    .enumerate()
                    .filter(|(_, (placed, _, _))| *placed)
                    .map(|(location_index, (_, service, demand))| Job {
                        id: JobId(location_index as u64 + 1),
                        location_index,
                        service,
                        delivery: vec![demand],
                    })
                    .collect();
                SolveRequest {
                    vehicles: vec![Vehicle {
                        id: VehicleId(1),
                        capacity: vec![1_000],
                        start_index: 0,
                    }],
                    jobs,
                    matrix: TravelTimeMatrix::new(rows),
                }
            })
    })
}
