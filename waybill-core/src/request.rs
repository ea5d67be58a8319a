//! Raw solve input: vehicles, jobs and the travel-time matrix.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{JobId, TravelTimeMatrix, VehicleId};

/// A vehicle available for routing.
///
/// Only the first capacity entry is consumed. Every vehicle ends at the
/// synthetic depot, so no end location is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vehicle {
    /// Identifier in `1..=V`.
    pub id: VehicleId,
    /// Capacity per load dimension.
    pub capacity: Vec<u64>,
    /// Zero-based matrix location the vehicle departs from.
    pub start_index: usize,
}

/// A delivery job placed at a matrix location.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Job {
    /// Non-zero identifier, unique within the request.
    pub id: JobId,
    /// Zero-based matrix location of the job.
    pub location_index: usize,
    /// Time spent at the location.
    pub service: u64,
    /// Quantity delivered per load dimension.
    pub delivery: Vec<u64>,
}

/// A full routing request.
///
/// # Examples
/// ```
/// use waybill_core::{Job, JobId, SolveRequest, TravelTimeMatrix, Vehicle, VehicleId};
///
/// let request = SolveRequest {
///     vehicles: vec![Vehicle { id: VehicleId(1), capacity: vec![10], start_index: 0 }],
///     jobs: vec![Job { id: JobId(7), location_index: 1, service: 1, delivery: vec![3] }],
///     matrix: TravelTimeMatrix::new(vec![vec![0, 2], vec![2, 0]]),
/// };
/// assert_eq!(request.matrix.locations(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveRequest {
    /// Fleet to route.
    pub vehicles: Vec<Vehicle>,
    /// Jobs to serve.
    pub jobs: Vec<Job>,
    /// Travel times between locations.
    pub matrix: TravelTimeMatrix,
}

impl Vehicle {
    /// Capacity of the single consumed load dimension.
    #[must_use]
    pub fn primary_capacity(&self) -> Option<u64> {
        self.capacity.first().copied()
    }
}

impl Job {
    /// Demand of the single consumed load dimension.
    #[must_use]
    pub fn primary_demand(&self) -> Option<u64> {
        self.delivery.first().copied()
    }
}
