//! Domain-level solve output.

use std::collections::BTreeMap;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{JobId, VehicleId};

/// One vehicle's ordered stops and accumulated duration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoutePlan {
    /// Jobs in visiting order.
    pub jobs: Vec<JobId>,
    /// Start service plus every traversed arc's travel and service time.
    pub delivery_duration: u64,
}

/// Routes for every vehicle and their summed duration.
///
/// # Examples
/// ```
/// use waybill_core::{JobId, RoutePlan, SolveResult, VehicleId};
///
/// let mut result = SolveResult::default();
/// result.routes.insert(VehicleId(1), RoutePlan { jobs: vec![JobId(7)], delivery_duration: 3 });
/// result.total_delivery_duration = 3;
/// assert_eq!(result.jobs().collect::<Vec<_>>(), vec![JobId(7)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolveResult {
    /// Sum of every route's duration.
    pub total_delivery_duration: u64,
    /// Routes keyed by vehicle, ascending.
    pub routes: BTreeMap<VehicleId, RoutePlan>,
}

impl SolveResult {
    /// Every routed job, vehicle by vehicle.
    pub fn jobs(&self) -> impl Iterator<Item = JobId> + '_ {
        self.routes.values().flat_map(|plan| plan.jobs.iter().copied())
    }
}

/// Facts about how a result was reached.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Diagnostics {
    /// Objective value reported by the engine.
    pub objective: u64,
    /// Route duration limit the model used.
    pub time_limit: u64,
    /// Wall-clock time spent in the engine.
    pub elapsed: Duration,
}

/// Result plus diagnostics returned by [`crate::Solver::solve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveResponse {
    /// Decoded routes.
    pub result: SolveResult,
    /// Engine diagnostics.
    pub diagnostics: Diagnostics,
}
