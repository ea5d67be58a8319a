//! Facade crate for the Waybill routing engine.
//!
//! This crate re-exports the core domain types and the routing pipeline, and
//! exposes the engines behind feature flags: `solver-gls` (default) for the
//! native guided local search and `solver-vrp` for the `vrp-core` backend.
//!
//! # Examples
//! ```
//! # #[cfg(feature = "solver-gls")]
//! # {
//! use waybill::{GlsOracle, Job, JobId, RoutingSolver, SolveRequest, Solver, Vehicle, VehicleId};
//!
//! let request = SolveRequest {
//!     vehicles: vec![Vehicle { id: VehicleId(1), capacity: vec![10], start_index: 0 }],
//!     jobs: vec![Job { id: JobId(7), location_index: 1, service: 1, delivery: vec![2] }],
//!     matrix: vec![vec![0, 2], vec![2, 0]].into(),
//! };
//! let response = RoutingSolver::new(GlsOracle).solve(&request).unwrap();
//! assert_eq!(response.result.total_delivery_duration, 3);
//! # }
//! ```

#![forbid(unsafe_code)]

pub use waybill_core::{
    Assignment, Diagnostics, Job, JobId, Metaheuristic, ModelConfig, Oracle, OracleError,
    RoutePlan, RoutingModel, RoutingSolver, SearchParameters, SkipPenalty, SolveError,
    SolveRequest, SolveResponse, SolveResult, Solver, SolverConfig, TimeConstraint,
    TravelTimeMatrix, ValidationError, Vehicle, VehicleId,
};

#[cfg(feature = "solver-gls")]
pub use waybill_solver_gls::GlsOracle;

#[cfg(feature = "solver-vrp")]
pub use waybill_solver_vrp::{VrpOracle, VrpOracleConfig};
