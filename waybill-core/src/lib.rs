//! Core domain types and the routing pipeline for Waybill.
//!
//! A [`SolveRequest`] describes vehicles, delivery jobs and a travel-time
//! matrix. The pipeline validates it into a [`ProblemInstance`], augments the
//! matrix with a synthetic depot ([`GraphBuilder`]), lays out the fleet
//! ([`FleetModelBuilder`]) and solver indices ([`IndexManager`]), and builds a
//! [`RoutingModel`] with `Time` and `Capacity` dimensions. Any [`Oracle`] can
//! then search the model; [`SolutionDecoder`] turns its [`Assignment`] back
//! into per-vehicle job lists.
//!
//! [`RoutingSolver`] wires these steps together behind the [`Solver`] trait.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod decode;
pub mod error;
pub mod fleet;
pub mod graph;
pub mod ids;
pub mod index;
pub mod instance;
pub mod matrix;
pub mod model;
pub mod oracle;
pub mod request;
pub mod result;
pub mod search;
pub mod solver;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use crate::decode::{DecodeError, SolutionDecoder};
pub use crate::error::{SolveError, ValidationError};
pub use crate::fleet::{FleetError, FleetModel, FleetModelBuilder};
pub use crate::graph::{AugmentedGraph, GraphBuilder, RangeError};
pub use crate::ids::{JobId, NodeIndex, SolverIndex, VehicleId};
pub use crate::index::IndexManager;
pub use crate::instance::ProblemInstance;
pub use crate::matrix::{MatrixError, TravelTimeMatrix};
pub use crate::model::{
    CAPACITY, DEFAULT_SPAN_COST_COEFFICIENT, DEFAULT_TIME_LIMIT, Dimension, Disjunction,
    ModelConfig, RouteEvaluation, RoutingModel, SkipPenalty, TIME, TimeConstraint, Transit,
};
pub use crate::oracle::{Assignment, Oracle, OracleError};
pub use crate::request::{Job, SolveRequest, Vehicle};
pub use crate::result::{Diagnostics, RoutePlan, SolveResponse, SolveResult};
pub use crate::search::{FirstSolutionStrategy, Metaheuristic, SearchParameters};
pub use crate::solver::{RoutingSolver, Solver, SolverConfig};
