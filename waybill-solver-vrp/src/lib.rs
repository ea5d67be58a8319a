//! Metaheuristic routing engine for Waybill backed by `vrp-core`.
//!
//! [`VrpOracle`] implements the [`Oracle`](waybill_core::Oracle) contract by
//! rebuilding the [`RoutingModel`](waybill_core::RoutingModel) as a
//! `vrp-core` problem: every job node becomes a delivery job, every vehicle
//! starts at its start node and returns to the depot before its time bound
//! runs out, and capacity is checked on delivered load.
//!
//! The engine minimises travel time and never visits waypoints, so their skip
//! penalties always count towards the reported objective. Any job node the
//! engine leaves unassigned turns the solve into
//! [`OracleError::Infeasible`](waybill_core::OracleError::Infeasible).

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod oracle;
mod vrp;

pub use oracle::{VrpOracle, VrpOracleConfig};
