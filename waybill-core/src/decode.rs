//! Turn an engine [`Assignment`] back into per-vehicle job lists.
//!
//! Durations are recomputed from the graph; the engine's objective is never
//! read back per arc.

use std::collections::{BTreeMap, HashSet};

use log::debug;
use thiserror::Error;

use crate::{Assignment, JobId, RoutePlan, RoutingModel, SolveResult, SolverIndex, VehicleId};

/// Errors returned by [`SolutionDecoder::decode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The assignment was sized for a different model.
    #[error("assignment covers {actual} indices but the model has {expected}")]
    AssignmentSize {
        /// Indices in the model.
        expected: usize,
        /// Indices in the assignment.
        actual: usize,
    },
    /// A vehicle's chain never reached its end index.
    #[error("route of vehicle {vehicle} breaks at index {at}")]
    BrokenChain {
        /// Vehicle whose chain broke.
        vehicle: VehicleId,
        /// Last index reached before the break.
        at: SolverIndex,
    },
}

/// Walks vehicle chains in a [`RoutingModel`].
#[derive(Debug, Clone, Copy)]
pub struct SolutionDecoder<'m, 'a> {
    model: &'m RoutingModel<'a>,
}

impl<'m, 'a> SolutionDecoder<'m, 'a> {
    /// Decoder for `model`.
    #[must_use]
    pub const fn new(model: &'m RoutingModel<'a>) -> Self {
        Self { model }
    }

    /// Rebuild every vehicle's route from `assignment`.
    ///
    /// A job is reported at most once across the result, so when two vehicles
    /// start on the same job node only the first lists it. Every vehicle
    /// still pays the start node's service time.
    pub fn decode(&self, assignment: &Assignment) -> Result<SolveResult, DecodeError> {
        let manager = self.model.manager();
        let fleet = self.model.fleet();
        if assignment.len() != manager.size() {
            return Err(DecodeError::AssignmentSize {
                expected: manager.size(),
                actual: assignment.len(),
            });
        }

        let mut emitted: HashSet<JobId> = HashSet::new();
        let mut routes = BTreeMap::new();
        let mut total = 0_u64;
        for vehicle in 0..manager.vehicle_count() {
            let Some(id) = fleet.id(vehicle) else {
                continue;
            };
            let plan = self.walk(assignment, vehicle, id, &mut emitted)?;
            total = total.saturating_add(plan.delivery_duration);
            routes.insert(id, plan);
        }

        debug!("decoded {} routes with total duration {total}", routes.len());
        Ok(SolveResult {
            total_delivery_duration: total,
            routes,
        })
    }

    fn walk(
        &self,
        assignment: &Assignment,
        vehicle: usize,
        id: VehicleId,
        emitted: &mut HashSet<JobId>,
    ) -> Result<RoutePlan, DecodeError> {
        let manager = self.model.manager();
        let graph = self.model.graph();
        let start = manager.start(vehicle);
        let end = manager.end(vehicle);
        let node_of = |index: SolverIndex| {
            manager
                .index_to_node(index)
                .ok_or(DecodeError::BrokenChain { vehicle: id, at: index })
        };

        let mut current = start;
        let mut node = node_of(current)?;
        let mut plan = RoutePlan {
            jobs: Vec::new(),
            delivery_duration: graph.service(node),
        };
        // Each index can be visited once, so a longer walk is a cycle.
        let mut remaining = manager.size();
        loop {
            if let Some(job) = manager.job_at(node)
                && emitted.insert(job)
            {
                plan.jobs.push(job);
            }
            if current == end {
                return Ok(plan);
            }
            let next = assignment
                .next(current)
                .ok_or(DecodeError::BrokenChain { vehicle: id, at: current })?;
            remaining = remaining
                .checked_sub(1)
                .ok_or(DecodeError::BrokenChain { vehicle: id, at: current })?;
            let next_node = node_of(next)?;
            plan.delivery_duration = plan
                .delivery_duration
                .saturating_add(graph.arc_cost(node, next_node));
            current = next;
            node = next_node;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ModelParts, job, request, vehicle};
    use crate::{ModelConfig, NodeIndex};
    use rstest::{fixture, rstest};

    /// Two jobs on a line, one vehicle starting at location 0.
    #[fixture]
    fn parts() -> ModelParts {
        ModelParts::new(request(
            vec![vehicle(1, 10, 0)],
            vec![job(1, 1, 1, 1), job(2, 2, 1, 1)],
            vec![vec![0, 2, 5], vec![2, 0, 3], vec![5, 3, 0]],
        ))
        .expect("valid request")
    }

    fn index(model: &RoutingModel<'_>, location: usize) -> SolverIndex {
        let node = NodeIndex::from_location(location).expect("location in range");
        model.manager().node_to_index(node).expect("regular node")
    }

    #[rstest]
    fn decodes_jobs_in_visiting_order(parts: ModelParts) {
        let model = parts.model(&ModelConfig::default()).expect("model");
        let route = vec![index(&model, 2), index(&model, 1)];
        let assignment = Assignment::from_routes(model.manager(), &[route], 0);
        let result = SolutionDecoder::new(&model)
            .decode(&assignment)
            .expect("decodes");
        let plan = result.routes.get(&VehicleId(1)).expect("vehicle 1");
        assert_eq!(plan.jobs, vec![JobId(2), JobId(1)]);
        // (5 + 1) + (3 + 1) + 0
        assert_eq!(plan.delivery_duration, 10);
        assert_eq!(result.total_delivery_duration, 10);
    }

    #[rstest]
    fn empty_route_costs_only_the_start_service(parts: ModelParts) {
        let model = parts.model(&ModelConfig::default()).expect("model");
        let assignment = Assignment::from_routes(model.manager(), &[], 0);
        let result = SolutionDecoder::new(&model)
            .decode(&assignment)
            .expect("decodes");
        assert_eq!(result.total_delivery_duration, 0);
        assert!(result.jobs().next().is_none());
    }

    #[rstest]
    fn wrong_sized_assignment_is_rejected(parts: ModelParts) {
        let model = parts.model(&ModelConfig::default()).expect("model");
        let err = SolutionDecoder::new(&model)
            .decode(&Assignment::new(vec![None; 2], 0))
            .expect_err("size mismatch");
        assert_eq!(
            err,
            DecodeError::AssignmentSize {
                expected: model.manager().size(),
                actual: 2
            }
        );
    }

    #[rstest]
    fn cycles_are_reported_as_broken_chains(parts: ModelParts) {
        let model = parts.model(&ModelConfig::default()).expect("model");
        let manager = model.manager();
        let a = index(&model, 1);
        let b = index(&model, 2);
        let mut next = vec![None; manager.size()];
        if let Some(slot) = next.get_mut(manager.start(0).0) {
            *slot = Some(a);
        }
        if let Some(slot) = next.get_mut(a.0) {
            *slot = Some(b);
        }
        if let Some(slot) = next.get_mut(b.0) {
            *slot = Some(a);
        }
        let err = SolutionDecoder::new(&model)
            .decode(&Assignment::new(next, 0))
            .expect_err("cycle");
        assert!(matches!(err, DecodeError::BrokenChain { vehicle, .. } if vehicle == VehicleId(1)));
    }

    #[rstest]
    fn shared_start_job_is_reported_once() {
        let parts = ModelParts::new(request(
            vec![vehicle(1, 10, 0), vehicle(2, 10, 0)],
            vec![job(5, 0, 4, 1)],
            vec![vec![0, 1], vec![1, 0]],
        ))
        .expect("valid request");
        let model = parts.model(&ModelConfig::default()).expect("model");
        let assignment = Assignment::from_routes(model.manager(), &[], 0);
        let result = SolutionDecoder::new(&model)
            .decode(&assignment)
            .expect("decodes");
        assert_eq!(result.jobs().collect::<Vec<_>>(), vec![JobId(5)]);
        let second = result.routes.get(&VehicleId(2)).expect("vehicle 2");
        assert!(second.jobs.is_empty());
        assert_eq!(second.delivery_duration, 4);
        assert_eq!(result.total_delivery_duration, 8);
    }
}
