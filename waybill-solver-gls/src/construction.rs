//! First solutions.
//!
//! Path-cheapest-arc lets each vehicle in turn extend its path with the
//! cheapest arc to an unrouted job node that still fits both dimensions.
//! Parallel cheapest insertion places job nodes by decreasing demand, each
//! where it raises route cost the least. Job nodes a strategy leaves over are
//! inserted at their cheapest feasible position, moving one routed node to
//! another position when no free slot remains. When the requested strategy
//! still strands a job node the other one is tried. Waypoints are left for
//! local search.

use std::cmp::Reverse;

use log::debug;
use waybill_core::{FirstSolutionStrategy, OracleError, RoutingModel, SolverIndex};

/// Build one interior route per vehicle, or report that some job cannot be
/// placed by any strategy.
pub(crate) fn first_solution(
    model: &RoutingModel<'_>,
    preferred: FirstSolutionStrategy,
) -> Result<Vec<Vec<SolverIndex>>, OracleError> {
    let vehicles = model.manager().vehicle_count();
    if let Some(vehicle) = (0..vehicles).find(|&v| !model.evaluate_route(v, &[]).feasible) {
        debug!("vehicle at position {vehicle} cannot even return to the depot within its bounds");
        return Err(OracleError::Infeasible);
    }

    for strategy in strategies(preferred) {
        let (mut routes, leftovers) = match strategy {
            FirstSolutionStrategy::PathCheapestArc => path_cheapest_arc(model),
            FirstSolutionStrategy::ParallelCheapestInsertion => parallel_cheapest_insertion(model),
        };
        if leftovers
            .into_iter()
            .all(|index| place(model, &mut routes, index))
        {
            return Ok(routes);
        }
        debug!("{strategy:?} left a job node without a feasible position");
    }
    Err(OracleError::Infeasible)
}

const fn strategies(preferred: FirstSolutionStrategy) -> [FirstSolutionStrategy; 2] {
    match preferred {
        FirstSolutionStrategy::PathCheapestArc => [
            FirstSolutionStrategy::PathCheapestArc,
            FirstSolutionStrategy::ParallelCheapestInsertion,
        ],
        FirstSolutionStrategy::ParallelCheapestInsertion => [
            FirstSolutionStrategy::ParallelCheapestInsertion,
            FirstSolutionStrategy::PathCheapestArc,
        ],
    }
}

fn job_nodes<'m>(model: &'m RoutingModel<'_>) -> impl Iterator<Item = SolverIndex> + 'm {
    model
        .manager()
        .regular_indices()
        .filter(|&index| model.is_mandatory(index))
}

/// Routes grown one vehicle at a time, and the job nodes none of them took.
fn path_cheapest_arc(model: &RoutingModel<'_>) -> (Vec<Vec<SolverIndex>>, Vec<SolverIndex>) {
    let manager = model.manager();
    let vehicles = manager.vehicle_count();
    let mut routed = vec![false; manager.size()];
    let mut routes = Vec::with_capacity(vehicles);
    for vehicle in 0..vehicles {
        let end = manager.end(vehicle);
        let mut route = Vec::new();
        let mut last = manager.start(vehicle);
        let mut cumuls = vec![0_u64; model.dimensions().len()];
        loop {
            let fits = |next: SolverIndex| {
                model
                    .dimensions()
                    .iter()
                    .zip(&cumuls)
                    .all(|(dimension, &cumul)| {
                        cumul
                            .saturating_add(model.transit(dimension, last, next))
                            .saturating_add(model.transit(dimension, next, end))
                            <= dimension.bound(vehicle)
                    })
            };
            let cheapest = job_nodes(model)
                .filter(|index| !routed.get(index.0).copied().unwrap_or(true))
                .filter(|&index| fits(index))
                .min_by_key(|&index| (model.arc_cost(last, index), index));
            let Some(next) = cheapest else {
                break;
            };
            for (cumul, dimension) in cumuls.iter_mut().zip(model.dimensions()) {
                *cumul = cumul.saturating_add(model.transit(dimension, last, next));
            }
            if let Some(flag) = routed.get_mut(next.0) {
                *flag = true;
            }
            route.push(next);
            last = next;
        }
        routes.push(route);
    }

    let leftovers = job_nodes(model)
        .filter(|index| !routed.get(index.0).copied().unwrap_or(true))
        .collect();
    (routes, leftovers)
}

/// Routes filled heaviest job first, and the job nodes that found no slot.
fn parallel_cheapest_insertion(
    model: &RoutingModel<'_>,
) -> (Vec<Vec<SolverIndex>>, Vec<SolverIndex>) {
    let manager = model.manager();
    let mut pending: Vec<SolverIndex> = job_nodes(model).collect();
    pending.sort_by_key(|&index| {
        let demand = manager
            .index_to_node(index)
            .map_or(0, |node| model.graph().demand(node));
        (Reverse(demand), index)
    });

    let mut routes = vec![Vec::new(); manager.vehicle_count()];
    let mut leftovers = Vec::new();
    for index in pending {
        if !insert_cheapest(model, &mut routes, index) {
            leftovers.push(index);
        }
    }
    (routes, leftovers)
}

fn place(model: &RoutingModel<'_>, routes: &mut [Vec<SolverIndex>], index: SolverIndex) -> bool {
    insert_cheapest(model, routes, index) || insert_with_ejection(model, routes, index)
}

/// Insert `index` where it raises route cost the least without breaking a
/// bound. Returns `false`, leaving `routes` untouched, when no slot fits.
fn insert_cheapest(
    model: &RoutingModel<'_>,
    routes: &mut [Vec<SolverIndex>],
    index: SolverIndex,
) -> bool {
    let mut best: Option<(u64, usize, usize)> = None;
    for (vehicle, route) in routes.iter().enumerate() {
        let base = model.evaluate_route(vehicle, route).cost;
        for slot in 0..=route.len() {
            let mut candidate = route.clone();
            candidate.insert(slot, index);
            let evaluation = model.evaluate_route(vehicle, &candidate);
            if !evaluation.feasible {
                continue;
            }
            let delta = evaluation.cost.saturating_sub(base);
            if best.is_none_or(|(cost, _, _)| delta < cost) {
                best = Some((delta, vehicle, slot));
            }
        }
    }
    let Some((_, vehicle, slot)) = best else {
        return false;
    };
    let Some(route) = routes.get_mut(vehicle) else {
        return false;
    };
    route.insert(slot, index);
    true
}

/// Free room for `index` by moving one routed node elsewhere.
fn insert_with_ejection(
    model: &RoutingModel<'_>,
    routes: &mut [Vec<SolverIndex>],
    index: SolverIndex,
) -> bool {
    let lengths: Vec<usize> = routes.iter().map(Vec::len).collect();
    for (vehicle, &length) in lengths.iter().enumerate() {
        for position in 0..length {
            let mut trial = routes.to_vec();
            let Some(ejected) = trial.get_mut(vehicle).map(|route| route.remove(position)) else {
                continue;
            };
            if insert_cheapest(model, &mut trial, index)
                && insert_cheapest(model, &mut trial, ejected)
            {
                debug!("placed {index} after moving {ejected} off vehicle position {vehicle}");
                routes.clone_from_slice(&trial);
                return true;
            }
        }
    }
    debug!("no vehicle can take {index} within its bounds");
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use waybill_core::test_support::{
        ModelParts, job, request, tight_packing_request, two_job_request, vehicle,
    };
    use waybill_core::{JobId, ModelConfig, NodeIndex};

    fn jobs_per_route(model: &RoutingModel<'_>, routes: &[Vec<SolverIndex>]) -> Vec<Vec<JobId>> {
        routes
            .iter()
            .map(|route| {
                let mut jobs: Vec<JobId> = route
                    .iter()
                    .filter_map(|&index| model.manager().job_at_index(index))
                    .collect();
                jobs.sort();
                jobs
            })
            .collect()
    }

    #[rstest]
    fn follows_the_cheapest_arc_first() {
        let parts = ModelParts::new(two_job_request()).expect("valid request");
        let model = parts.model(&ModelConfig::default()).expect("model");
        let routes = first_solution(&model, FirstSolutionStrategy::PathCheapestArc)
            .expect("feasible");
        let nodes: Vec<_> = routes
            .iter()
            .flatten()
            .filter_map(|&index| model.manager().index_to_node(index))
            .collect();
        assert_eq!(nodes, vec![NodeIndex(2), NodeIndex(3)]);
    }

    #[rstest]
    fn second_vehicle_takes_what_the_first_cannot_carry() {
        let parts = ModelParts::new(request(
            vec![vehicle(1, 5, 0), vehicle(2, 5, 0)],
            vec![job(1, 1, 0, 4), job(2, 2, 0, 4)],
            vec![vec![0, 1, 2], vec![1, 0, 1], vec![2, 1, 0]],
        ))
        .expect("valid request");
        let model = parts.model(&ModelConfig::default()).expect("model");
        let routes = first_solution(&model, FirstSolutionStrategy::PathCheapestArc)
            .expect("feasible");
        assert_eq!(routes.len(), 2);
        assert!(routes.iter().all(|route| route.len() == 1));
    }

    #[rstest]
    fn greedy_paths_can_strand_a_heavy_job() {
        let parts = ModelParts::new(tight_packing_request()).expect("valid request");
        let model = parts.model(&ModelConfig::default()).expect("model");
        let (routes, leftovers) = path_cheapest_arc(&model);
        assert_eq!(
            jobs_per_route(&model, &routes),
            vec![vec![JobId(1), JobId(2)], vec![JobId(3)]]
        );
        let stranded: Vec<_> = leftovers
            .iter()
            .filter_map(|&index| model.manager().job_at_index(index))
            .collect();
        assert_eq!(stranded, vec![JobId(4)]);
    }

    #[rstest]
    #[case(FirstSolutionStrategy::PathCheapestArc)]
    #[case(FirstSolutionStrategy::ParallelCheapestInsertion)]
    fn tight_packing_pairs_light_and_heavy_jobs(#[case] strategy: FirstSolutionStrategy) {
        let parts = ModelParts::new(tight_packing_request()).expect("valid request");
        let model = parts.model(&ModelConfig::default()).expect("model");
        let routes = first_solution(&model, strategy).expect("feasible");
        assert!(
            routes
                .iter()
                .enumerate()
                .all(|(vehicle, route)| model.evaluate_route(vehicle, route).feasible)
        );
        let mut pairs = jobs_per_route(&model, &routes);
        pairs.sort();
        assert_eq!(
            pairs,
            vec![vec![JobId(1), JobId(3)], vec![JobId(2), JobId(4)]]
        );
    }

    #[rstest]
    fn insertion_places_the_heaviest_job_first() {
        let parts = ModelParts::new(tight_packing_request()).expect("valid request");
        let model = parts.model(&ModelConfig::default()).expect("model");
        let (routes, leftovers) = parallel_cheapest_insertion(&model);
        assert!(leftovers.is_empty());
        assert_eq!(
            jobs_per_route(&model, &routes),
            vec![vec![JobId(1), JobId(3)], vec![JobId(2), JobId(4)]]
        );
    }

    #[rstest]
    fn waypoints_are_not_routed() {
        let parts = ModelParts::new(request(
            vec![vehicle(1, 5, 0)],
            vec![job(1, 1, 0, 1)],
            vec![vec![0, 1, 1], vec![1, 0, 1], vec![1, 1, 0]],
        ))
        .expect("valid request");
        let model = parts.model(&ModelConfig::default()).expect("model");
        let routes = first_solution(&model, FirstSolutionStrategy::ParallelCheapestInsertion)
            .expect("feasible");
        assert_eq!(routes, vec![vec![SolverIndex(0)]]);
    }

    #[rstest]
    #[case(FirstSolutionStrategy::PathCheapestArc)]
    #[case(FirstSolutionStrategy::ParallelCheapestInsertion)]
    fn overloaded_single_vehicle_is_infeasible(#[case] strategy: FirstSolutionStrategy) {
        let parts = ModelParts::new(request(
            vec![vehicle(1, 5, 0)],
            vec![job(1, 1, 0, 4), job(2, 2, 0, 4)],
            vec![vec![0, 1, 2], vec![1, 0, 1], vec![2, 1, 0]],
        ))
        .expect("valid request");
        let model = parts.model(&ModelConfig::default()).expect("model");
        assert_eq!(first_solution(&model, strategy), Err(OracleError::Infeasible));
    }
}
