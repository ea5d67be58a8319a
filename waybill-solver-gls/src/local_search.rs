//! First-improvement local search over five neighbourhoods.
//!
//! Moves are tried in a fixed order and the first one that lowers the
//! augmented objective is applied. Every move keeps both dimensions within
//! their bounds.

use waybill_core::SolverIndex;

use crate::budget::Budget;
use crate::plan::{Candidate, Evaluator, Plan};

/// Apply improving moves until none remains or the clock runs out.
pub(crate) fn descend(plan: &mut Plan, evaluator: &Evaluator<'_, '_>, budget: &Budget) {
    while !budget.expired() {
        let Some(candidate) = improvement(plan, evaluator, budget) else {
            return;
        };
        plan.apply(candidate);
    }
}

fn improvement(plan: &Plan, evaluator: &Evaluator<'_, '_>, budget: &Budget) -> Option<Candidate> {
    relocate(plan, evaluator, budget)
        .or_else(|| exchange(plan, evaluator, budget))
        .or_else(|| two_opt(plan, evaluator, budget))
        .or_else(|| drop_waypoint(plan, evaluator))
        .or_else(|| insert_waypoint(plan, evaluator, budget))
}

fn improving(
    plan: &Plan,
    evaluator: &Evaluator<'_, '_>,
    routes: Vec<(usize, Vec<SolverIndex>)>,
    performed: Option<SolverIndex>,
    dropped: Option<SolverIndex>,
) -> Option<Candidate> {
    let current = plan.augmented();
    plan.price(evaluator, routes, performed, dropped)
        .filter(|candidate| candidate.augmented < current)
}

/// Move one node to another position, on the same or another route.
fn relocate(plan: &Plan, evaluator: &Evaluator<'_, '_>, budget: &Budget) -> Option<Candidate> {
    let vehicles = plan.routes().len();
    for from_vehicle in 0..vehicles {
        let from_route = plan.route(from_vehicle);
        for (position, &node) in from_route.iter().enumerate() {
            if budget.expired() {
                return None;
            }
            let mut without = from_route.to_vec();
            without.remove(position);
            for to_vehicle in 0..vehicles {
                let found = if to_vehicle == from_vehicle {
                    (0..=without.len())
                        .filter(|&slot| slot != position)
                        .find_map(|slot| {
                            let mut route = without.clone();
                            route.insert(slot, node);
                            improving(plan, evaluator, vec![(from_vehicle, route)], None, None)
                        })
                } else {
                    let target = plan.route(to_vehicle);
                    (0..=target.len()).find_map(|slot| {
                        let mut route = target.to_vec();
                        route.insert(slot, node);
                        improving(
                            plan,
                            evaluator,
                            vec![(from_vehicle, without.clone()), (to_vehicle, route)],
                            None,
                            None,
                        )
                    })
                };
                if found.is_some() {
                    return found;
                }
            }
        }
    }
    None
}

/// Swap two nodes, on the same or different routes.
fn exchange(plan: &Plan, evaluator: &Evaluator<'_, '_>, budget: &Budget) -> Option<Candidate> {
    let vehicles = plan.routes().len();
    for first_vehicle in 0..vehicles {
        let first = plan.route(first_vehicle);
        for (i, &a) in first.iter().enumerate() {
            if budget.expired() {
                return None;
            }
            for second_vehicle in first_vehicle..vehicles {
                let second = plan.route(second_vehicle);
                for (j, &b) in second.iter().enumerate() {
                    let routes = if first_vehicle == second_vehicle {
                        if j <= i {
                            continue;
                        }
                        let mut route = first.to_vec();
                        route.swap(i, j);
                        vec![(first_vehicle, route)]
                    } else {
                        let mut left = first.to_vec();
                        let mut right = second.to_vec();
                        if let Some(slot) = left.get_mut(i) {
                            *slot = b;
                        }
                        if let Some(slot) = right.get_mut(j) {
                            *slot = a;
                        }
                        vec![(first_vehicle, left), (second_vehicle, right)]
                    };
                    let found = improving(plan, evaluator, routes, None, None);
                    if found.is_some() {
                        return found;
                    }
                }
            }
        }
    }
    None
}

/// Reverse a segment of one route.
fn two_opt(plan: &Plan, evaluator: &Evaluator<'_, '_>, budget: &Budget) -> Option<Candidate> {
    for (vehicle, route) in plan.routes().iter().enumerate() {
        for i in 0..route.len() {
            if budget.expired() {
                return None;
            }
            for j in i + 2..route.len() {
                let mut reversed = route.clone();
                if let Some(segment) = reversed.get_mut(i..=j) {
                    segment.reverse();
                }
                let found = improving(plan, evaluator, vec![(vehicle, reversed)], None, None);
                if found.is_some() {
                    return found;
                }
            }
        }
    }
    None
}

/// Stop visiting an optional node.
fn drop_waypoint(plan: &Plan, evaluator: &Evaluator<'_, '_>) -> Option<Candidate> {
    let model = evaluator.model();
    for (vehicle, route) in plan.routes().iter().enumerate() {
        for (position, &node) in route.iter().enumerate() {
            if model.penalty(node).is_none() {
                continue;
            }
            let mut without = route.clone();
            without.remove(position);
            let found = improving(plan, evaluator, vec![(vehicle, without)], None, Some(node));
            if found.is_some() {
                return found;
            }
        }
    }
    None
}

/// Start visiting an optional node at its first improving position.
fn insert_waypoint(
    plan: &Plan,
    evaluator: &Evaluator<'_, '_>,
    budget: &Budget,
) -> Option<Candidate> {
    for &node in plan.unperformed() {
        if budget.expired() {
            return None;
        }
        for (vehicle, route) in plan.routes().iter().enumerate() {
            let found = (0..=route.len()).find_map(|slot| {
                let mut with = route.clone();
                with.insert(slot, node);
                improving(plan, evaluator, vec![(vehicle, with)], Some(node), None)
            });
            if found.is_some() {
                return found;
            }
        }
    }
    None
}
