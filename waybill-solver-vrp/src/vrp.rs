//! `vrp-core` modelling helpers for `VrpOracle`.
//!
//! Graph nodes double as `vrp-core` locations. This module converts a routing
//! model into a `vrp-core` problem, runs the solver, and translates each tour
//! back into solver indices.

use std::fmt::Display;
use std::sync::Arc;

use log::{debug, warn};
use vrp_core::models::common::{Location, Profile};
use vrp_core::models::problem::TravelTime;
use vrp_core::models::solution::Route as VrpRoute;
use vrp_core::prelude::*;
use waybill_core::{
    Assignment, CAPACITY, NodeIndex, OracleError, RoutingModel, SearchParameters, SolverIndex,
    TIME,
};

use crate::oracle::VrpOracleConfig;

custom_dimension!(VehiclePosition typeof usize);

fn define_goal(transport: Arc<dyn TransportCost>) -> GenericResult<GoalContext> {
    let unassigned_feature = MinimizeUnassignedBuilder::new("min-unassigned").build()?;
    let capacity_feature = CapacityFeatureBuilder::<SingleDimLoad>::new("capacity").build()?;
    let transport_feature = TransportFeatureBuilder::new("min-travel-time")
        .set_transport_cost(transport)
        .set_time_constrained(true)
        .build_minimize_distance()?;

    GoalContextBuilder::with_features(&[unassigned_feature, transport_feature, capacity_feature])?
        .build()
}

#[expect(
    clippy::cast_precision_loss,
    reason = "vrp-core measures time in floating-point units"
)]
const fn units(value: u64) -> f64 {
    value as f64
}

fn load_units(value: u64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn delivery(amount: u64) -> Demand<SingleDimLoad> {
    Demand {
        pickup: (SingleDimLoad::default(), SingleDimLoad::default()),
        delivery: (SingleDimLoad::new(load_units(amount)), SingleDimLoad::default()),
    }
}

struct ProblemSpec<'m, 'a> {
    model: &'m RoutingModel<'a>,
    jobs: &'m [NodeIndex],
    transport: Arc<dyn TransportCost>,
    goal: GoalContext,
}

fn define_problem(spec: ProblemSpec<'_, '_>) -> GenericResult<Problem> {
    let ProblemSpec {
        model,
        jobs: nodes,
        transport,
        goal,
    } = spec;
    let graph = model.graph();
    let time = model
        .dimension(TIME)
        .ok_or("routing model has no time dimension")?;
    let capacity = model
        .dimension(CAPACITY)
        .ok_or("routing model has no capacity dimension")?;

    let jobs = nodes
        .iter()
        .map(|&node| {
            SingleBuilder::default()
                .id(format!("node{node}").as_str())
                .demand(delivery(graph.demand(node)))
                .location(node.0)?
                .duration(units(graph.service(node)))?
                .build_as_job()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let vehicles = model
        .fleet()
        .start_nodes()
        .iter()
        .enumerate()
        .map(|(position, &start)| {
            // The start node's demand is loaded before the first arc.
            let load = capacity.bound(position).saturating_sub(graph.demand(start));
            VehicleBuilder::default()
                .id(format!("vehicle{position}").as_str())
                .add_detail(
                    VehicleDetailBuilder::default()
                        .set_start_location(start.0)
                        .set_start_time(0.0)
                        .set_end_location(NodeIndex::DEPOT.0)
                        .set_end_time(units(time.bound(position)))
                        .build()?,
                )
                .capacity(SingleDimLoad::new(load_units(load)))
                .dimension(|dimens| {
                    dimens.set_vehicle_position(position);
                })
                .build()
        })
        .collect::<Result<Vec<_>, _>>()?;

    ProblemBuilder::default()
        .add_jobs(jobs.into_iter())
        .add_vehicles(vehicles.into_iter())
        .with_goal(goal)
        .with_transport_cost(transport)
        .build()
}

struct TravelTimeTransportCost {
    durations: Vec<Vec<f64>>,
}

impl TravelTimeTransportCost {
    fn new(model: &RoutingModel<'_>) -> Self {
        let graph = model.graph();
        let nodes = graph.node_count();
        let durations = (0..nodes)
            .map(|from| {
                (0..nodes)
                    .map(|to| units(graph.travel(NodeIndex(from), NodeIndex(to))))
                    .collect()
            })
            .collect();
        Self { durations }
    }

    fn duration_units(&self, from: Location, to: Location) -> f64 {
        let result = self
            .durations
            .get(from)
            .and_then(|row| row.get(to))
            .copied();
        debug_assert!(result.is_some(), "Matrix lookup failed: from={from}, to={to}");
        result.unwrap_or(0.0)
    }
}

impl TransportCost for TravelTimeTransportCost {
    // Travel is neither route- nor time-dependent, so `route` and `departure`
    // go unused.
    fn distance(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> Cost {
        self.duration_units(from, to)
    }

    fn duration(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> f64 {
        self.duration_units(from, to)
    }

    fn distance_approx(&self, profile: &Profile, from: usize, to: usize) -> f64 {
        self.duration_approx(profile, from, to)
    }

    fn duration_approx(&self, _profile: &Profile, from: usize, to: usize) -> f64 {
        self.duration_units(from, to)
    }
}

/// Termination criteria handed to `vrp-core`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SearchLimits {
    pub(crate) generations: usize,
    pub(crate) seconds: usize,
}

impl SearchLimits {
    /// An iteration limit replaces the configured generation count. The time
    /// limit is rounded down to whole seconds, with a floor of one.
    pub(crate) fn new(config: &VrpOracleConfig, params: &SearchParameters) -> Self {
        let generations = params.iteration_limit.map_or(config.max_generations, |limit| {
            usize::try_from(limit).unwrap_or(usize::MAX)
        });
        let seconds = usize::try_from(params.time_limit.as_secs())
            .unwrap_or(usize::MAX)
            .max(1);
        Self {
            generations,
            seconds,
        }
    }
}

fn engine_error<E: Display>(error: &E) -> OracleError {
    OracleError::Engine {
        message: error.to_string(),
    }
}

/// Runs one `vrp-core` solve over a routing model.
pub(crate) struct VrpSolveContext {
    limits: SearchLimits,
}

impl VrpSolveContext {
    pub(crate) const fn new(limits: SearchLimits) -> Self {
        Self { limits }
    }

    /// Route every job node, or report that one cannot be placed.
    pub(crate) fn solve(&self, model: &RoutingModel<'_>) -> Result<Assignment, OracleError> {
        let vehicles = model.vehicle_count();
        if let Some(vehicle) = (0..vehicles).find(|&v| !model.evaluate_route(v, &[]).feasible) {
            debug!("vehicle at position {vehicle} cannot even return to the depot within its bounds");
            return Err(OracleError::Infeasible);
        }

        let manager = model.manager();
        let jobs: Vec<NodeIndex> = manager
            .regular_indices()
            .filter(|&index| model.is_mandatory(index))
            .filter_map(|index| manager.index_to_node(index))
            .collect();
        let routes = if jobs.is_empty() {
            vec![Vec::new(); vehicles]
        } else {
            self.search(model, &jobs)?
        };
        let objective = model.objective(&routes);
        Ok(Assignment::from_routes(manager, &routes, objective))
    }

    fn search(
        &self,
        model: &RoutingModel<'_>,
        jobs: &[NodeIndex],
    ) -> Result<Vec<Vec<SolverIndex>>, OracleError> {
        let transport = Arc::new(TravelTimeTransportCost::new(model));
        let goal = define_goal(transport.clone()).map_err(|error| engine_error(&error))?;
        let problem = Arc::new(
            define_problem(ProblemSpec {
                model,
                jobs,
                transport,
                goal,
            })
            .map_err(|error| engine_error(&error))?,
        );

        let config = VrpConfigBuilder::new(problem.clone())
            .prebuild()
            .map_err(|error| engine_error(&error))?
            .with_max_generations(Some(self.limits.generations))
            .with_max_time(Some(self.limits.seconds))
            .build()
            .map_err(|error| engine_error(&error))?;

        let solution = vrp_core::solver::Solver::new(problem, config)
            .solve()
            .map_err(|error| engine_error(&error))?;

        if !solution.unassigned.is_empty() {
            debug!("{} job nodes left unassigned", solution.unassigned.len());
            return Err(OracleError::Infeasible);
        }

        let manager = model.manager();
        let mut routes = vec![Vec::new(); model.vehicle_count()];
        for (route, locations) in solution.routes.iter().zip(solution.get_locations()) {
            let position = route.actor.vehicle.dimens.get_vehicle_position().copied();
            let Some(slot) = position.and_then(|at| routes.get_mut(at)) else {
                warn!("vrp-core returned a tour for an unknown vehicle");
                continue;
            };
            // Start and depot locations have no regular index and drop out.
            *slot = locations
                .filter_map(|location| manager.node_to_index(NodeIndex(location)))
                .collect();
        }
        Ok(routes)
    }
}
