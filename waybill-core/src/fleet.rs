//! Per-vehicle capacity, start and end nodes.

use thiserror::Error;

use crate::{NodeIndex, Vehicle, VehicleId};

/// Errors returned by [`FleetModelBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FleetError {
    /// The fleet has no vehicles.
    #[error("at least one vehicle is required")]
    Empty,
    /// A vehicle ID falls outside `1..=V`.
    #[error("vehicle id {id} is outside 1..={vehicles}")]
    IdOutOfRange {
        /// Offending identifier.
        id: VehicleId,
        /// Fleet size.
        vehicles: usize,
    },
    /// Two vehicles share an ID.
    #[error("vehicle id {id} appears more than once")]
    DuplicateId {
        /// Repeated identifier.
        id: VehicleId,
    },
    /// A vehicle starts outside the matrix.
    #[error("vehicle {id} starts at location {start_index} but the matrix has {locations} locations")]
    StartOutOfRange {
        /// Offending vehicle.
        id: VehicleId,
        /// Requested start location.
        start_index: usize,
        /// Number of locations in the matrix.
        locations: usize,
    },
    /// A vehicle has no capacity entries.
    #[error("vehicle {id} has no capacity")]
    MissingCapacity {
        /// Offending vehicle.
        id: VehicleId,
    },
}

/// Vehicle attributes as parallel arrays indexed by position `id - 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetModel {
    ids: Vec<VehicleId>,
    capacities: Vec<u64>,
    start_nodes: Vec<NodeIndex>,
    end_nodes: Vec<NodeIndex>,
}

/// Builds a [`FleetModel`] for a graph with `node_count` nodes.
///
/// # Examples
/// ```
/// use waybill_core::{FleetModelBuilder, NodeIndex, Vehicle, VehicleId};
///
/// # fn main() -> Result<(), waybill_core::FleetError> {
/// let vehicles = [
///     Vehicle { id: VehicleId(2), capacity: vec![5], start_index: 1 },
///     Vehicle { id: VehicleId(1), capacity: vec![8], start_index: 0 },
/// ];
/// let fleet = FleetModelBuilder::new(3).build(&vehicles)?;
/// assert_eq!(fleet.capacities(), &[8, 5]);
/// assert_eq!(fleet.start_node(1), Some(NodeIndex(2)));
/// assert_eq!(fleet.end_node(1), Some(NodeIndex::DEPOT));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FleetModelBuilder {
    node_count: usize,
}

impl FleetModelBuilder {
    /// Builder for a graph of `node_count` nodes, depot included.
    #[must_use]
    pub const fn new(node_count: usize) -> Self {
        Self { node_count }
    }

    /// Place each vehicle at position `id - 1`.
    pub fn build(self, vehicles: &[Vehicle]) -> Result<FleetModel, FleetError> {
        if vehicles.is_empty() {
            return Err(FleetError::Empty);
        }
        let count = vehicles.len();
        let locations = self.node_count.saturating_sub(1);
        let mut slots: Vec<Option<(u64, NodeIndex)>> = vec![None; count];

        for vehicle in vehicles {
            let out_of_range = FleetError::IdOutOfRange {
                id: vehicle.id,
                vehicles: count,
            };
            let position = usize::try_from(vehicle.id.0)
                .ok()
                .and_then(|id| id.checked_sub(1))
                .ok_or_else(|| out_of_range.clone())?;
            let slot = slots.get_mut(position).ok_or(out_of_range)?;
            if slot.is_some() {
                return Err(FleetError::DuplicateId { id: vehicle.id });
            }
            let start = NodeIndex::from_location(vehicle.start_index)
                .filter(|_| vehicle.start_index < locations)
                .ok_or(FleetError::StartOutOfRange {
                    id: vehicle.id,
                    start_index: vehicle.start_index,
                    locations,
                })?;
            let capacity = vehicle
                .primary_capacity()
                .ok_or(FleetError::MissingCapacity { id: vehicle.id })?;
            *slot = Some((capacity, start));
        }

        // `V` distinct IDs in `1..=V` fill every slot.
        let (capacities, start_nodes): (Vec<_>, Vec<_>) = slots.into_iter().flatten().unzip();
        let ids = (1..=count as u64).map(VehicleId).collect();
        Ok(FleetModel {
            ids,
            capacities,
            start_nodes,
            end_nodes: vec![NodeIndex::DEPOT; count],
        })
    }
}

impl FleetModel {
    /// Number of vehicles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.capacities.len()
    }

    /// Whether the fleet is empty. A built fleet never is.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.capacities.is_empty()
    }

    /// Identifier of the vehicle at `position`.
    #[must_use]
    pub fn id(&self, position: usize) -> Option<VehicleId> {
        self.ids.get(position).copied()
    }

    /// Capacity of the vehicle at `position`.
    #[must_use]
    pub fn capacity(&self, position: usize) -> Option<u64> {
        self.capacities.get(position).copied()
    }

    /// Start node of the vehicle at `position`.
    #[must_use]
    pub fn start_node(&self, position: usize) -> Option<NodeIndex> {
        self.start_nodes.get(position).copied()
    }

    /// End node of the vehicle at `position`, always the depot.
    #[must_use]
    pub fn end_node(&self, position: usize) -> Option<NodeIndex> {
        self.end_nodes.get(position).copied()
    }

    /// Capacities in position order.
    #[must_use]
    pub fn capacities(&self) -> &[u64] {
        &self.capacities
    }

    /// Start nodes in position order.
    #[must_use]
    pub fn start_nodes(&self) -> &[NodeIndex] {
        &self.start_nodes
    }

    /// End nodes in position order.
    #[must_use]
    pub fn end_nodes(&self) -> &[NodeIndex] {
        &self.end_nodes
    }
}
