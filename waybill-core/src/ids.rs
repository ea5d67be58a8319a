//! Typed identifiers for the three coordinate spaces a solve moves through.
//!
//! Job and vehicle IDs are caller-visible. Graph nodes index the augmented
//! travel-time matrix, where node 0 is the synthetic depot. Solver indices
//! belong to the engine and duplicate start and end nodes per vehicle.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Caller-supplied job identifier.
///
/// # Examples
/// ```
/// use waybill_core::JobId;
///
/// assert_eq!(JobId(7).to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct JobId(pub u64);

/// Caller-supplied vehicle identifier, expected to be a permutation of `1..=V`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct VehicleId(pub u64);

/// Position in the augmented travel-time graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(pub usize);

/// Position in the engine's index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SolverIndex(pub usize);

impl NodeIndex {
    /// The synthetic depot every vehicle returns to.
    pub const DEPOT: Self = Self(0);

    /// Node for a zero-based matrix location, or `None` when the shift past
    /// the depot overflows.
    ///
    /// # Examples
    /// ```
    /// use waybill_core::NodeIndex;
    ///
    /// assert_eq!(NodeIndex::from_location(0), Some(NodeIndex(1)));
    /// assert_eq!(NodeIndex::from_location(usize::MAX), None);
    /// ```
    #[must_use]
    pub const fn from_location(location_index: usize) -> Option<Self> {
        match location_index.checked_add(1) {
            Some(node) => Some(Self(node)),
            None => None,
        }
    }

    /// Whether this node is the synthetic depot.
    #[must_use]
    pub const fn is_depot(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for SolverIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 1)]
    #[case(4, 5)]
    fn locations_shift_past_the_depot(#[case] location: usize, #[case] node: usize) {
        assert_eq!(NodeIndex::from_location(location), Some(NodeIndex(node)));
        assert!(NodeIndex::from_location(location).is_some_and(|n| !n.is_depot()));
    }

    #[rstest]
    fn largest_location_has_no_node() {
        assert_eq!(NodeIndex::from_location(usize::MAX), None);
    }

    #[rstest]
    fn depot_is_node_zero() {
        assert!(NodeIndex::DEPOT.is_depot());
        assert_eq!(NodeIndex::DEPOT.to_string(), "n0");
    }
}
