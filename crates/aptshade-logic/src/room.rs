//! Room records and the labeling plan.
//!
//! Plain data only. Rooms arrive already read from the host, mutations
//! leave as values to be written by the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host element identifier of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A room as seen by the labeler.
///
/// Every field may be absent: the host can hold a parameter with no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    /// Display name of the level the room sits on.
    pub level: Option<String>,
    pub block: Option<String>,
    /// Apartment key.
    pub zone: Option<String>,
    /// Comparison key, expected to be equal across one apartment.
    pub sub_zone: Option<String>,
    pub sub_zone_id: Option<String>,
}

impl Room {
    /// The apartment group this room belongs to.
    pub fn apartment_key(&self) -> ApartmentKey {
        ApartmentKey {
            level: self.level.clone(),
            block: self.block.clone(),
            zone: self.zone.clone(),
        }
    }
}

/// Identifies one apartment group: `(level, block, zone)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApartmentKey {
    pub level: Option<String>,
    pub block: Option<String>,
    pub zone: Option<String>,
}

/// One write of the output parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    pub room: RoomId,
    pub value: String,
}

/// Counters describing one labeling pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSummary {
    /// Number of `(level, block)` partitions visited.
    pub partitions: usize,
    /// Number of apartment groups visited across all partitions.
    pub apartments: usize,
    /// Number of matched (predecessor, neighbor) pairs.
    pub pairs: usize,
    /// Number of rooms receiving the tint label.
    pub rooms_marked: usize,
}

/// Result of planning: the writes to perform and what they amount to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelPlan {
    pub mutations: Vec<Mutation>,
    /// First room of every apartment group, whose sub-zone served as the comparison key.
    pub key_rooms: Vec<RoomId>,
    pub summary: LabelSummary,
}

impl LabelPlan {
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}
