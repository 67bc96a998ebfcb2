//! Reading room records from the host document.
//!
//! [`RoomRecordSource`] is the read side of a host adapter: it enumerates
//! the room category and exposes named parameters. [`collect_apartment_rooms`]
//! probes the schema on the first room, filters to apartments and builds
//! [`Room`] records for the labeler. [`check_plan_parameters`] confirms the
//! values a plan depends on were really defined, not merely empty.

use log::debug;

use crate::config::LabelerConfig;
use crate::error::{LabelError, Result};
use crate::room::{LabelPlan, Room, RoomId};

/// Read access to the rooms of a building-model document.
pub trait RoomRecordSource {
    /// Every element of the room category, unfiltered, in document order.
    fn room_ids(&self) -> Vec<RoomId>;

    /// Whether the parameter is defined on the room (it may still hold no value).
    fn has_parameter(&self, room: RoomId, name: &str) -> bool;

    /// String value of a named parameter. `None` when undefined or holding no value.
    fn parameter(&self, room: RoomId, name: &str) -> Option<String>;

    /// Display name of the room's level.
    fn level_name(&self, room: RoomId) -> Option<String>;
}

/// Check that the first room of the category defines every required parameter.
///
/// Returns the first missing parameter as [`LabelError::SchemaMissing`].
pub fn probe_schema<S: RoomRecordSource + ?Sized>(
    source: &S,
    first: RoomId,
    config: &LabelerConfig,
) -> Result<()> {
    match config
        .parameters
        .required()
        .into_iter()
        .find(|name| !source.has_parameter(first, name))
    {
        Some(missing) => Err(LabelError::SchemaMissing {
            parameter: missing.to_string(),
            room: first,
        }),
        None => Ok(()),
    }
}

fn require<S: RoomRecordSource + ?Sized>(source: &S, room: RoomId, name: &str) -> Result<()> {
    if source.has_parameter(room, name) {
        Ok(())
    } else {
        Err(LabelError::ParameterMissing {
            parameter: name.to_string(),
            room,
        })
    }
}

/// Collect the apartment rooms among `ids`.
///
/// `ids` is the room category as returned by [`RoomRecordSource::room_ids`].
/// An empty category yields an empty list. Otherwise the schema is probed on
/// the first room before anything else is read, then rooms whose zone
/// contains the apartment marker are turned into [`Room`] records. Every
/// apartment room must define the block parameter, since grouping reads it.
pub fn collect_apartment_rooms<S: RoomRecordSource + ?Sized>(
    source: &S,
    ids: &[RoomId],
    config: &LabelerConfig,
) -> Result<Vec<Room>> {
    let Some(&first) = ids.first() else {
        return Ok(Vec::new());
    };
    probe_schema(source, first, config)?;

    let names = &config.parameters;
    let mut rooms = Vec::new();
    for &id in ids {
        let Some(zone) = source.parameter(id, &names.zone) else {
            continue;
        };
        if !zone.contains(config.apartment_marker.as_str()) {
            continue;
        }
        require(source, id, &names.block)?;
        rooms.push(Room {
            id,
            level: source.level_name(id),
            block: source.parameter(id, &names.block),
            zone: Some(zone),
            sub_zone: source.parameter(id, &names.sub_zone),
            sub_zone_id: source.parameter(id, &names.sub_zone_id),
        });
    }

    debug!("{} apartment rooms matched {:?}", rooms.len(), config.apartment_marker);
    Ok(rooms)
}

/// Check that every value the plan was built from is defined on its room.
///
/// The sub-zone must exist on the first room of each apartment group and
/// the sub-zone id on every room being tinted. A missing one fails with
/// [`LabelError::ParameterMissing`] before anything is written.
pub fn check_plan_parameters<S: RoomRecordSource + ?Sized>(
    source: &S,
    plan: &LabelPlan,
    config: &LabelerConfig,
) -> Result<()> {
    let names = &config.parameters;
    for &room in &plan.key_rooms {
        require(source, room, &names.sub_zone)?;
    }
    for mutation in &plan.mutations {
        require(source, mutation.room, &names.sub_zone_id)?;
    }
    Ok(())
}
