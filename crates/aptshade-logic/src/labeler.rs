//! Neighboring-apartment labeling.
//!
//! Rooms are partitioned by level, then block. Inside a partition the
//! apartment groups are visited in ascending zone order and compared with
//! their predecessor by sub-zone label. When two consecutive groups share a
//! non-blank label, every room of the second one is marked with the
//! alternate tint and the comparison restarts, so a run of `k` equal groups
//! yields `k / 2` marked groups: the 2nd, 4th, 6th...
//!
//! The sub-zone label is a lexical proxy for "same apartment type next to
//! each other". No geometry is involved.

use std::collections::{BTreeMap, HashMap};

use log::debug;

use crate::constants::TINT_SEPARATOR;
use crate::room::{LabelPlan, LabelSummary, Mutation, Room};

/// All rooms of one apartment: same level, block and zone.
#[derive(Debug, Clone)]
pub struct ApartmentGroup<'a> {
    pub zone: Option<&'a str>,
    pub rooms: Vec<&'a Room>,
}

impl<'a> ApartmentGroup<'a> {
    /// The group's comparison key, read from its first room only.
    pub fn comparison_key(&self) -> Option<&'a str> {
        self.rooms.first().copied().and_then(|room| room.sub_zone.as_deref())
    }
}

/// One `(level, block)` partition with its apartments in ascending zone order.
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    pub level: Option<&'a str>,
    pub block: Option<&'a str>,
    pub apartments: Vec<ApartmentGroup<'a>>,
}

/// `true` for an absent, empty or whitespace-only key.
pub fn is_blank(key: Option<&str>) -> bool {
    key.map_or(true, |k| k.trim().is_empty())
}

/// Label written to a tinted room: `<sub_zone_id>.<suffix>`.
///
/// An absent id contributes nothing, leaving `.<suffix>`.
pub fn tint_label(sub_zone_id: Option<&str>, suffix: &str) -> String {
    let id = sub_zone_id.unwrap_or_default();
    let mut label = String::with_capacity(id.len() + 1 + suffix.len());
    label.push_str(id);
    label.push(TINT_SEPARATOR);
    label.push_str(suffix);
    label
}

/// Group rooms by level, then block, then zone.
///
/// Levels keep the order in which they first appear in `rooms`, and so do
/// blocks within a level. Apartments are sorted by zone (absent first,
/// then ordinal string order). Rooms keep their input order.
pub fn partition_rooms(rooms: &[Room]) -> Vec<Partition<'_>> {
    type Apartments<'a> = BTreeMap<Option<&'a str>, Vec<&'a Room>>;

    let mut levels: Vec<(Option<&str>, Vec<(Option<&str>, Apartments<'_>)>)> = Vec::new();
    let mut level_index: HashMap<Option<&str>, usize> = HashMap::new();
    let mut block_index: HashMap<(Option<&str>, Option<&str>), usize> = HashMap::new();

    for room in rooms {
        let level = room.level.as_deref();
        let block = room.block.as_deref();

        let li = *level_index.entry(level).or_insert_with(|| {
            levels.push((level, Vec::new()));
            levels.len() - 1
        });
        let blocks = &mut levels[li].1;
        let bi = *block_index.entry((level, block)).or_insert_with(|| {
            blocks.push((block, BTreeMap::new()));
            blocks.len() - 1
        });

        blocks[bi]
            .1
            .entry(room.zone.as_deref())
            .or_default()
            .push(room);
    }

    levels
        .into_iter()
        .flat_map(|(level, blocks)| {
            blocks.into_iter().map(move |(block, apartments)| Partition {
                level,
                block,
                apartments: apartments
                    .into_iter()
                    .map(|(zone, rooms)| ApartmentGroup { zone, rooms })
                    .collect(),
            })
        })
        .collect()
}

/// Run the alternate-tint fold over one partition.
///
/// Returns the mutations and the number of matched pairs. The first group
/// of a pair is only an anchor and is never written.
pub fn label_partition(partition: &Partition<'_>, suffix: &str) -> (Vec<Mutation>, usize) {
    let (_, mutations, pairs) = partition.apartments.iter().fold(
        (None::<&str>, Vec::<Mutation>::new(), 0usize),
        |(previous, mut mutations, pairs), apartment| {
            let current = apartment.comparison_key();
            match previous {
                Some(prev) if !is_blank(previous) && current == Some(prev) => {
                    debug!(
                        "level {:?} block {:?}: zone {:?} neighbors its predecessor (key {:?})",
                        partition.level, partition.block, apartment.zone, prev
                    );
                    mutations.extend(apartment.rooms.iter().map(|room| Mutation {
                        room: room.id,
                        value: tint_label(room.sub_zone_id.as_deref(), suffix),
                    }));
                    // Restart: a third equal group is a fresh candidate, not a neighbor.
                    (None, mutations, pairs + 1)
                }
                _ => (current, mutations, pairs),
            }
        },
    );
    (mutations, pairs)
}

/// Plan the alternate tint for every partition of `rooms`.
///
/// `rooms` must already be restricted to apartment rooms.
pub fn plan_labels(rooms: &[Room], suffix: &str) -> LabelPlan {
    let partitions = partition_rooms(rooms);
    let mut plan = LabelPlan {
        mutations: Vec::new(),
        key_rooms: Vec::new(),
        summary: LabelSummary {
            partitions: partitions.len(),
            ..LabelSummary::default()
        },
    };

    for partition in &partitions {
        let (mutations, pairs) = label_partition(partition, suffix);
        plan.summary.apartments += partition.apartments.len();
        plan.key_rooms.extend(
            partition
                .apartments
                .iter()
                .filter_map(|apartment| apartment.rooms.first().map(|room| room.id)),
        );
        plan.summary.pairs += pairs;
        plan.summary.rooms_marked += mutations.len();
        plan.mutations.extend(mutations);
    }

    plan
}
