//! End-to-end tests for the color-neighboring-apartments command.
//!
//! Exercises: InMemoryDocument → schema probe → apartment filter
//! → partition/fold → parameter check → atomic write-back
//!
//! All tests run against the in-memory host, no CAD application.

use aptshade_logic::command::{ColorNeighboringApartments, CommandResult};
use aptshade_logic::config::LabelerConfig;
use aptshade_logic::constants::parameters;
use aptshade_logic::error::LabelError;
use aptshade_logic::memory::{InMemoryDocument, RoomElement};
use aptshade_logic::room::RoomId;

// ── Helpers ────────────────────────────────────────────────────────────

/// A room with every parameter the command needs.
fn room(id: u64, level: &str, block: &str, zone: &str, sub_zone: &str) -> RoomElement {
    RoomElement::new(id, level)
        .with(parameters::ZONE, Some(zone))
        .with(parameters::BLOCK, Some(block))
        .with(parameters::SUB_ZONE, Some(sub_zone))
        .with(parameters::SUB_ZONE_ID, Some(format!("ID{}", id).as_str()))
        .with(parameters::SUB_ZONE_INDEX, None)
}

fn index(doc: &InMemoryDocument, id: u64) -> Option<&str> {
    doc.value(RoomId(id), parameters::SUB_ZONE_INDEX)
}

fn tinted(doc: &InMemoryDocument) -> Vec<u64> {
    doc.rooms
        .iter()
        .filter(|r| {
            r.parameters
                .get(parameters::SUB_ZONE_INDEX)
                .is_some_and(|v| v.is_some())
        })
        .map(|r| r.id.0)
        .collect()
}

/// Two levels, two blocks on the first level, a corridor, and a three-room apartment.
fn building() -> InMemoryDocument {
    InMemoryDocument::new(vec![
        // Level 1, block 1: apartments 1..4 keyed 2K, 2K, 2K, 1K
        room(11, "Этаж 1", "1", "Квартира 1", "2K"),
        room(12, "Этаж 1", "1", "Квартира 2", "2K"),
        room(13, "Этаж 1", "1", "Квартира 2", "2K"),
        room(14, "Этаж 1", "1", "Квартира 3", "2K"),
        room(15, "Этаж 1", "1", "Квартира 4", "1K"),
        room(16, "Этаж 1", "1", "МОП коридор", "2K"),
        // Level 1, block 2: continues with 1K and must not pair with block 1's last apartment
        room(21, "Этаж 1", "2", "Квартира 5", "1K"),
        room(22, "Этаж 1", "2", "Квартира 6", "3K"),
        room(23, "Этаж 1", "2", "Квартира 7", "3K"),
        room(24, "Этаж 1", "2", "Квартира 7", "3K"),
        room(25, "Этаж 1", "2", "Квартира 7", "3K"),
        // Level 2, block 1: a lone apartment
        room(31, "Этаж 2", "1", "Квартира 8", "2K"),
    ])
}

// ── Command flow ───────────────────────────────────────────────────────

#[test]
fn marks_second_of_each_pair() {
    let mut doc = building();
    let summary = ColorNeighboringApartments::default()
        .run(&mut doc)
        .unwrap();

    assert_eq!(tinted(&doc), vec![12, 13, 23, 24, 25]);
    assert_eq!(index(&doc, 12), Some("ID12.Полутон"));
    assert_eq!(index(&doc, 25), Some("ID25.Полутон"));
    assert_eq!(summary.partitions, 3);
    assert_eq!(summary.apartments, 8);
    assert_eq!(summary.pairs, 2);
    assert_eq!(summary.rooms_marked, 5);
}

#[test]
fn non_apartment_rooms_untouched() {
    let mut doc = building();
    ColorNeighboringApartments::default().execute(&mut doc);
    assert_eq!(index(&doc, 16), None);
}

#[test]
fn execute_reports_success() {
    let mut doc = building();
    assert_eq!(
        ColorNeighboringApartments::default().execute(&mut doc),
        CommandResult::Succeeded
    );
    assert_eq!(doc.open_transaction(), None);
}

#[test]
fn no_apartments_still_succeeds() {
    let mut doc = InMemoryDocument::new(vec![
        room(1, "Этаж 1", "1", "Лестница", "A"),
        room(2, "Этаж 1", "1", "Лестница", "A"),
    ]);
    let summary = ColorNeighboringApartments::default().run(&mut doc).unwrap();
    assert_eq!(summary.rooms_marked, 0);
    assert!(tinted(&doc).is_empty());
}

#[test]
fn empty_document_succeeds() {
    let mut doc = InMemoryDocument::default();
    assert_eq!(
        ColorNeighboringApartments::default().execute(&mut doc),
        CommandResult::Succeeded
    );
}

// ── Failure semantics ──────────────────────────────────────────────────

#[test]
fn missing_schema_aborts_before_any_write() {
    let mut doc = building();
    doc.rooms[0].parameters.remove(parameters::SUB_ZONE_ID);
    doc.fail_begin = true;

    let err = ColorNeighboringApartments::default().run(&mut doc).unwrap_err();
    assert_eq!(
        err,
        LabelError::SchemaMissing {
            parameter: parameters::SUB_ZONE_ID.into(),
            room: RoomId(11),
        }
    );
    assert!(tinted(&doc).is_empty());
    // Never reached the unit of work.
    assert!(doc.fail_begin);
}

#[test]
fn start_failure_writes_nothing() {
    let mut doc = building();
    doc.fail_begin = true;
    let result = ColorNeighboringApartments::default().run(&mut doc);
    assert!(matches!(result, Err(LabelError::TransactionStartFailed(_))));
    assert!(tinted(&doc).is_empty());
}

#[test]
fn commit_failure_rolls_back_everything() {
    let mut doc = building();
    doc.fail_commit = true;
    let cmd = ColorNeighboringApartments::default();
    assert!(matches!(
        cmd.run(&mut doc),
        Err(LabelError::TransactionCommitFailed(_))
    ));
    assert!(tinted(&doc).is_empty());
    assert_eq!(doc.open_transaction(), None);

    // Fault was one-shot; a retry by the caller goes through.
    assert_eq!(cmd.execute(&mut doc), CommandResult::Succeeded);
    assert_eq!(tinted(&doc), vec![12, 13, 23, 24, 25]);
}

#[test]
fn write_failure_rolls_back_everything() {
    let mut doc = building();
    // Room 24 lost its output parameter after the schema probe on room 11.
    doc.rooms[9].parameters.remove(parameters::SUB_ZONE_INDEX);
    let result = ColorNeighboringApartments::default().run(&mut doc);
    assert!(matches!(
        result,
        Err(LabelError::WriteFailed { room: RoomId(24), .. })
    ));
    assert!(tinted(&doc).is_empty());
}

#[test]
fn later_rooms_missing_block_or_id_fail_without_writes() {
    let mut doc = InMemoryDocument::new(vec![
        room(1, "Этаж 1", "1", "Квартира 1", "2K"),
        room(2, "Этаж 1", "1", "Квартира 2", "2K"),
        room(3, "Этаж 1", "1", "Квартира 3", "2K"),
    ]);
    doc.rooms[1].parameters.remove(parameters::BLOCK);
    doc.rooms[2].parameters.remove(parameters::BLOCK);
    doc.rooms[2].parameters.remove(parameters::SUB_ZONE_ID);

    let cmd = ColorNeighboringApartments::default();
    assert_eq!(
        cmd.run(&mut doc).unwrap_err(),
        LabelError::ParameterMissing {
            parameter: parameters::BLOCK.into(),
            room: RoomId(2),
        }
    );
    assert_eq!(cmd.execute(&mut doc), CommandResult::Failed);
    assert!(tinted(&doc).is_empty());
    assert_eq!(doc.open_transaction(), None);
}

#[test]
fn marked_room_missing_id_fails_without_writes() {
    let mut doc = building();
    // Room 13 belongs to the tinted second apartment.
    doc.rooms[2].parameters.remove(parameters::SUB_ZONE_ID);
    assert_eq!(
        ColorNeighboringApartments::default().run(&mut doc).unwrap_err(),
        LabelError::ParameterMissing {
            parameter: parameters::SUB_ZONE_ID.into(),
            room: RoomId(13),
        }
    );
    assert!(tinted(&doc).is_empty());
}

#[test]
fn empty_values_are_not_missing() {
    let mut doc = building();
    // Room 25 keeps its id parameter, just without a value.
    doc.rooms[10]
        .parameters
        .insert(parameters::SUB_ZONE_ID.into(), Some(String::new()));
    ColorNeighboringApartments::default().run(&mut doc).unwrap();
    assert_eq!(index(&doc, 25), Some(".Полутон"));
}

// ── Configuration ──────────────────────────────────────────────────────

#[test]
fn custom_parameter_names_and_suffix() {
    let config = LabelerConfig::from_json(
        r#"{
            "parameters": {
                "zone": "Zone",
                "block": "Block",
                "sub_zone": "Type",
                "sub_zone_id": "TypeId",
                "sub_zone_index": "Shade"
            },
            "apartment_marker": "Apt",
            "tint_suffix": "Alt"
        }"#,
    )
    .unwrap();

    let element = |id: u64, zone: &str, key: &str| {
        RoomElement::new(id, "L1")
            .with("Zone", Some(zone))
            .with("Block", Some("A"))
            .with("Type", Some(key))
            .with("TypeId", Some("T"))
            .with("Shade", None)
    };
    let mut doc = InMemoryDocument::new(vec![
        element(1, "Apt 1", "x"),
        element(2, "Apt 2", "x"),
        element(3, "Квартира 3", "x"),
    ]);

    ColorNeighboringApartments::new(config).run(&mut doc).unwrap();
    assert_eq!(doc.value(RoomId(2), "Shade"), Some("T.Alt"));
    assert_eq!(doc.value(RoomId(1), "Shade"), None);
    assert_eq!(doc.value(RoomId(3), "Shade"), None);
}

#[test]
fn config_writing_into_comparison_key_is_refused() {
    let mut config = LabelerConfig::default();
    config.parameters.sub_zone_index = parameters::SUB_ZONE.into();
    let mut doc = building();
    assert_eq!(
        ColorNeighboringApartments::new(config).execute(&mut doc),
        CommandResult::Failed
    );
    assert!(tinted(&doc).is_empty());
}

// ── Re-application ─────────────────────────────────────────────────────

#[test]
fn second_run_writes_same_values() {
    let mut doc = building();
    let cmd = ColorNeighboringApartments::default();
    cmd.run(&mut doc).unwrap();
    let first = doc.rooms.clone();
    cmd.run(&mut doc).unwrap();
    assert_eq!(doc.rooms, first);
}
