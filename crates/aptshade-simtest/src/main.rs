//! aptshade Headless Harness
//!
//! Applies the color-neighboring-apartments command to a JSON document
//! export, or, with no document, sweeps the labeler's properties over
//! seeded random buildings. Runs entirely in-process with no CAD host.
//!
//! Usage:
//!   cargo run -p aptshade-simtest
//!   cargo run -p aptshade-simtest -- --verbose --seed 7 --rounds 500
//!   cargo run -p aptshade-simtest -- --document rooms.json --output colored.json

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use aptshade_logic::command::{ColorNeighboringApartments, CommandResult};
use aptshade_logic::config::LabelerConfig;
use aptshade_logic::constants::parameters;
use aptshade_logic::labeler::{is_blank, plan_labels};
use aptshade_logic::memory::{InMemoryDocument, RoomElement};
use aptshade_logic::room::{ApartmentKey, Room, RoomId};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{error, info};

// ── Sample building (same shape a host export produces) ─────────────────
const SAMPLE_DOCUMENT_JSON: &str = include_str!("../../../data/sample_document.json");

/// Headless harness for the neighboring-apartment labeler
#[derive(Parser, Debug)]
#[clap(name = "aptshade-simtest")]
#[clap(about = "Color neighboring apartments in a JSON room export, or sweep the labeler")]
struct Args {
    /// Room document to color (JSON). Without it the validation sweep runs.
    #[clap(long, value_name = "FILE")]
    document: Option<PathBuf>,

    /// Where to write the colored document (default: stdout)
    #[clap(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Labeler configuration (JSON); missing fields take defaults
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed for the random sweep
    #[clap(long, default_value = "42")]
    seed: u64,

    /// Random buildings generated by the sweep
    #[clap(long, default_value = "200")]
    rounds: u32,

    /// Print passing checks too
    #[clap(long)]
    verbose: bool,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match &args.document {
        Some(path) => color_document(path, args.output.as_deref(), config),
        None => run_sweep(&args, config),
    }
}

fn load_config(path: Option<&Path>) -> Result<LabelerConfig, String> {
    let Some(path) = path else {
        return Ok(LabelerConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read config {}: {}", path.display(), e))?;
    LabelerConfig::from_json(&json)
        .map_err(|e| format!("cannot parse config {}: {}", path.display(), e))
}

// ── Document mode ───────────────────────────────────────────────────────

fn color_document(path: &Path, output: Option<&Path>, config: LabelerConfig) -> ExitCode {
    let json = match std::fs::read_to_string(path) {
        Ok(j) => j,
        Err(e) => {
            error!("cannot read document {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let mut document = match InMemoryDocument::from_json(&json) {
        Ok(d) => d,
        Err(e) => {
            error!("cannot parse document {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    info!("loaded {} rooms from {}", document.rooms.len(), path.display());

    let command = ColorNeighboringApartments::new(config);
    if command.execute(&mut document) == CommandResult::Failed {
        error!("command failed, document left unchanged");
        return ExitCode::FAILURE;
    }

    let colored = match document.to_json_pretty() {
        Ok(j) => j,
        Err(e) => {
            error!("cannot serialize document: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match output {
        Some(out) => {
            if let Err(e) = std::fs::write(out, colored) {
                error!("cannot write {}: {}", out.display(), e);
                return ExitCode::FAILURE;
            }
            info!("wrote {}", out.display());
        }
        None => println!("{}", colored),
    }
    ExitCode::SUCCESS
}

// ── Sweep mode ──────────────────────────────────────────────────────────

fn run_sweep(args: &Args, config: LabelerConfig) -> ExitCode {
    println!("=== aptshade Labeler Harness ===\n");

    let mut results = Vec::new();

    // 1. Sample building end-to-end
    results.extend(validate_sample_document(&config));

    // 2. Random buildings against a run-length reference
    results.extend(validate_random_partitions(args.seed, args.rounds, &config));

    // 3. Atomicity under injected host failures
    results.extend(validate_atomicity(args.seed, args.rounds, &config));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed,
        results.len(),
        failed
    );

    if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

// ── 1. Sample document ──────────────────────────────────────────────────

fn validate_sample_document(config: &LabelerConfig) -> Vec<TestResult> {
    println!("--- Sample Document ---");
    let mut results = Vec::new();

    let mut document = match InMemoryDocument::from_json(SAMPLE_DOCUMENT_JSON) {
        Ok(d) => d,
        Err(e) => {
            results.push(TestResult {
                name: "sample_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    let summary = ColorNeighboringApartments::new(config.clone()).run(&mut document);
    results.push(TestResult {
        name: "sample_command_succeeds".into(),
        passed: summary.is_ok(),
        detail: match &summary {
            Ok(s) => format!(
                "{} rooms tinted in {} pairs across {} partitions",
                s.rooms_marked, s.pairs, s.partitions
            ),
            Err(e) => e.to_string(),
        },
    });

    // Only meaningful with the default names and marker the sample uses.
    let defaults = LabelerConfig::default();
    if config.parameters == defaults.parameters
        && config.apartment_marker == defaults.apartment_marker
    {
        let tinted: Vec<u64> = document
            .rooms
            .iter()
            .filter(|r| {
                r.parameters
                    .get(parameters::SUB_ZONE_INDEX)
                    .is_some_and(|v| v.is_some())
            })
            .map(|r| r.id.0)
            .collect();
        let expected = vec![1003, 1004, 1102];
        results.push(TestResult {
            name: "sample_tinted_rooms".into(),
            passed: tinted == expected,
            detail: format!("tinted {:?}, expected {:?}", tinted, expected),
        });
    }

    results
}

// ── 2. Random partitions ────────────────────────────────────────────────

const KEYS: [Option<&str>; 6] = [Some("1K"), Some("2K"), Some("3K"), Some(""), Some(" "), None];

/// Random apartment rooms: a few levels and blocks, runs of repeated keys.
fn random_rooms(rng: &mut StdRng) -> Vec<Room> {
    let mut rooms = Vec::new();
    let mut next_id = 1u64;
    for level in 0..rng.gen_range(1..=3) {
        for block in 0..rng.gen_range(1..=3) {
            let apartments = rng.gen_range(0..=12);
            let mut key = KEYS[rng.gen_range(0..KEYS.len())];
            for apt in 0..apartments {
                // Favor runs so that long equal-key streaks actually occur.
                if rng.gen_bool(0.4) {
                    key = KEYS[rng.gen_range(0..KEYS.len())];
                }
                for _ in 0..rng.gen_range(1..=3) {
                    rooms.push(Room {
                        id: RoomId(next_id),
                        level: Some(format!("Этаж {}", level + 1)),
                        block: Some(format!("{}", block + 1)),
                        zone: Some(format!("Квартира {:03}", apt + 1)),
                        sub_zone: key.map(str::to_string),
                        sub_zone_id: Some(format!("SZ-{}", next_id)),
                    });
                    next_id += 1;
                }
            }
        }
    }
    rooms.shuffle(rng);
    rooms
}

/// Independent reference: an apartment is tinted when it sits at an even
/// position of a run of equal non-blank keys within its partition.
fn reference_tinted(rooms: &[Room]) -> Vec<RoomId> {
    // Sorted by (level, block, zone): partitions are contiguous, zones ascending.
    let mut apartments: BTreeMap<ApartmentKey, Vec<&Room>> = BTreeMap::new();
    for room in rooms {
        apartments.entry(room.apartment_key()).or_default().push(room);
    }

    let mut tinted = Vec::new();
    let mut run = 0usize;
    let mut last: Option<(&ApartmentKey, Option<&str>)> = None;
    for (apartment, members) in &apartments {
        let key = members[0].sub_zone.as_deref();
        let continues = last.is_some_and(|(prev, prev_key)| {
            prev.level == apartment.level && prev.block == apartment.block && prev_key == key
        });
        run = if continues && !is_blank(key) { run + 1 } else { 1 };
        last = Some((apartment, key));
        if run % 2 == 0 {
            tinted.extend(members.iter().map(|r| r.id));
        }
    }
    tinted.sort();
    tinted
}

fn validate_random_partitions(seed: u64, rounds: u32, config: &LabelerConfig) -> Vec<TestResult> {
    println!("--- Random Partitions ---");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut results = Vec::new();

    let mut mismatches = 0u32;
    let mut blank_marked = 0u32;
    let mut total_marked = 0usize;
    let mut first_mismatch = String::new();

    for round in 0..rounds {
        let rooms = random_rooms(&mut rng);
        let plan = plan_labels(&rooms, &config.tint_suffix);

        let mut got: Vec<RoomId> = plan.mutations.iter().map(|m| m.room).collect();
        got.sort();
        let expected = reference_tinted(&rooms);
        total_marked += got.len();

        if got != expected {
            mismatches += 1;
            if first_mismatch.is_empty() {
                first_mismatch = format!(
                    "round {}: got {} rooms, reference {}",
                    round,
                    got.len(),
                    expected.len()
                );
            }
        }

        blank_marked += rooms
            .iter()
            .filter(|r| is_blank(r.sub_zone.as_deref()) && got.binary_search(&r.id).is_ok())
            .count() as u32;
    }

    results.push(TestResult {
        name: "random_matches_reference".into(),
        passed: mismatches == 0,
        detail: if mismatches == 0 {
            format!("{} buildings, {} rooms tinted", rounds, total_marked)
        } else {
            format!("{} mismatches; first: {}", mismatches, first_mismatch)
        },
    });

    results.push(TestResult {
        name: "random_blank_never_tinted".into(),
        passed: blank_marked == 0,
        detail: format!("{} blank-keyed rooms tinted", blank_marked),
    });

    // A run of k equal keys in one partition tints exactly k / 2 apartments.
    let mut run_ok = true;
    for k in 0..=10usize {
        let rooms: Vec<Room> = (0..k)
            .map(|i| Room {
                id: RoomId(i as u64),
                level: Some("Этаж 1".into()),
                block: Some("1".into()),
                zone: Some(format!("Квартира {:02}", i)),
                sub_zone: Some("2K".into()),
                sub_zone_id: None,
            })
            .collect();
        if plan_labels(&rooms, &config.tint_suffix).summary.pairs != k / 2 {
            run_ok = false;
        }
    }
    results.push(TestResult {
        name: "run_of_k_tints_half".into(),
        passed: run_ok,
        detail: "k = 0..=10".into(),
    });

    results
}

// ── 3. Atomicity ────────────────────────────────────────────────────────

fn to_document(rooms: &[Room]) -> InMemoryDocument {
    InMemoryDocument::new(
        rooms
            .iter()
            .map(|r| RoomElement {
                id: r.id,
                level: r.level.clone(),
                parameters: BTreeMap::new(),
            }
            .with(parameters::ZONE, r.zone.as_deref())
            .with(parameters::BLOCK, r.block.as_deref())
            .with(parameters::SUB_ZONE, r.sub_zone.as_deref())
            .with(parameters::SUB_ZONE_ID, r.sub_zone_id.as_deref())
            .with(parameters::SUB_ZONE_INDEX, None))
            .collect(),
    )
}

fn validate_atomicity(seed: u64, rounds: u32, config: &LabelerConfig) -> Vec<TestResult> {
    println!("--- Atomicity ---");
    let mut results = Vec::new();

    // Fault injection only applies to the default parameter layout.
    if config.parameters != LabelerConfig::default().parameters {
        return results;
    }

    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let command = ColorNeighboringApartments::new(config.clone());
    let mut leaked = 0u32;
    let mut wrong_outcome = 0u32;

    for _ in 0..rounds.min(50) {
        let rooms = random_rooms(&mut rng);
        let mut document = to_document(&rooms);
        let before = document.rooms.clone();
        let fail_begin = rng.gen_bool(0.5);
        document.fail_begin = fail_begin;
        document.fail_commit = !fail_begin;

        let outcome = command.execute(&mut document);
        // An empty building never opens a unit of work, so it cannot fail.
        let expected = if rooms.is_empty() {
            CommandResult::Succeeded
        } else {
            CommandResult::Failed
        };
        if outcome != expected {
            wrong_outcome += 1;
        }
        if document.rooms != before {
            leaked += 1;
        }
    }

    results.push(TestResult {
        name: "failed_unit_of_work_leaves_document".into(),
        passed: leaked == 0,
        detail: format!("{} documents changed despite failure", leaked),
    });
    results.push(TestResult {
        name: "failed_unit_of_work_reports_failure".into(),
        passed: wrong_outcome == 0,
        detail: format!("{} unexpected outcomes", wrong_outcome),
    });

    results
}
