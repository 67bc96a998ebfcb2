//! Neighboring-apartment tint labeling.
//!
//! This crate contains the labeling logic independent of any CAD host.
//! The host hands over room records through [`source::RoomRecordSource`],
//! the labeler plans which rooms get the alternate tint, and the plan is
//! written back through [`unit_of_work::UnitOfWork`] as one all-or-nothing
//! batch. Functions take plain data and return results, making them
//! unit-testable without a live building model.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`command`] | The color-neighboring-apartments command (collect → plan → commit) |
//! | [`config`] | Parameter names, marker, suffix and their validation |
//! | [`constants`] | Default host parameter names and marker strings |
//! | [`error`] | Labeling, host and configuration error types |
//! | [`labeler`] | Partitioning and the alternate-tint fold |
//! | [`memory`] | In-memory reference host document (JSON, staged writes) |
//! | [`room`] | Room records, apartment keys, mutations, plan summary |
//! | [`source`] | Room enumeration capability and schema probing |
//! | [`unit_of_work`] | Transactional write capability and atomic apply |

pub mod command;
pub mod config;
pub mod constants;
pub mod error;
pub mod labeler;
pub mod memory;
pub mod room;
pub mod source;
pub mod unit_of_work;
