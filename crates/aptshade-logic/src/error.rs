//! Error types for labeling runs.

use thiserror::Error;

use crate::room::RoomId;

/// Result alias for labeling operations.
pub type Result<T> = std::result::Result<T, LabelError>;

/// Failure reported by a host capability (document read/write, transaction).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Configuration validation error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A parameter name is empty or whitespace.
    #[error("parameter name for {0} is empty")]
    EmptyParameterName(&'static str),
    /// The output parameter would overwrite the comparison key.
    #[error("output parameter {0:?} is also the sub-zone comparison key")]
    OutputIsComparisonKey(String),
    /// The output parameter would overwrite a partitioning parameter.
    #[error("output parameter {0:?} is also the zone or block parameter")]
    OutputIsZoneOrBlock(String),
    /// Apartment marker is empty; every zone would match.
    #[error("apartment marker is empty")]
    EmptyMarker,
    /// Tint suffix is empty.
    #[error("tint suffix is empty")]
    EmptySuffix,
}

/// Everything that can make a labeling run fail.
///
/// An empty document is not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error("invalid configuration: {}", join_config_errors(.0))]
    InvalidConfig(Vec<ConfigError>),

    /// A required parameter is not defined on the first probed room.
    #[error("parameter {parameter:?} is missing on room {room}")]
    SchemaMissing { parameter: String, room: RoomId },

    /// A parameter the run reads is not defined on a later room.
    #[error("parameter {parameter:?} is not defined on room {room}")]
    ParameterMissing { parameter: String, room: RoomId },

    #[error("unit of work could not start: {0}")]
    TransactionStartFailed(HostError),

    #[error("writing {parameter:?} on room {room} failed: {source}")]
    WriteFailed {
        room: RoomId,
        parameter: String,
        source: HostError,
    },

    #[error("unit of work could not commit: {0}")]
    TransactionCommitFailed(HostError),
}

fn join_config_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
