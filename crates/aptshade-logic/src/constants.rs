//! Host conventions: parameter names, apartment marker and tint suffix.
//!
//! These match the shared-parameter names used by the building model
//! templates the command runs against. [`crate::config::LabelerConfig`]
//! defaults to them and lets a caller override any of them.

pub mod parameters {
    /// Zone classification; also the apartment key.
    pub const ZONE: &str = "ROM_Зона";
    /// Structural block / section within a level.
    pub const BLOCK: &str = "BS_Блок";
    /// Sub-zone label, shared by every room of one apartment. Comparison key.
    pub const SUB_ZONE: &str = "ROM_Подзона";
    /// Calculated sub-zone identifier; prefix of the written label.
    pub const SUB_ZONE_ID: &str = "ROM_Расчетная_подзона_ID";
    /// Output parameter receiving the alternate-tint label.
    pub const SUB_ZONE_INDEX: &str = "ROM_Подзона_Index";
}

/// Substring a zone value must contain for the room to count as an apartment room.
pub const APARTMENT_MARKER: &str = "Квартира";

/// Suffix appended (after a dot) to the sub-zone id of every tinted room.
pub const TINT_SUFFIX: &str = "Полутон";

/// Separator between the sub-zone id and the tint suffix.
pub const TINT_SEPARATOR: char = '.';

/// Name of the host unit of work wrapping the writes.
pub const TRANSACTION_NAME: &str = "Color neighboring apartments";
