//! Labeler configuration and validation.
//!
//! Every field has a default matching [`crate::constants`], so an empty JSON
//! object is a complete configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{self, parameters};
use crate::error::ConfigError;

/// Names of the host parameters the command reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterNames {
    pub zone: String,
    pub block: String,
    pub sub_zone: String,
    pub sub_zone_id: String,
    pub sub_zone_index: String,
}

impl Default for ParameterNames {
    fn default() -> Self {
        Self {
            zone: parameters::ZONE.to_string(),
            block: parameters::BLOCK.to_string(),
            sub_zone: parameters::SUB_ZONE.to_string(),
            sub_zone_id: parameters::SUB_ZONE_ID.to_string(),
            sub_zone_index: parameters::SUB_ZONE_INDEX.to_string(),
        }
    }
}

impl ParameterNames {
    /// All parameters that must exist on the first room, in probe order.
    pub fn required(&self) -> [&str; 5] {
        [
            self.zone.as_str(),
            self.block.as_str(),
            self.sub_zone.as_str(),
            self.sub_zone_id.as_str(),
            self.sub_zone_index.as_str(),
        ]
    }
}

/// Full configuration of one labeling command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelerConfig {
    pub parameters: ParameterNames,
    /// Zone values containing this substring (case-sensitive) are apartments.
    pub apartment_marker: String,
    /// Appended as `<sub_zone_id>.<suffix>` to tinted rooms.
    pub tint_suffix: String,
    /// Name given to the host unit of work.
    pub transaction_name: String,
}

impl Default for LabelerConfig {
    fn default() -> Self {
        Self {
            parameters: ParameterNames::default(),
            apartment_marker: constants::APARTMENT_MARKER.to_string(),
            tint_suffix: constants::TINT_SUFFIX.to_string(),
            transaction_name: constants::TRANSACTION_NAME.to_string(),
        }
    }
}

impl LabelerConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Validate a configuration, returning all errors found.
pub fn validate_config(config: &LabelerConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    let p = &config.parameters;

    let named = [
        ("zone", &p.zone),
        ("block", &p.block),
        ("sub-zone", &p.sub_zone),
        ("sub-zone id", &p.sub_zone_id),
        ("sub-zone index", &p.sub_zone_index),
    ];
    for (role, name) in named {
        if name.trim().is_empty() {
            errors.push(ConfigError::EmptyParameterName(role));
        }
    }

    if !p.sub_zone_index.trim().is_empty() {
        // Writing into the comparison key would make a second run see its own output.
        if p.sub_zone_index == p.sub_zone {
            errors.push(ConfigError::OutputIsComparisonKey(p.sub_zone_index.clone()));
        }
        if p.sub_zone_index == p.zone || p.sub_zone_index == p.block {
            errors.push(ConfigError::OutputIsZoneOrBlock(p.sub_zone_index.clone()));
        }
    }

    if config.apartment_marker.is_empty() {
        errors.push(ConfigError::EmptyMarker);
    }
    if config.tint_suffix.trim().is_empty() {
        errors.push(ConfigError::EmptySuffix);
    }

    errors
}
