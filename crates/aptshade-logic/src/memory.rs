//! In-memory host document.
//!
//! A JSON-serializable stand-in for a building model: a list of room
//! elements, each with a level name and a bag of named string parameters.
//! Implements both host capabilities; writes are staged and flushed at
//! commit, so a rolled-back or failed unit of work leaves the rooms as
//! they were.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::room::RoomId;
use crate::source::RoomRecordSource;
use crate::unit_of_work::UnitOfWork;

/// One element of the room category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomElement {
    pub id: RoomId,
    #[serde(default)]
    pub level: Option<String>,
    /// Parameter name → value. A key with `null` is defined but empty.
    #[serde(default)]
    pub parameters: BTreeMap<String, Option<String>>,
}

impl RoomElement {
    pub fn new(id: u64, level: &str) -> Self {
        Self {
            id: RoomId(id),
            level: Some(level.to_string()),
            parameters: BTreeMap::new(),
        }
    }

    /// Builder-style parameter definition.
    pub fn with(mut self, name: &str, value: Option<&str>) -> Self {
        self.parameters
            .insert(name.to_string(), value.map(str::to_string));
        self
    }
}

#[derive(Debug, Clone)]
struct StagedWrite {
    index: usize,
    name: String,
    value: String,
}

#[derive(Debug, Clone)]
struct OpenTransaction {
    name: String,
    staged: Vec<StagedWrite>,
}

/// Room document with staged-write transactions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryDocument {
    pub rooms: Vec<RoomElement>,
    #[serde(skip)]
    transaction: Option<OpenTransaction>,
    /// Make the next `begin` fail.
    #[serde(skip)]
    pub fail_begin: bool,
    /// Make the next `commit` fail.
    #[serde(skip)]
    pub fail_commit: bool,
}

impl InMemoryDocument {
    pub fn new(rooms: Vec<RoomElement>) -> Self {
        Self {
            rooms,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn room(&self, id: RoomId) -> Option<&RoomElement> {
        self.rooms.iter().find(|r| r.id == id)
    }

    fn index_of(&self, id: RoomId) -> Option<usize> {
        self.rooms.iter().position(|r| r.id == id)
    }

    /// Committed value of a parameter, ignoring anything staged.
    pub fn value(&self, id: RoomId, name: &str) -> Option<&str> {
        self.room(id)?.parameters.get(name)?.as_deref()
    }

    /// Name of the open unit of work, if any.
    pub fn open_transaction(&self) -> Option<&str> {
        self.transaction.as_ref().map(|t| t.name.as_str())
    }
}

impl RoomRecordSource for InMemoryDocument {
    fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.iter().map(|r| r.id).collect()
    }

    fn has_parameter(&self, room: RoomId, name: &str) -> bool {
        self.room(room)
            .is_some_and(|r| r.parameters.contains_key(name))
    }

    fn parameter(&self, room: RoomId, name: &str) -> Option<String> {
        // An empty string holds no value, same as null.
        self.value(room, name)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    fn level_name(&self, room: RoomId) -> Option<String> {
        self.room(room)?.level.clone()
    }
}

impl UnitOfWork for InMemoryDocument {
    fn begin(&mut self, name: &str) -> Result<(), HostError> {
        if let Some(open) = &self.transaction {
            return Err(HostError::new(format!(
                "unit of work {:?} is already open",
                open.name
            )));
        }
        if std::mem::take(&mut self.fail_begin) {
            return Err(HostError::new("document refused to start a unit of work"));
        }
        self.transaction = Some(OpenTransaction {
            name: name.to_string(),
            staged: Vec::new(),
        });
        Ok(())
    }

    fn set_parameter(&mut self, room: RoomId, name: &str, value: &str) -> Result<(), HostError> {
        let index = self
            .index_of(room)
            .ok_or_else(|| HostError::new(format!("no room {}", room)))?;
        if !self.rooms[index].parameters.contains_key(name) {
            return Err(HostError::new(format!(
                "parameter {:?} is not defined on room {}",
                name, room
            )));
        }
        let transaction = self
            .transaction
            .as_mut()
            .ok_or_else(|| HostError::new("no unit of work is open"))?;
        transaction.staged.push(StagedWrite {
            index,
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn commit(&mut self) -> Result<(), HostError> {
        if self.transaction.is_none() {
            return Err(HostError::new("no unit of work is open"));
        }
        if std::mem::take(&mut self.fail_commit) {
            return Err(HostError::new("document refused to commit"));
        }
        if let Some(transaction) = self.transaction.take() {
            for write in transaction.staged {
                self.rooms[write.index]
                    .parameters
                    .insert(write.name, Some(write.value));
            }
        }
        Ok(())
    }

    fn rollback(&mut self) {
        self.transaction = None;
    }
}
