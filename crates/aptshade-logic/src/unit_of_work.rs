//! All-or-nothing write-back to the host document.

use log::warn;

use crate::error::{HostError, LabelError, Result};
use crate::room::{Mutation, RoomId};

/// Transactional write access to the host document.
///
/// Writes made between [`begin`](UnitOfWork::begin) and
/// [`commit`](UnitOfWork::commit) become visible together or not at all.
pub trait UnitOfWork {
    fn begin(&mut self, name: &str) -> std::result::Result<(), HostError>;

    fn set_parameter(
        &mut self,
        room: RoomId,
        name: &str,
        value: &str,
    ) -> std::result::Result<(), HostError>;

    fn commit(&mut self) -> std::result::Result<(), HostError>;

    /// Discard everything written since `begin`. Must be safe to call after
    /// a failed commit.
    fn rollback(&mut self);
}

/// Write `mutations` into `parameter` inside one unit of work named `name`.
///
/// Any failed write rolls back and reports [`LabelError::WriteFailed`]; a
/// failed commit rolls back and reports [`LabelError::TransactionCommitFailed`].
/// Returns the number of writes committed.
pub fn apply_atomically<W: UnitOfWork + ?Sized>(
    work: &mut W,
    name: &str,
    parameter: &str,
    mutations: &[Mutation],
) -> Result<usize> {
    work.begin(name).map_err(LabelError::TransactionStartFailed)?;

    for mutation in mutations {
        if let Err(source) = work.set_parameter(mutation.room, parameter, &mutation.value) {
            warn!(
                "{:?}: write to room {} failed ({}), rolling back",
                name, mutation.room, source
            );
            work.rollback();
            return Err(LabelError::WriteFailed {
                room: mutation.room,
                parameter: parameter.to_string(),
                source,
            });
        }
    }

    if let Err(e) = work.commit() {
        warn!("{:?}: commit failed ({}), rolling back", name, e);
        work.rollback();
        return Err(LabelError::TransactionCommitFailed(e));
    }

    Ok(mutations.len())
}
