use crate::data::{CapabilityId, RoomId, SlotId};
use thiserror::Error;

/// Errors raised inside one scheduling run.
///
/// Row-level and per-class errors are rendered into the result's
/// `warnings`/`errors` lists; nothing here crosses the run boundary as a
/// panic or a bare `Err`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A supplied record is unusable (duplicate id or dangling foreign id).
    /// The record is dropped and the run continues.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The cross product of slots, rooms and capabilities is empty, so there
    /// is nothing to solve over.
    #[error("variable space is empty: {0}")]
    EmptyVariableSpace(String),

    /// The solver proved that no assignment satisfies all hard constraints.
    #[error("no assignment satisfies every hard constraint")]
    InfeasibleModel,

    /// The solver stopped without finding any feasible assignment. Unlike
    /// infeasibility, the problem might still be solvable with more budget.
    #[error("solver stopped without a feasible assignment: {0}")]
    SolverBudgetExhausted(String),

    /// A chosen variable's backing entities could not be resolved at
    /// extraction time. Indicates an internal inconsistency, not bad input.
    #[error(
        "cannot resolve class for variable (slot {slot_id}, room {room_id}, capability {capability_id}): {detail}"
    )]
    Resolution {
        slot_id: SlotId,
        room_id: RoomId,
        capability_id: CapabilityId,
        detail: String,
    },

    /// The run produced more classes than distinct group labels exist.
    #[error("group label pool exhausted after {0} classes")]
    LabelPoolExhausted(usize),
}

/// The external sink rejected one generated class. Recorded per class;
/// remaining classes are still persisted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to persist class {group}: {reason}")]
pub struct PersistenceError {
    pub group: String,
    pub reason: String,
}
