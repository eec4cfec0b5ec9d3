use thiserror::Error;

use crate::catalog::Problem;
use crate::packer::UnplacedTeam;

/// Error taxonomy for the allocation engine.
///
/// Every variant is surfaced to the caller exactly once, synchronously; the
/// engine never retries or logs internally. "No conflict-free problem exists"
/// is deliberately absent: the allocator absorbs that case by falling back
/// to the unfiltered pool.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A referenced participant, team, or assignment does not exist in the
    /// snapshot passed in.
    #[error("not found: {0}")]
    NotFound(String),

    /// Refresh attempted after confirmation or after exhausting the budget.
    /// Carries the current counters so callers can render an informative
    /// message.
    #[error("refresh denied: {refresh_count} of {max_refreshes} refreshes used, confirmed={confirmed}")]
    RefreshDenied {
        refresh_count: u32,
        max_refreshes: u32,
        confirmed: bool,
    },

    /// Confirmation index outside the current offered list.
    #[error("invalid selection: index {index} out of {offered} offered problems")]
    InvalidSelection { index: usize, offered: usize },

    /// Custom problem text shorter than the minimum after trimming.
    #[error("custom problem text too short: {len} chars (minimum {min})")]
    InvalidCustomText { len: usize, min: usize },

    /// Re-confirmation of an already-confirmed assignment. Carries the
    /// existing selection so callers can treat this as a no-op success.
    #[error("already confirmed: {}", .selected.problem)]
    AlreadyConfirmed { selected: Problem },

    /// The packer could not place one or more teams under the current room
    /// quotas. No allocation from the run may be committed.
    #[error("packing infeasible: {} team(s) unplaced", .unplaced.len())]
    PackingInfeasible { unplaced: Vec<UnplacedTeam> },

    /// Bulk allocation attempted while assignments already exist. The bulk
    /// sweep must run exactly once against an empty store.
    #[error("allocation already ran: {existing} assignment(s) present")]
    AllocationExists { existing: usize },
}
