use serde::{Deserialize, Serialize};

/// Recognized knobs of the allocation engine.
///
/// These mirror the event's business rules and are passed in rather than
/// hard-coded so that tests and smaller events can tighten them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Largest team the seating quota schema supports. Pinned at 5 by the
    /// `size1`..`size5` shape of `packer::SeatingConfig`; the packer sends
    /// any larger team to `unplaced` regardless of this value, so the knob
    /// is surfaced for roster validation at the boundary, not to widen the
    /// schema.
    pub max_team_size: usize,
    /// An assignment always carries at least this many offered problems.
    /// Enforced when bulk seeding; the allocator's unfiltered-pool fallback
    /// guarantees it whenever the catalog is non-empty.
    pub min_offered_problems: usize,
    /// An assignment never carries more than this many offered problems.
    /// Enforced by the refresh guard on every flow.
    pub max_offered_problems: usize,
    /// Refresh budget granted to a fresh assignment.
    pub default_max_refreshes: u32,
    /// Minimum length of a custom problem submission, after trimming.
    pub min_custom_text_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_team_size: 5,
            min_offered_problems: 1,
            max_offered_problems: 3,
            default_max_refreshes: 2,
            min_custom_text_len: 10,
        }
    }
}
