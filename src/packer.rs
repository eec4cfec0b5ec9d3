//! # Room Capacity Packer
//!
//! Packs whole teams into rooms under per-room, per-team-size quotas.
//! Largest teams are placed first (they are the hardest to fit later), and
//! each team goes to the first room with a free slot of its size and enough
//! remaining capacity. First-fit in room enumeration order, so a fixed input
//! order always yields the same packing.
//!
//! Seat labels here are per team slot, not per individual: every member of a
//! team placed in slot 0 of the size-3 quota gets label `3A`. Adjacency
//! downstream therefore operates at team-slot granularity. A run that leaves
//! any team unplaced is infeasible as a whole; none of its allocations may be
//! committed.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::roster::Team;

/// Per-team-size slot quota of a room, for team sizes 1 through 5.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeatingConfig {
    #[serde(default)]
    pub size1: u32,
    #[serde(default)]
    pub size2: u32,
    #[serde(default)]
    pub size3: u32,
    #[serde(default)]
    pub size4: u32,
    #[serde(default)]
    pub size5: u32,
}

impl SeatingConfig {
    /// Quota for teams of `size` members; 0 for sizes outside 1..=5.
    pub fn quota(&self, size: usize) -> u32 {
        match size {
            1 => self.size1,
            2 => self.size2,
            3 => self.size3,
            4 => self.size4,
            5 => self.size5,
            _ => 0,
        }
    }
}

/// A room as configured by the organizers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomConfig {
    pub id: String,
    pub name: String,
    pub capacity: u32,
    pub seating_config: SeatingConfig,
}

/// One participant's placement produced by a packing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatAllocation {
    pub participant_id: String,
    pub room: String,
    pub seat: String,
}

/// A team the packer could not place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnplacedTeam {
    pub team_id: String,
    pub size: usize,
    pub reason: String,
}

/// The result of one packing run. `allocations` is empty whenever `unplaced`
/// is non-empty: a partially packed event is not a valid outcome.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackOutcome {
    pub allocations: Vec<SeatAllocation>,
    pub unplaced: Vec<UnplacedTeam>,
}

impl PackOutcome {
    pub fn is_feasible(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Consumes the outcome, surfacing an infeasible run as
    /// [`EngineError::PackingInfeasible`].
    pub fn into_result(self) -> Result<Vec<SeatAllocation>, EngineError> {
        if self.unplaced.is_empty() {
            Ok(self.allocations)
        } else {
            Err(EngineError::PackingInfeasible {
                unplaced: self.unplaced,
            })
        }
    }
}

const UNPLACED_REASON: &str = "No matching slot available";

// Mutable packing state per room; quotas are reset for every run.
struct RoomState<'a> {
    config: &'a RoomConfig,
    used_slots: [u32; 5],
    current_occupancy: u32,
}

impl<'a> RoomState<'a> {
    fn fresh(config: &'a RoomConfig) -> Self {
        Self {
            config,
            used_slots: [0; 5],
            current_occupancy: 0,
        }
    }

    fn fits(&self, size: usize) -> bool {
        (1..=5).contains(&size)
            && self.used_slots[size - 1] < self.config.seating_config.quota(size)
            && self.current_occupancy + size as u32 <= self.config.capacity
    }

    /// Claims the next slot for a team of `size`, returning its seat label.
    fn claim(&mut self, size: usize) -> String {
        let slot = self.used_slots[size - 1];
        self.used_slots[size - 1] += 1;
        self.current_occupancy += size as u32;
        format!("{}{}", size, alpha_index(slot))
    }
}

/// Converts a zero-based index to Excel-style letters: 0 -> A, 25 -> Z,
/// 26 -> AA, and so on.
pub fn alpha_index(mut index: u32) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        index /= 26;
        if index == 0 {
            break;
        }
        index -= 1;
    }
    letters.reverse();
    String::from_utf8(letters).expect("ASCII letters")
}

/// Packs `teams` into `rooms`, largest teams first, first-fit per room order.
///
/// Every room starts from zeroed slot counters: this is a full re-pack, not
/// an incremental one. Teams of size 0 are skipped; teams larger than the
/// quota schema supports (size > 5) always end up unplaced.
pub fn pack(rooms: &[RoomConfig], teams: &[Team]) -> PackOutcome {
    let mut states: Vec<RoomState> = rooms.iter().map(RoomState::fresh).collect();

    // Stable sort keeps input order among equal sizes, which makes reruns
    // reproduce identical labels.
    let mut ordered: Vec<&Team> = teams.iter().collect();
    ordered.sort_by_key(|t| std::cmp::Reverse(t.size()));

    let mut outcome = PackOutcome::default();
    for team in ordered {
        let size = team.size();
        if size == 0 {
            continue;
        }
        match states.iter_mut().find(|r| r.fits(size)) {
            Some(room) => {
                let seat = room.claim(size);
                for member in &team.members {
                    outcome.allocations.push(SeatAllocation {
                        participant_id: member.clone(),
                        room: room.config.name.clone(),
                        seat: seat.clone(),
                    });
                }
            }
            None => outcome.unplaced.push(UnplacedTeam {
                team_id: team.team_id.clone(),
                size,
                reason: UNPLACED_REASON.to_string(),
            }),
        }
    }

    // All-or-nothing: an infeasible run commits no placement at all.
    if !outcome.unplaced.is_empty() {
        outcome.allocations.clear();
    }
    outcome
}
