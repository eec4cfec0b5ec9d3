//! # Seat Topology Resolver
//!
//! Parses seat labels of the form `<room>-<rowLetter>-<column>` (e.g.
//! `L1-A-12`) and resolves the four grid-adjacent labels for a seat. Rows are
//! single uppercase letters; adjacency between rows is plain character-code
//! arithmetic. Multi-letter rows and shifts outside `A..=Z` have no defined
//! adjacent row and yield `None` instead of a nonsense label.
//!
//! Malformed or empty seats are never an error here: an unparsable seat
//! simply has no computable neighbors, so unseated participants flow through
//! the allocation pipeline untouched.

use crate::roster::SeatedParticipant;

/// The four candidate neighbor labels of a seat. A `None` side means no
/// adjacent seat can exist in that direction (a column at either numeric
/// bound, row `A`'s back, row `Z`'s front, or a multi-letter row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborLabels {
    pub left: Option<String>,
    pub right: Option<String>,
    pub front: Option<String>,
    pub back: Option<String>,
}

impl NeighborLabels {
    /// The labels that actually exist, in left/right/front/back order.
    pub fn present(&self) -> Vec<&str> {
        [&self.left, &self.right, &self.front, &self.back]
            .into_iter()
            .flatten()
            .map(|s| s.as_str())
            .collect()
    }
}

/// A participant found adjacent to another via seat-label matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbor {
    pub participant_id: String,
    pub seat: String,
}

// Splits a label into (room, row, column). The room part may itself contain
// hyphens, so the label is split from the right.
fn split_seat(seat: &str) -> Option<(&str, &str, u32)> {
    let mut parts = seat.rsplitn(3, '-');
    let column = parts.next()?;
    let row = parts.next()?;
    let room = parts.next()?;
    if room.is_empty() || row.is_empty() {
        return None;
    }
    if !row.chars().all(|c| c.is_ascii_uppercase()) {
        return None;
    }
    let column: u32 = column.parse().ok()?;
    Some((room, row, column))
}

/// The room part of a seat label, or `None` if the label is malformed.
pub fn parse_room(seat: &str) -> Option<&str> {
    split_seat(seat).map(|(room, _, _)| room)
}

/// The row letters of a seat label, or `None` if the label is malformed.
pub fn parse_row(seat: &str) -> Option<&str> {
    split_seat(seat).map(|(_, row, _)| row)
}

/// The column number of a seat label, or `None` if the label is malformed.
pub fn parse_column(seat: &str) -> Option<u32> {
    split_seat(seat).map(|(_, _, column)| column)
}

/// Computes the four grid-adjacent labels of `seat`, or `None` if the seat
/// label itself does not parse.
pub fn neighbor_labels(seat: &str) -> Option<NeighborLabels> {
    let (room, row, column) = split_seat(seat)?;
    let left = column
        .checked_sub(1)
        .map(|c| format!("{room}-{row}-{c}"));
    let right = column
        .checked_add(1)
        .map(|c| format!("{room}-{row}-{c}"));
    let (front, back) = if row.len() == 1 {
        let c = row.as_bytes()[0];
        let front =
            (c < b'Z').then(|| format!("{room}-{}-{column}", (c + 1) as char));
        let back =
            (c > b'A').then(|| format!("{room}-{}-{column}", (c - 1) as char));
        (front, back)
    } else {
        // Row adjacency is only defined for single-letter rows.
        (None, None)
    };
    Some(NeighborLabels {
        left,
        right,
        front,
        back,
    })
}

/// Returns every other participant whose current seat exactly matches one of
/// the four adjacent labels of `participant`'s seat. 0 to 4 entries.
pub fn neighbors(
    participant: &SeatedParticipant,
    roster: &[SeatedParticipant],
) -> Vec<Neighbor> {
    let Some(labels) = neighbor_labels(&participant.seat) else {
        return Vec::new();
    };
    let labels = labels.present();
    roster
        .iter()
        .filter(|other| other.participant_id != participant.participant_id)
        .filter(|other| !other.seat.is_empty() && labels.contains(&other.seat.as_str()))
        .map(|other| Neighbor {
            participant_id: other.participant_id.clone(),
            seat: other.seat.clone(),
        })
        .collect()
}
