//! # Assignment Store Boundary
//!
//! The engine treats persistence as an external collaborator. This module
//! pins down the contract it relies on: single-document read-your-writes for
//! the guard-then-mutate sequences, and an all-or-nothing batch write for
//! the team-wide confirmation cascade. `MemoryStore` is the in-process
//! implementation used by tests and the CLI tools.

use rustc_hash::FxHashMap;

use crate::allocator::AssignedPairs;
use crate::assignment::ProblemAssignment;

/// Document store for [`ProblemAssignment`] records, keyed by participant id.
pub trait AssignmentStore {
    fn get(&self, participant_id: &str) -> Option<ProblemAssignment>;

    fn put(&mut self, assignment: ProblemAssignment);

    /// Writes every record in `batch`, atomically: either all records land
    /// or none do. The confirmation cascade depends on this contract; a
    /// store that can only apply records one by one must not implement it
    /// with a plain loop.
    fn put_batch(&mut self, batch: Vec<ProblemAssignment>);

    /// Every assignment sharing `team_id`.
    fn by_team(&self, team_id: &str) -> Vec<ProblemAssignment>;

    /// All stored assignments, in unspecified order.
    fn all(&self) -> Vec<ProblemAssignment>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of offered identity pairs per participant, the shape the
    /// allocator's exclusion sets are seeded from.
    fn assigned_pairs(&self) -> AssignedPairs {
        let mut pairs = AssignedPairs::default();
        for assignment in self.all() {
            pairs.insert(assignment.participant_id.clone(), assignment.offered_keys());
        }
        pairs
    }
}

/// In-memory store. Single-threaded, so every write is trivially atomic and
/// `put_batch` meets the all-or-nothing contract by construction.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: FxHashMap<String, ProblemAssignment>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssignmentStore for MemoryStore {
    fn get(&self, participant_id: &str) -> Option<ProblemAssignment> {
        self.documents.get(participant_id).cloned()
    }

    fn put(&mut self, assignment: ProblemAssignment) {
        self.documents
            .insert(assignment.participant_id.clone(), assignment);
    }

    fn put_batch(&mut self, batch: Vec<ProblemAssignment>) {
        for assignment in batch {
            self.put(assignment);
        }
    }

    fn by_team(&self, team_id: &str) -> Vec<ProblemAssignment> {
        self.documents
            .values()
            .filter(|a| a.team_id == team_id)
            .cloned()
            .collect()
    }

    fn all(&self) -> Vec<ProblemAssignment> {
        self.documents.values().cloned().collect()
    }

    fn len(&self) -> usize {
        self.documents.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Problem;

    fn assignment(id: &str, team: &str) -> ProblemAssignment {
        ProblemAssignment::new(
            id,
            team,
            vec![Problem {
                domain_index: 0,
                problem_index: 0,
                domain: "d".into(),
                problem: "p".into(),
            }],
            2,
        )
    }

    #[test]
    fn put_get_and_team_lookup() {
        let mut store = MemoryStore::new();
        store.put(assignment("p1", "t1"));
        store.put(assignment("p2", "t1"));
        store.put(assignment("p3", "t2"));

        assert_eq!(store.len(), 3);
        assert!(store.get("p1").is_some());
        assert!(store.get("missing").is_none());
        assert_eq!(store.by_team("t1").len(), 2);
        assert_eq!(store.by_team("t2").len(), 1);
    }

    #[test]
    fn put_overwrites_by_participant_id() {
        let mut store = MemoryStore::new();
        store.put(assignment("p1", "t1"));
        let mut updated = assignment("p1", "t1");
        updated.refresh_count = 1;
        store.put(updated);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("p1").unwrap().refresh_count, 1);
    }

    #[test]
    fn assigned_pairs_reflect_offers() {
        let mut store = MemoryStore::new();
        store.put(assignment("p1", "t1"));
        let pairs = store.assigned_pairs();
        assert_eq!(pairs["p1"], vec![(0, 0)]);
    }
}
