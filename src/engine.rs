//! # Allocation Engine
//!
//! The façade the surrounding application (HTTP handlers, in the full
//! system) calls into. It ties together the packer output (the roster), the
//! catalog, the neighbor-aware allocator, and the per-participant lifecycle,
//! persisting through the [`AssignmentStore`] boundary.
//!
//! Every operation is a synchronous read-modify-write against the store; the
//! engine itself holds no locks and performs no I/O beyond the store calls.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::allocator;
use crate::assignment::ProblemAssignment;
use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::roster::SeatedParticipant;
use crate::store::AssignmentStore;

pub struct Engine<S: AssignmentStore> {
    catalog: Catalog,
    config: EngineConfig,
    store: S,
    rng: StdRng,
}

impl<S: AssignmentStore> Engine<S> {
    /// `seed` pins the RNG for reproducible runs; `None` draws OS entropy.
    pub fn new(catalog: Catalog, config: EngineConfig, store: S, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            catalog,
            config,
            store,
            rng,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Bulk-seeds one assignment per roster participant, each with a single
    /// problem avoiding its seat neighbors' picks.
    ///
    /// The sweep must run exactly once: if any assignment already exists the
    /// call fails with [`EngineError::AllocationExists`] before touching
    /// anything, which is the serialization guard the single-pass allocator
    /// requires.
    pub fn seed_assignments(
        &mut self,
        roster: &[SeatedParticipant],
    ) -> Result<usize, EngineError> {
        if !self.store.is_empty() {
            return Err(EngineError::AllocationExists {
                existing: self.store.len(),
            });
        }
        let mut assigned = allocator::AssignedPairs::default();
        let allocated =
            allocator::allocate_all(roster, &mut assigned, &self.catalog, &mut self.rng);

        let mut batch = Vec::with_capacity(roster.len());
        for participant in roster {
            let offered = allocated
                .get(&participant.participant_id)
                .cloned()
                .unwrap_or_default();
            // Every assignment must carry at least the configured floor of
            // offers; an empty catalog cannot seed anything and the whole
            // run is rejected before any record is written.
            if offered.len() < self.config.min_offered_problems {
                return Err(EngineError::NotFound(format!(
                    "catalog yielded no offer for participant {}",
                    participant.participant_id
                )));
            }
            batch.push(ProblemAssignment::new(
                participant.participant_id.clone(),
                participant.team_id.clone(),
                offered,
                self.config.default_max_refreshes,
            ));
        }
        let seeded = batch.len();
        self.store.put_batch(batch);
        Ok(seeded)
    }

    /// Lazily creates a domain-biased three-problem offer for one
    /// participant: two problems from `domain`, one from elsewhere.
    ///
    /// Idempotent for an existing unconfirmed assignment (the current offer
    /// is returned untouched). A participant whose assignment was already
    /// confirmed elsewhere in the flow is a caller contract violation and
    /// surfaces as `NotFound`.
    pub fn offer_by_domain(
        &mut self,
        roster: &[SeatedParticipant],
        participant_id: &str,
        domain: &str,
    ) -> Result<ProblemAssignment, EngineError> {
        let participant = find_participant(roster, participant_id)?;
        if let Some(existing) = self.store.get(participant_id) {
            if existing.is_confirmed {
                return Err(EngineError::NotFound(format!(
                    "participant {participant_id} already holds a confirmed assignment"
                )));
            }
            return Ok(existing);
        }

        let assigned = self.store.assigned_pairs();
        let offered = allocator::allocate_by_domain(
            participant,
            domain,
            roster,
            &assigned,
            &self.catalog,
            &mut self.rng,
        );
        let assignment = ProblemAssignment::new(
            participant.participant_id.clone(),
            participant.team_id.clone(),
            offered,
            self.config.default_max_refreshes,
        );
        self.store.put(assignment.clone());
        Ok(assignment)
    }

    /// Adds one more non-conflicting option to a participant's offer,
    /// guarded by the confirmation flag, the refresh budget, and the
    /// offered-problems cap.
    pub fn refresh(
        &mut self,
        roster: &[SeatedParticipant],
        participant_id: &str,
    ) -> Result<ProblemAssignment, EngineError> {
        let participant = find_participant(roster, participant_id)?;
        let mut assignment = self
            .store
            .get(participant_id)
            .ok_or_else(|| EngineError::NotFound(format!("assignment for {participant_id}")))?;
        // Check guards before sampling so a denied refresh stays pure.
        assignment.check_refresh(self.config.max_offered_problems)?;

        let assigned = self.store.assigned_pairs();
        let picked = allocator::refresh_one(
            participant,
            roster,
            &assigned,
            &assignment.offered_problems,
            &self.catalog,
            &mut self.rng,
        );
        let problem = picked
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::NotFound("catalog is empty".to_string()))?;
        assignment.apply_refresh(problem, self.config.max_offered_problems)?;
        self.store.put(assignment.clone());
        Ok(assignment)
    }

    /// Confirms the offered problem at `index` for this participant and
    /// cascades the selection to the whole team.
    pub fn confirm_selection(
        &mut self,
        participant_id: &str,
        index: usize,
    ) -> Result<ProblemAssignment, EngineError> {
        let mut assignment = self
            .store
            .get(participant_id)
            .ok_or_else(|| EngineError::NotFound(format!("assignment for {participant_id}")))?;
        assignment.confirm_selection(index)?;
        self.cascade_team(assignment)
    }

    /// Confirms a free-text "Open Innovation" submission for this
    /// participant and cascades it to the whole team.
    pub fn confirm_custom(
        &mut self,
        participant_id: &str,
        text: &str,
    ) -> Result<ProblemAssignment, EngineError> {
        let mut assignment = self
            .store
            .get(participant_id)
            .ok_or_else(|| EngineError::NotFound(format!("assignment for {participant_id}")))?;
        assignment.confirm_custom(text, self.config.min_custom_text_len)?;
        self.cascade_team(assignment)
    }

    // Applies the confirmed selection to every teammate's record and writes
    // the whole team as one batch. Partial cascades are not a valid state,
    // hence the batch write rather than per-record puts.
    fn cascade_team(
        &mut self,
        confirmed: ProblemAssignment,
    ) -> Result<ProblemAssignment, EngineError> {
        let selected = confirmed
            .selected_problem
            .clone()
            .ok_or_else(|| EngineError::NotFound("confirmed assignment lost its selection".into()))?;
        let at = confirmed
            .confirmed_at
            .unwrap_or_else(chrono::Utc::now);

        let mut batch = vec![confirmed.clone()];
        for mut teammate in self.store.by_team(&confirmed.team_id) {
            if teammate.participant_id == confirmed.participant_id {
                continue;
            }
            teammate.cascade(selected.clone(), at);
            batch.push(teammate);
        }
        self.store.put_batch(batch);
        Ok(confirmed)
    }
}

fn find_participant<'a>(
    roster: &'a [SeatedParticipant],
    participant_id: &str,
) -> Result<&'a SeatedParticipant, EngineError> {
    roster
        .iter()
        .find(|p| p.participant_id == participant_id)
        .ok_or_else(|| EngineError::NotFound(format!("participant {participant_id}")))
}
