//! # Assignment Lifecycle
//!
//! Per-participant record of offered problems and the one-way confirmation
//! state machine:
//!
//! `UNALLOCATED -[allocate]-> OFFERED -[refresh, guarded]-> OFFERED
//! -[confirm]-> CONFIRMED`
//!
//! `CONFIRMED` is terminal. Confirmation is a team decision: the selected
//! problem cascades to every assignment sharing the team id, which the store
//! layer applies as one all-or-nothing batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Problem;
use crate::error::EngineError;

/// Domain name given to free-text "custom" submissions.
pub const OPEN_INNOVATION_DOMAIN: &str = "Open Innovation";

/// Sentinel identity pair for custom submissions.
pub const CUSTOM_PROBLEM_KEY: (i32, i32) = (-1, -1);

/// One entry of the append-only refresh audit log: the offered identity
/// pairs as they stood before the refresh, and when the refresh happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRecord {
    pub previous_options: Vec<(i32, i32)>,
    pub refreshed_at: DateTime<Utc>,
}

/// The per-participant assignment document.
///
/// Created once with a single offered problem (or up to three in the
/// domain-biased flow), grown by refreshes, and frozen by confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemAssignment {
    pub participant_id: String,
    pub team_id: String,
    pub offered_problems: Vec<Problem>,
    pub selected_problem: Option<Problem>,
    pub is_confirmed: bool,
    pub refresh_count: u32,
    pub max_refreshes: u32,
    pub refresh_history: Vec<RefreshRecord>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl ProblemAssignment {
    pub fn new(
        participant_id: impl Into<String>,
        team_id: impl Into<String>,
        offered_problems: Vec<Problem>,
        max_refreshes: u32,
    ) -> Self {
        Self {
            participant_id: participant_id.into(),
            team_id: team_id.into(),
            offered_problems,
            selected_problem: None,
            is_confirmed: false,
            refresh_count: 0,
            max_refreshes,
            refresh_history: Vec::new(),
            confirmed_at: None,
        }
    }

    /// Identity pairs of the currently offered problems.
    pub fn offered_keys(&self) -> Vec<(i32, i32)> {
        self.offered_problems.iter().map(Problem::key).collect()
    }

    /// Checks the refresh guards without mutating anything. A refresh is
    /// denied once the assignment is confirmed, the budget is spent, or the
    /// offer already holds `max_offered` problems: the offered list must
    /// stay within the 1 to 3 range whichever flow created it.
    pub fn check_refresh(&self, max_offered: usize) -> Result<(), EngineError> {
        if self.is_confirmed
            || self.refresh_count >= self.max_refreshes
            || self.offered_problems.len() >= max_offered
        {
            return Err(EngineError::RefreshDenied {
                refresh_count: self.refresh_count,
                max_refreshes: self.max_refreshes,
                confirmed: self.is_confirmed,
            });
        }
        Ok(())
    }

    /// Appends one freshly allocated problem, bumps the counter, and logs
    /// the pre-refresh offer set, all under one mutation so the audit trail
    /// and the counter can never drift apart. Fails without side effects if
    /// any refresh guard denies.
    pub fn apply_refresh(&mut self, problem: Problem, max_offered: usize) -> Result<(), EngineError> {
        self.check_refresh(max_offered)?;
        self.refresh_history.push(RefreshRecord {
            previous_options: self.offered_keys(),
            refreshed_at: Utc::now(),
        });
        self.offered_problems.push(problem);
        self.refresh_count += 1;
        Ok(())
    }

    /// Confirms the offered problem at `index`. Terminal on success.
    pub fn confirm_selection(&mut self, index: usize) -> Result<&Problem, EngineError> {
        self.check_unconfirmed()?;
        if index >= self.offered_problems.len() {
            return Err(EngineError::InvalidSelection {
                index,
                offered: self.offered_problems.len(),
            });
        }
        let selected = self.offered_problems[index].clone();
        self.finalize(selected, Utc::now());
        Ok(self.selected_problem.as_ref().expect("just set"))
    }

    /// Confirms a free-text custom problem. The text must be at least
    /// `min_len` characters after trimming; the synthesized problem carries
    /// the `(-1, -1)` sentinel identity under the "Open Innovation" domain.
    pub fn confirm_custom(&mut self, text: &str, min_len: usize) -> Result<&Problem, EngineError> {
        self.check_unconfirmed()?;
        let selected = custom_problem(text, min_len)?;
        self.finalize(selected, Utc::now());
        Ok(self.selected_problem.as_ref().expect("just set"))
    }

    /// Applies a teammate's confirmed selection to this record. Used by the
    /// team-wide cascade; unconditional because the cascade overwrites every
    /// record of the team with the same terminal state.
    pub fn cascade(&mut self, selected: Problem, at: DateTime<Utc>) {
        self.finalize(selected, at);
    }

    fn check_unconfirmed(&self) -> Result<(), EngineError> {
        if self.is_confirmed {
            return Err(EngineError::AlreadyConfirmed {
                selected: self
                    .selected_problem
                    .clone()
                    .unwrap_or_else(|| custom_placeholder()),
            });
        }
        Ok(())
    }

    fn finalize(&mut self, selected: Problem, at: DateTime<Utc>) {
        self.selected_problem = Some(selected);
        self.is_confirmed = true;
        self.confirmed_at = Some(at);
    }
}

// A confirmed record always has a selection; this placeholder only guards
// against a corrupted document read back from the store.
fn custom_placeholder() -> Problem {
    Problem {
        domain_index: CUSTOM_PROBLEM_KEY.0,
        problem_index: CUSTOM_PROBLEM_KEY.1,
        domain: OPEN_INNOVATION_DOMAIN.to_string(),
        problem: String::new(),
    }
}

/// Validates and synthesizes a custom "Open Innovation" problem from
/// free-form text.
pub fn custom_problem(text: &str, min_len: usize) -> Result<Problem, EngineError> {
    let trimmed = text.trim();
    if trimmed.chars().count() < min_len {
        return Err(EngineError::InvalidCustomText {
            len: trimmed.chars().count(),
            min: min_len,
        });
    }
    Ok(Problem {
        domain_index: CUSTOM_PROBLEM_KEY.0,
        problem_index: CUSTOM_PROBLEM_KEY.1,
        domain: OPEN_INNOVATION_DOMAIN.to_string(),
        problem: trimmed.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(di: i32, pi: i32) -> Problem {
        Problem {
            domain_index: di,
            problem_index: pi,
            domain: format!("d{di}"),
            problem: format!("statement {di}/{pi}"),
        }
    }

    fn offered() -> ProblemAssignment {
        ProblemAssignment::new("p1", "t1", vec![problem(0, 0)], 2)
    }

    const MAX_OFFERED: usize = 3;

    #[test]
    fn refresh_is_additive_and_logged() {
        let mut a = offered();
        a.apply_refresh(problem(1, 0), MAX_OFFERED).unwrap();
        assert_eq!(a.offered_problems.len(), 2);
        assert_eq!(a.refresh_count, 1);
        assert_eq!(a.refresh_history.len(), 1);
        assert_eq!(a.refresh_history[0].previous_options, vec![(0, 0)]);

        a.apply_refresh(problem(1, 1), MAX_OFFERED).unwrap();
        assert_eq!(a.refresh_history[1].previous_options, vec![(0, 0), (1, 0)]);
    }

    #[test]
    fn refresh_budget_is_enforced_without_side_effects() {
        let mut a = offered();
        a.apply_refresh(problem(1, 0), MAX_OFFERED).unwrap();
        a.apply_refresh(problem(1, 1), MAX_OFFERED).unwrap();

        let err = a.apply_refresh(problem(2, 0), MAX_OFFERED).unwrap_err();
        match err {
            EngineError::RefreshDenied {
                refresh_count,
                max_refreshes,
                confirmed,
            } => {
                assert_eq!(refresh_count, 2);
                assert_eq!(max_refreshes, 2);
                assert!(!confirmed);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(a.offered_problems.len(), 3);
        assert_eq!(a.refresh_count, 2);
        assert_eq!(a.refresh_history.len(), 2);
    }

    #[test]
    fn refresh_after_confirmation_is_denied() {
        let mut a = offered();
        a.confirm_selection(0).unwrap();
        let err = a.apply_refresh(problem(1, 0), MAX_OFFERED).unwrap_err();
        assert!(matches!(
            err,
            EngineError::RefreshDenied { confirmed: true, .. }
        ));
        assert_eq!(a.offered_problems.len(), 1);
    }

    #[test]
    fn full_offer_cannot_be_refreshed_even_with_budget_left() {
        // Three offers up front (the domain-biased flow) with an untouched
        // refresh budget: the offer-size cap alone must deny the refresh.
        let mut a = ProblemAssignment::new(
            "p1",
            "t1",
            vec![problem(0, 0), problem(0, 1), problem(1, 0)],
            2,
        );
        let err = a.apply_refresh(problem(1, 1), MAX_OFFERED).unwrap_err();
        assert!(matches!(
            err,
            EngineError::RefreshDenied {
                refresh_count: 0,
                confirmed: false,
                ..
            }
        ));
        assert_eq!(a.offered_problems.len(), 3);
        assert_eq!(a.refresh_count, 0);
        assert!(a.refresh_history.is_empty());
    }

    #[test]
    fn selection_index_is_validated() {
        let mut a = offered();
        let err = a.confirm_selection(3).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidSelection { index: 3, offered: 1 }
        ));
        assert!(!a.is_confirmed);

        let selected = a.confirm_selection(0).unwrap().clone();
        assert_eq!(selected.key(), (0, 0));
        assert!(a.is_confirmed);
        assert!(a.confirmed_at.is_some());
    }

    #[test]
    fn reconfirmation_fails_with_existing_selection() {
        let mut a = offered();
        a.confirm_selection(0).unwrap();
        let err = a.confirm_selection(0).unwrap_err();
        match err {
            EngineError::AlreadyConfirmed { selected } => assert_eq!(selected.key(), (0, 0)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn custom_text_is_trimmed_and_length_checked() {
        assert!(matches!(
            custom_problem("short", 10),
            Err(EngineError::InvalidCustomText { len: 5, min: 10 })
        ));
        // Whitespace padding does not count toward the minimum.
        assert!(custom_problem("   padded  ", 10).is_err());

        let ok = custom_problem("a valid ten+ char idea", 10).unwrap();
        assert_eq!(ok.key(), (-1, -1));
        assert_eq!(ok.domain, OPEN_INNOVATION_DOMAIN);
        assert_eq!(ok.problem, "a valid ten+ char idea");
    }

    #[test]
    fn custom_confirmation_sets_sentinel_selection() {
        let mut a = offered();
        let selected = a.confirm_custom("build a seat heatmap app", 10).unwrap().clone();
        assert_eq!(selected.domain_index, -1);
        assert!(a.is_confirmed);
    }

    #[test]
    fn serialized_shape_uses_camel_case() {
        let a = offered();
        let json = serde_json::to_value(&a).unwrap();
        assert!(json.get("offeredProblems").is_some());
        assert!(json.get("refreshCount").is_some());
        assert!(json.get("maxRefreshes").is_some());
        assert!(json.get("isConfirmed").is_some());
    }
}
