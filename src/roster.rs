use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The seat-relevant projection of a participant, as handed in by the
/// surrounding application. `room` and `seat` may be empty, meaning the
/// participant has not been placed yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatedParticipant {
    pub participant_id: String,
    pub team_id: String,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub seat: String,
}

/// A team derived by grouping the roster on `team_id`. Teams are not
/// persisted separately anywhere in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub team_id: String,
    pub members: Vec<String>,
}

impl Team {
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// Groups a roster into teams, preserving first-appearance order of both
/// teams and members so that downstream packing is deterministic for a
/// fixed input order.
pub fn group_teams(roster: &[SeatedParticipant]) -> Vec<Team> {
    let mut order: Vec<String> = Vec::new();
    let mut members: HashMap<String, Vec<String>> = HashMap::new();
    for p in roster {
        let entry = members.entry(p.team_id.clone()).or_default();
        if entry.is_empty() {
            order.push(p.team_id.clone());
        }
        entry.push(p.participant_id.clone());
    }
    order
        .into_iter()
        .map(|team_id| {
            let members = members.remove(&team_id).unwrap_or_default();
            Team { team_id, members }
        })
        .collect_vec()
}
