//! # Problem Catalog
//!
//! The static catalog of hackathon problem statements, grouped by domain.
//! The built-in dataset is compiled in and never mutated at runtime; the
//! `Catalog` type itself is an immutable value that is injected into the
//! allocator, so tests can substitute a smaller catalog.

use once_cell::sync::Lazy;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// One problem statement. Identity is the `(domain_index, problem_index)`
/// pair; the custom "Open Innovation" submission uses the sentinel `(-1, -1)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "domainIndex")]
    pub domain_index: i32,
    #[serde(rename = "problemIndex")]
    pub problem_index: i32,
    pub domain: String,
    pub problem: String,
}

impl Problem {
    /// The `(domain_index, problem_index)` identity pair.
    pub fn key(&self) -> (i32, i32) {
        (self.domain_index, self.problem_index)
    }
}

/// A domain with its ordered list of problem statements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDomain {
    pub name: String,
    pub statements: Vec<String>,
}

/// An immutable set of domains, each with a fixed ordered statement list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    domains: Vec<CatalogDomain>,
}

impl Catalog {
    pub fn new(domains: Vec<CatalogDomain>) -> Self {
        Self { domains }
    }

    pub fn domains(&self) -> &[CatalogDomain] {
        &self.domains
    }

    pub fn domain_names(&self) -> Vec<&str> {
        self.domains.iter().map(|d| d.name.as_str()).collect()
    }

    /// Flattens the catalog into an ordered list of `Problem`s.
    ///
    /// The order is stable across calls: domains in declaration order, then
    /// statements in declaration order within each domain.
    pub fn all_problems(&self) -> Vec<Problem> {
        let mut out = Vec::new();
        for (di, domain) in self.domains.iter().enumerate() {
            for (pi, text) in domain.statements.iter().enumerate() {
                out.push(Problem {
                    domain_index: di as i32,
                    problem_index: pi as i32,
                    domain: domain.name.clone(),
                    problem: text.clone(),
                });
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.domains.iter().map(|d| d.statements.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Draws `n` distinct problems from `pool` uniformly at random without
/// replacement. Saturates rather than erroring: if `n > |pool|`, the whole
/// pool is returned.
pub fn sample<R: Rng + ?Sized>(pool: &[Problem], n: usize, rng: &mut R) -> Vec<Problem> {
    pool.choose_multiple(rng, n).cloned().collect()
}

macro_rules! domain {
    ($name:expr, [$($stmt:expr),+ $(,)?]) => {
        CatalogDomain {
            name: $name.to_string(),
            statements: vec![$($stmt.to_string()),+],
        }
    };
}

/// The catalog shipped with the event. Built once on first use.
static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    Catalog::new(vec![
        domain!(
            "AI & Machine Learning",
            [
                "Build an on-device assistant that summarizes lecture recordings without sending audio to the cloud.",
                "Detect manufacturing defects from assembly-line camera feeds using a lightweight vision model.",
                "Create a plagiarism-aware code review helper that explains, not just flags, suspicious similarity.",
                "Predict campus cafeteria demand from historical swipe data to cut food waste.",
            ]
        ),
        domain!(
            "Healthcare",
            [
                "Design a medication-adherence companion for elderly patients with low smartphone literacy.",
                "Triage incoming telehealth requests by urgency using structured symptom questionnaires.",
                "Build a privacy-preserving dashboard that lets clinics pool anonymized outbreak signals.",
                "Turn discharge summaries into plain-language recovery checklists for patients.",
            ]
        ),
        domain!(
            "FinTech",
            [
                "Help first-time earners visualize recurring subscriptions hidden in their statements.",
                "Build a micro-lending trust score from utility payment history for the credit-invisible.",
                "Detect mule-account patterns in peer-to-peer transfer graphs in near real time.",
                "Create a split-payment settlement tool for informal group purchases.",
            ]
        ),
        domain!(
            "Sustainability",
            [
                "Route campus shuttle buses dynamically from live ridership to cut idle mileage.",
                "Gamify dorm-level electricity savings with verifiable meter readings.",
                "Match surplus cafeteria food with nearby shelters under time and safety constraints.",
                "Estimate a building's retrofit payback period from public energy disclosures.",
            ]
        ),
        domain!(
            "Smart Education",
            [
                "Generate spaced-repetition decks automatically from a student's own lecture notes.",
                "Build a peer-tutoring matchmaker that balances subject strength and schedule overlap.",
                "Create an accessibility layer that live-captions and diagrams whiteboard content.",
            ]
        ),
    ])
});

/// The compiled-in event catalog.
pub fn builtin() -> &'static Catalog {
    &BUILTIN
}
