//! # Neighbor-Aware Allocator
//!
//! Picks candidate problems for a participant while avoiding everything held
//! by grid-adjacent participants. All entry points are pure functions of the
//! roster snapshot, the already-assigned pair map, and the catalog; the only
//! state is the caller-provided RNG.
//!
//! When the neighbor constraint cannot be satisfied the allocator drops it
//! and samples from the unfiltered pool instead of failing: a participant
//! must always receive an option before the confirmation deadline, even in a
//! pathological seating.

use rand::rngs::StdRng;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::catalog::{self, Catalog, Problem};
use crate::roster::SeatedParticipant;
use crate::topology;

/// Already-assigned `(domain_index, problem_index)` pairs per participant.
/// Seeds exclusion sets without re-reading full problem records.
pub type AssignedPairs = FxHashMap<String, Vec<(i32, i32)>>;

/// The union of all problem pairs held by `participant`'s seat neighbors.
fn neighbor_exclusion(
    participant: &SeatedParticipant,
    roster: &[SeatedParticipant],
    assigned: &AssignedPairs,
) -> FxHashSet<(i32, i32)> {
    let mut excluded = FxHashSet::default();
    for neighbor in topology::neighbors(participant, roster) {
        if let Some(pairs) = assigned.get(&neighbor.participant_id) {
            excluded.extend(pairs.iter().copied());
        }
    }
    excluded
}

/// Drops every problem whose identity pair is in `excluded`.
pub fn filter_by_exclusion(pool: &[Problem], excluded: &FxHashSet<(i32, i32)>) -> Vec<Problem> {
    pool.iter()
        .filter(|p| !excluded.contains(&p.key()))
        .cloned()
        .collect()
}

// Set-emptiness fallback, not error handling: an empty filtered pool means
// the constraint is unsatisfiable and is dropped.
fn or_else_unfiltered(filtered: Vec<Problem>, unfiltered: &[Problem]) -> Vec<Problem> {
    if filtered.is_empty() {
        unfiltered.to_vec()
    } else {
        filtered
    }
}

/// Seeds a participant with exactly one problem no seat neighbor holds,
/// falling back to the whole catalog when every problem is held nearby.
pub fn allocate_initial(
    participant: &SeatedParticipant,
    roster: &[SeatedParticipant],
    assigned: &AssignedPairs,
    catalog: &Catalog,
    rng: &mut StdRng,
) -> Vec<Problem> {
    let excluded = neighbor_exclusion(participant, roster, assigned);
    let all = catalog.all_problems();
    let pool = or_else_unfiltered(filter_by_exclusion(&all, &excluded), &all);
    catalog::sample(&pool, 1, rng)
}

/// Offers up to three problems biased toward `domain`: two from the
/// requested domain followed by one from any other domain.
///
/// The catalog is partitioned by domain before exclusion filtering, and each
/// partition falls back to its own unfiltered subset, never the whole
/// catalog. The domain preference survives even when the neighbor constraint
/// has to be dropped.
pub fn allocate_by_domain(
    participant: &SeatedParticipant,
    domain: &str,
    roster: &[SeatedParticipant],
    assigned: &AssignedPairs,
    catalog: &Catalog,
    rng: &mut StdRng,
) -> Vec<Problem> {
    let excluded = neighbor_exclusion(participant, roster, assigned);
    let all = catalog.all_problems();
    let (same, other): (Vec<Problem>, Vec<Problem>) =
        all.into_iter().partition(|p| p.domain == domain);

    let same_pool = or_else_unfiltered(filter_by_exclusion(&same, &excluded), &same);
    let other_pool = or_else_unfiltered(filter_by_exclusion(&other, &excluded), &other);

    let mut offered = catalog::sample(&same_pool, 2, rng);
    offered.extend(catalog::sample(&other_pool, 1, rng));
    offered
}

/// Picks one additional problem for a refresh: excluded pairs are the
/// neighbor-held set plus everything already on the participant's own offer,
/// so a refresh never repeats an option already on the table.
pub fn refresh_one(
    participant: &SeatedParticipant,
    roster: &[SeatedParticipant],
    assigned: &AssignedPairs,
    current_offers: &[Problem],
    catalog: &Catalog,
    rng: &mut StdRng,
) -> Vec<Problem> {
    let mut excluded = neighbor_exclusion(participant, roster, assigned);
    excluded.extend(current_offers.iter().map(Problem::key));
    let all = catalog.all_problems();
    let pool = or_else_unfiltered(filter_by_exclusion(&all, &excluded), &all);
    catalog::sample(&pool, 1, rng)
}

/// Bulk-seeds the whole roster in one sweep.
///
/// The roster is ordered by (room, row, column) so lower-indexed seats are
/// always processed first; each participant's pick is fed into `assigned`
/// before the next participant is handled. Exclusion therefore reflects the
/// picks already made in this pass, an online greedy order rather than a
/// global solve. The sweep must not be interleaved with concurrent
/// per-participant allocation against the same roster.
pub fn allocate_all(
    roster: &[SeatedParticipant],
    assigned: &mut AssignedPairs,
    catalog: &Catalog,
    rng: &mut StdRng,
) -> FxHashMap<String, Vec<Problem>> {
    let mut ordered: Vec<&SeatedParticipant> = roster.iter().collect();
    ordered.sort_by_key(|p| {
        (
            p.room.clone(),
            topology::parse_row(&p.seat).unwrap_or("").to_string(),
            topology::parse_column(&p.seat).unwrap_or(u32::MAX),
        )
    });

    let mut result = FxHashMap::default();
    for participant in ordered {
        let picked = allocate_initial(participant, roster, assigned, catalog, rng);
        assigned
            .entry(participant.participant_id.clone())
            .or_default()
            .extend(picked.iter().map(Problem::key));
        result.insert(participant.participant_id.clone(), picked);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogDomain;
    use rand::SeedableRng;

    fn two_by_two_catalog() -> Catalog {
        Catalog::new(vec![
            CatalogDomain {
                name: "Alpha".into(),
                statements: vec!["alpha zero".into(), "alpha one".into()],
            },
            CatalogDomain {
                name: "Beta".into(),
                statements: vec!["beta zero".into(), "beta one".into()],
            },
        ])
    }

    fn seated(id: &str, seat: &str) -> SeatedParticipant {
        SeatedParticipant {
            participant_id: id.into(),
            team_id: format!("t-{id}"),
            room: "L1".into(),
            seat: seat.into(),
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn initial_pick_avoids_neighbor_problems() {
        let catalog = two_by_two_catalog();
        let roster = vec![seated("a", "L1-A-1"), seated("b", "L1-A-2")];
        let mut assigned = AssignedPairs::default();
        assigned.insert("b".into(), vec![(0, 0), (0, 1), (1, 0)]);

        // Only (1, 1) remains; the pick must be it, repeatedly.
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = allocate_initial(&roster[0], &roster, &assigned, &catalog, &mut rng);
            assert_eq!(picked.len(), 1);
            assert_eq!(picked[0].key(), (1, 1));
        }
    }

    #[test]
    fn exhausted_catalog_falls_back_instead_of_failing() {
        let catalog = two_by_two_catalog();
        let roster = vec![seated("a", "L1-A-1"), seated("b", "L1-A-2")];
        let mut assigned = AssignedPairs::default();
        assigned.insert("b".into(), vec![(0, 0), (0, 1), (1, 0), (1, 1)]);

        let picked = allocate_initial(&roster[0], &roster, &assigned, &catalog, &mut rng());
        assert_eq!(picked.len(), 1, "fallback must still yield one problem");
    }

    #[test]
    fn domain_offer_is_two_plus_one() {
        let catalog = two_by_two_catalog();
        let roster = vec![seated("a", "L1-A-1")];
        let assigned = AssignedPairs::default();

        let offered =
            allocate_by_domain(&roster[0], "Alpha", &roster, &assigned, &catalog, &mut rng());
        assert_eq!(offered.len(), 3);
        assert_eq!(offered[0].domain, "Alpha");
        assert_eq!(offered[1].domain, "Alpha");
        assert_eq!(offered[2].domain, "Beta");
    }

    #[test]
    fn domain_fallback_stays_inside_the_domain() {
        let catalog = two_by_two_catalog();
        let roster = vec![seated("a", "L1-A-1"), seated("b", "L1-A-2")];
        let mut assigned = AssignedPairs::default();
        // Neighbor holds all of Alpha; the same-domain pool must fall back to
        // Alpha itself, not leak into Beta.
        assigned.insert("b".into(), vec![(0, 0), (0, 1)]);

        let offered =
            allocate_by_domain(&roster[0], "Alpha", &roster, &assigned, &catalog, &mut rng());
        assert_eq!(offered.len(), 3);
        assert_eq!(offered[0].domain, "Alpha");
        assert_eq!(offered[1].domain, "Alpha");
        assert_eq!(offered[2].domain, "Beta");
    }

    #[test]
    fn short_domain_pool_shrinks_the_offer() {
        let catalog = Catalog::new(vec![
            CatalogDomain {
                name: "Solo".into(),
                statements: vec!["only one".into()],
            },
            CatalogDomain {
                name: "Rest".into(),
                statements: vec!["other".into()],
            },
        ]);
        let roster = vec![seated("a", "L1-A-1")];
        let offered = allocate_by_domain(
            &roster[0],
            "Solo",
            &roster,
            &AssignedPairs::default(),
            &catalog,
            &mut rng(),
        );
        // One same-domain problem exists, so the offer is 1 + 1.
        assert_eq!(offered.len(), 2);
        assert_eq!(offered[0].domain, "Solo");
        assert_eq!(offered[1].domain, "Rest");
    }

    #[test]
    fn refresh_never_repeats_current_offers() {
        let catalog = two_by_two_catalog();
        let roster = vec![seated("a", "L1-A-1")];
        let current = vec![
            Problem {
                domain_index: 0,
                problem_index: 0,
                domain: "Alpha".into(),
                problem: "alpha zero".into(),
            },
            Problem {
                domain_index: 1,
                problem_index: 0,
                domain: "Beta".into(),
                problem: "beta zero".into(),
            },
        ];
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = refresh_one(
                &roster[0],
                &roster,
                &AssignedPairs::default(),
                &current,
                &catalog,
                &mut rng,
            );
            assert_eq!(picked.len(), 1);
            assert!(!current.iter().any(|c| c.key() == picked[0].key()));
        }
    }

    #[test]
    fn bulk_sweep_feeds_exclusions_forward() {
        // A 2x2 seat block and four problems in total: every pick must
        // differ from the picks of its grid neighbors, because the sweep
        // order guarantees those were already in the exclusion map.
        let catalog = two_by_two_catalog();
        let roster = vec![
            seated("p1", "L1-A-1"),
            seated("p2", "L1-A-2"),
            seated("p3", "L1-B-1"),
            seated("p4", "L1-B-2"),
        ];
        let mut assigned = AssignedPairs::default();
        let result = allocate_all(&roster, &mut assigned, &catalog, &mut rng());

        assert_eq!(result.len(), 4);
        for (_, problems) in &result {
            assert_eq!(problems.len(), 1);
        }
        // Left/right neighbors in row A must differ: p1 was assigned before
        // p2 in sweep order, so p2's exclusion saw p1's pick.
        assert_ne!(result["p1"][0].key(), result["p2"][0].key());
        assert_ne!(result["p3"][0].key(), result["p4"][0].key());
        assert_ne!(result["p1"][0].key(), result["p3"][0].key());
        assert_ne!(result["p2"][0].key(), result["p4"][0].key());
    }
}
