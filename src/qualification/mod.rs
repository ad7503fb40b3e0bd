use std::cmp::Ordering;

use log::info;
use serde::Serialize;

use crate::errors::EngineError;
use crate::standings::{self, GroupStanding, TieBreak};

/// A knockout-stage entrant. Seeds are shared across standings that are
/// equal on every sporting tie-break key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Qualifier {
    pub seed: u32,
    pub standing: GroupStanding,
}

/// Pick the players advancing to a fixed-size knockout bracket from the
/// per-group tables. `total_slots` need not divide evenly by the number of
/// groups: every group sends its top `total_slots / groups`, and the
/// leftover slots go to the best next-placed finishers compared across
/// groups (the wildcards).
pub fn select_qualifiers(
    standings_by_group: &[Vec<GroupStanding>],
    total_slots: usize,
) -> Result<Vec<Qualifier>, EngineError> {
    let group_count = standings_by_group.len();
    if group_count == 0 || total_slots == 0 {
        return Err(EngineError::NotEnoughQualifiers {
            needed: total_slots,
            available: 0,
        });
    }

    let base = total_slots / group_count;
    let remaining = total_slots - group_count * base;
    info!(
        "selecting {} qualifiers from {} groups ({} guaranteed per group, {} wildcards)",
        total_slots, group_count, base, remaining
    );

    let mut qualifiers: Vec<GroupStanding> = standings_by_group
        .iter()
        .flat_map(|table| table.iter().take(base).cloned())
        .collect();

    if remaining > 0 {
        qualifiers.extend(wildcards(standings_by_group, base, remaining));
    }

    if qualifiers.len() != total_slots {
        return Err(EngineError::NotEnoughQualifiers {
            needed: total_slots,
            available: qualifiers.len(),
        });
    }

    Ok(assign_seeds(qualifiers))
}

/// The position-`base` finisher of every group, compared with the full
/// deterministic comparator; the best `remaining` of them advance.
fn wildcards(
    standings_by_group: &[Vec<GroupStanding>],
    base: usize,
    remaining: usize,
) -> Vec<GroupStanding> {
    let mut candidates: Vec<GroupStanding> = standings_by_group
        .iter()
        .filter_map(|table| table.get(base).cloned())
        .collect();
    candidates.sort_by(|a, b| standings::compare(a, b, TieBreak::Alphabetical));
    candidates.truncate(remaining);
    candidates
}

/// Order the full field with the rank-only comparator and number the seeds.
/// Standings that compare equal share a seed; the next distinct standing
/// takes the following number, so seeds compress over ties rather than skip.
fn assign_seeds(mut qualifiers: Vec<GroupStanding>) -> Vec<Qualifier> {
    qualifiers.sort_by(|a, b| standings::compare(a, b, TieBreak::RankOnly));

    let mut seeded = Vec::with_capacity(qualifiers.len());
    let mut seed = 0u32;
    for (idx, standing) in qualifiers.iter().enumerate() {
        let tied_with_previous = idx > 0
            && standings::compare(&qualifiers[idx - 1], standing, TieBreak::RankOnly)
                == Ordering::Equal;
        if !tied_with_previous {
            seed += 1;
        }
        seeded.push(Qualifier {
            seed,
            standing: standing.clone(),
        });
    }
    seeded
}
