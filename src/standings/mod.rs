use std::cmp::Ordering;

use serde::Serialize;

use crate::domain::{Group, Match, Player, PlayerId};

/// A player's aggregated record within a group. Derived on demand from a
/// match snapshot, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStanding {
    pub player_id: PlayerId,
    pub player_name: String,
    pub match_wins: u32,
    pub match_losses: u32,
    pub rack_wins: u32,
    pub rack_losses: u32,
    pub points: u32,
    pub group_position: u32,
    pub top1_prob: Option<f64>,
    pub top2_prob: Option<f64>,
}

impl GroupStanding {
    pub fn rack_difference(&self) -> i64 {
        self.rack_wins as i64 - self.rack_losses as i64
    }
}

/// Which comparator to finish a sort with. `Alphabetical` yields a fully
/// deterministic table; `RankOnly` stops at the sporting keys so genuinely
/// tied standings compare equal (used for knockout seeding).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    Alphabetical,
    RankOnly,
}

/// Fold a group's completed matches into a ranked table. `matches` is
/// typically the group's completed matches, or a simulated overlay.
pub fn aggregate(group: &Group, matches: &[Match]) -> Vec<GroupStanding> {
    aggregate_with(group, matches, TieBreak::Alphabetical)
}

pub fn aggregate_with(group: &Group, matches: &[Match], tie_break: TieBreak) -> Vec<GroupStanding> {
    let mut table: Vec<GroupStanding> = group
        .players
        .iter()
        .map(|p| tally_player(p, matches))
        .collect();

    table.sort_by(|a, b| compare(a, b, tie_break));
    for (idx, standing) in table.iter_mut().enumerate() {
        standing.group_position = idx as u32 + 1;
    }
    table
}

/// Composite comparator: points, rack difference, rack wins (all
/// descending), then player name unless `RankOnly`. First decisive key wins.
pub fn compare(a: &GroupStanding, b: &GroupStanding, tie_break: TieBreak) -> Ordering {
    let by_rank = b
        .points
        .cmp(&a.points)
        .then(b.rack_difference().cmp(&a.rack_difference()))
        .then(b.rack_wins.cmp(&a.rack_wins));
    match tie_break {
        TieBreak::Alphabetical => by_rank.then_with(|| a.player_name.cmp(&b.player_name)),
        TieBreak::RankOnly => by_rank,
    }
}

fn tally_player(player: &Player, matches: &[Match]) -> GroupStanding {
    let mut standing = GroupStanding {
        player_id: player.id,
        player_name: player.name.clone(),
        match_wins: 0,
        match_losses: 0,
        rack_wins: 0,
        rack_losses: 0,
        points: 0,
        group_position: 0,
        top1_prob: None,
        top2_prob: None,
    };

    for m in matches.iter().filter(|m| m.has_player(player.id)) {
        let Some(winner) = m.winner_id() else {
            continue;
        };
        if winner == player.id {
            standing.match_wins += 1;
        } else {
            standing.match_losses += 1;
        }
        standing.rack_wins += m.rack_wins_for(player.id).unwrap_or(0);
        standing.rack_losses += m.rack_losses_for(player.id).unwrap_or(0);
    }

    standing.points = standing.match_wins * 3;
    standing
}
