//! Boundary models for the caller-supplied tournament snapshot.
//!
//! The engine itself assumes well-formed input; this module is where raw
//! records are checked and converted into the domain sum types, so malformed
//! data is rejected before it can reach a computation.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;

use crate::domain::{
    Group, GroupId, KnockoutRound, Match, MatchId, MatchSlot, Player, PlayerId, Stage,
};
use crate::errors::EngineError;

/// Raw snapshot as supplied by the data-access collaborator (or a JSON
/// file via the CLI). Field names follow the upstream camelCase records.
#[derive(Debug, Clone, Deserialize)]
pub struct TournamentSnapshot {
    pub players: Vec<Player>,
    pub groups: Vec<RawGroup>,
    pub matches: Vec<RawMatch>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGroup {
    pub id: GroupId,
    pub name: String,
    pub player_ids: Vec<PlayerId>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatch {
    pub id: MatchId,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    /// Knockout matches carry a stage name and bracket order instead of a
    /// group id.
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
    #[serde(default)]
    pub player1_id: Option<PlayerId>,
    #[serde(default)]
    pub player2_id: Option<PlayerId>,
    /// Placeholder references for unresolved knockout slots.
    #[serde(default)]
    pub player1_winner_of: Option<MatchId>,
    #[serde(default)]
    pub player2_winner_of: Option<MatchId>,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub score1: Option<u32>,
    #[serde(default)]
    pub score2: Option<u32>,
}

/// Validated tournament data, ready for the engine.
#[derive(Debug, Clone)]
pub struct Tournament {
    pub players: Vec<Player>,
    pub groups: Vec<Group>,
    pub matches: Vec<Match>,
}

impl Tournament {
    pub fn group(&self, group_id: GroupId) -> Result<&Group, EngineError> {
        self.groups
            .iter()
            .find(|g| g.id == group_id)
            .ok_or(EngineError::GroupNotFound(group_id))
    }

    pub fn group_matches(&self, group_id: GroupId) -> Vec<Match> {
        self.matches
            .iter()
            .filter(|m| m.group_id() == Some(group_id))
            .cloned()
            .collect()
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }
}

/// Check referential integrity and per-match invariants, then build domain
/// types. Any failure aborts the whole conversion; the engine never sees a
/// partially valid snapshot.
pub fn validate(snapshot: TournamentSnapshot) -> Result<Tournament, EngineError> {
    let known_players: HashSet<PlayerId> = snapshot.players.iter().map(|p| p.id).collect();
    let known_groups: HashSet<GroupId> = snapshot.groups.iter().map(|g| g.id).collect();
    let known_matches: HashSet<MatchId> = snapshot.matches.iter().map(|m| m.id).collect();

    let player_index: HashMap<PlayerId, &Player> =
        snapshot.players.iter().map(|p| (p.id, p)).collect();

    let groups = snapshot
        .groups
        .iter()
        .map(|raw| build_group(raw, &player_index))
        .collect::<Result<Vec<_>, _>>()?;

    let matches = snapshot
        .matches
        .iter()
        .map(|raw| build_match(raw, &known_players, &known_groups, &known_matches))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "validated snapshot: {} players, {} groups, {} matches",
        snapshot.players.len(),
        groups.len(),
        matches.len()
    );

    Ok(Tournament {
        players: snapshot.players,
        groups,
        matches,
    })
}

fn build_group(
    raw: &RawGroup,
    player_index: &HashMap<PlayerId, &Player>,
) -> Result<Group, EngineError> {
    let players = raw
        .player_ids
        .iter()
        .map(|id| {
            player_index
                .get(id)
                .map(|p| (*p).clone())
                .ok_or(EngineError::PlayerNotFound(*id))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Group {
        id: raw.id,
        name: raw.name.clone(),
        players,
    })
}

fn build_match(
    raw: &RawMatch,
    known_players: &HashSet<PlayerId>,
    known_groups: &HashSet<GroupId>,
    known_matches: &HashSet<MatchId>,
) -> Result<Match, EngineError> {
    let stage = build_stage(raw, known_groups)?;

    match (raw.score1, raw.score2) {
        (Some(score1), Some(score2)) => {
            if score1 == score2 {
                return Err(invalid(raw.id, "completed match with equal scores"));
            }
            let p1 = defined_player(raw.id, raw.player1_id, known_players)?;
            let p2 = defined_player(raw.id, raw.player2_id, known_players)?;
            Ok(Match::completed(
                raw.id,
                stage,
                (p1, p2),
                score1,
                score2,
                raw.scheduled_at,
            ))
        }
        (None, None) => {
            let slot1 = build_slot(raw, raw.player1_id, raw.player1_winner_of, known_players, known_matches)?;
            let slot2 = build_slot(raw, raw.player2_id, raw.player2_winner_of, known_players, known_matches)?;
            Ok(Match::pending(raw.id, stage, (slot1, slot2), raw.scheduled_at))
        }
        _ => Err(invalid(raw.id, "exactly one score present")),
    }
}

fn build_stage(raw: &RawMatch, known_groups: &HashSet<GroupId>) -> Result<Stage, EngineError> {
    if let Some(group_id) = raw.group_id {
        if !known_groups.contains(&group_id) {
            return Err(EngineError::GroupNotFound(group_id));
        }
        return Ok(Stage::Group(group_id));
    }

    let Some(stage) = raw.stage.as_deref() else {
        return Err(invalid(raw.id, "neither group id nor stage present"));
    };
    let round = match stage {
        "quarterfinal" => KnockoutRound::QuarterFinal,
        "semifinal" => KnockoutRound::SemiFinal,
        "final" => KnockoutRound::Final,
        other => return Err(invalid(raw.id, format!("unknown stage '{other}'"))),
    };
    Ok(Stage::Knockout {
        round,
        order: raw.order.unwrap_or(0),
    })
}

fn build_slot(
    raw: &RawMatch,
    player_id: Option<PlayerId>,
    winner_of: Option<MatchId>,
    known_players: &HashSet<PlayerId>,
    known_matches: &HashSet<MatchId>,
) -> Result<MatchSlot, EngineError> {
    match (player_id, winner_of) {
        (Some(id), None) => {
            if !known_players.contains(&id) {
                return Err(EngineError::PlayerNotFound(id));
            }
            Ok(MatchSlot::Player(id))
        }
        (None, Some(source)) => {
            if !known_matches.contains(&source) {
                return Err(EngineError::MatchNotFound(raw.id));
            }
            Ok(MatchSlot::WinnerOf(source))
        }
        (None, None) => Ok(MatchSlot::Open),
        (Some(_), Some(_)) => Err(invalid(raw.id, "slot has both player and placeholder")),
    }
}

fn defined_player(
    match_id: MatchId,
    player_id: Option<PlayerId>,
    known_players: &HashSet<PlayerId>,
) -> Result<PlayerId, EngineError> {
    let Some(id) = player_id else {
        return Err(invalid(match_id, "completed match without defined players"));
    };
    if !known_players.contains(&id) {
        return Err(EngineError::PlayerNotFound(id));
    }
    Ok(id)
}

fn invalid(id: MatchId, reason: impl Into<String>) -> EngineError {
    EngineError::InvalidMatch {
        id,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_snapshot() -> TournamentSnapshot {
        let raw = r#"{
            "players": [
                {"id": 1, "name": "Adam", "nickname": null},
                {"id": 2, "name": "Bartek", "nickname": "B"}
            ],
            "groups": [
                {"id": 10, "name": "Group A", "playerIds": [1, 2]}
            ],
            "matches": [
                {"id": 100, "groupId": 10, "player1Id": 1, "player2Id": 2,
                 "score1": 5, "score2": 3},
                {"id": 101, "stage": "final", "order": 1,
                 "player1WinnerOf": 100}
            ]
        }"#;
        serde_json::from_str(raw).expect("snapshot json should parse")
    }

    #[test]
    fn valid_snapshot_converts() {
        let tournament = validate(base_snapshot()).unwrap();
        assert_eq!(tournament.groups.len(), 1);
        assert_eq!(tournament.matches.len(), 2);

        let group_match = &tournament.matches[0];
        assert!(group_match.is_completed());
        assert_eq!(group_match.winner_id(), Some(1));

        let final_match = &tournament.matches[1];
        assert!(!final_match.has_defined_players());
        assert_eq!(final_match.group_id(), None);
    }

    #[test]
    fn equal_scores_are_rejected() {
        let mut snapshot = base_snapshot();
        snapshot.matches[0].score2 = Some(5);
        let err = validate(snapshot).unwrap_err();
        assert!(matches!(err, EngineError::InvalidMatch { id: 100, .. }));
    }

    #[test]
    fn lone_score_is_rejected() {
        let mut snapshot = base_snapshot();
        snapshot.matches[0].score2 = None;
        assert!(matches!(
            validate(snapshot).unwrap_err(),
            EngineError::InvalidMatch { id: 100, .. }
        ));
    }

    #[test]
    fn unknown_group_reference_fails() {
        let mut snapshot = base_snapshot();
        snapshot.matches[0].group_id = Some(99);
        assert_eq!(
            validate(snapshot).unwrap_err(),
            EngineError::GroupNotFound(99)
        );
    }

    #[test]
    fn unknown_player_reference_fails() {
        let mut snapshot = base_snapshot();
        snapshot.groups[0].player_ids.push(42);
        assert_eq!(
            validate(snapshot).unwrap_err(),
            EngineError::PlayerNotFound(42)
        );
    }

    #[test]
    fn dangling_placeholder_fails() {
        let mut snapshot = base_snapshot();
        snapshot.matches[1].player1_winner_of = Some(999);
        assert_eq!(
            validate(snapshot).unwrap_err(),
            EngineError::MatchNotFound(101)
        );
    }

    #[test]
    fn group_match_lookup_filters_by_group() {
        let tournament = validate(base_snapshot()).unwrap();
        assert_eq!(tournament.group_matches(10).len(), 1);
        assert!(tournament.group(99).is_err());
    }
}
