use chrono::{DateTime, Utc};

use super::models::{GroupId, MatchId, PlayerId};
use crate::config::settings::RaceSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Group(GroupId),
    Knockout { round: KnockoutRound, order: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnockoutRound {
    QuarterFinal,
    SemiFinal,
    Final,
}

impl Stage {
    /// Racks required to win a match at this stage. A configuration lookup,
    /// not a property of the match itself.
    pub fn race_to(&self, races: &RaceSettings) -> u32 {
        match self {
            Stage::Group(_) => races.group_race_to,
            Stage::Knockout { round, .. } => match round {
                KnockoutRound::QuarterFinal => races.quarter_final_race_to,
                KnockoutRound::SemiFinal => races.semi_final_race_to,
                KnockoutRound::Final => races.final_race_to,
            },
        }
    }
}

/// One side of a match that has not been decided yet. Knockout slots may
/// point at the winner of an earlier match before that match is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSlot {
    Player(PlayerId),
    WinnerOf(MatchId),
    Open,
}

impl MatchSlot {
    pub fn player_id(&self) -> Option<PlayerId> {
        match self {
            MatchSlot::Player(id) => Some(*id),
            _ => None,
        }
    }
}

/// Lifecycle of a match, one variant per valid combination. A completed
/// match always carries two concrete players and two unequal scores, so
/// "completed but unscored" or "completed against a placeholder" cannot be
/// constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchState {
    Pending {
        slots: (MatchSlot, MatchSlot),
        scheduled_at: Option<DateTime<Utc>>,
    },
    Completed {
        players: (PlayerId, PlayerId),
        score1: u32,
        score2: u32,
        scheduled_at: Option<DateTime<Utc>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Upcoming,
    Scheduled,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub id: MatchId,
    pub stage: Stage,
    pub state: MatchState,
}

impl Match {
    pub fn pending(
        id: MatchId,
        stage: Stage,
        slots: (MatchSlot, MatchSlot),
        scheduled_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            stage,
            state: MatchState::Pending {
                slots,
                scheduled_at,
            },
        }
    }

    pub fn completed(
        id: MatchId,
        stage: Stage,
        players: (PlayerId, PlayerId),
        score1: u32,
        score2: u32,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            stage,
            state: MatchState::Completed {
                players,
                score1,
                score2,
                scheduled_at,
            },
        }
    }

    pub fn group_id(&self) -> Option<GroupId> {
        match self.stage {
            Stage::Group(id) => Some(id),
            Stage::Knockout { .. } => None,
        }
    }

    pub fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            MatchState::Pending { scheduled_at, .. } => *scheduled_at,
            MatchState::Completed { scheduled_at, .. } => *scheduled_at,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, MatchState::Completed { .. })
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled_at().is_some()
    }

    /// Both sides are concrete players (no placeholders, no open slots).
    pub fn has_defined_players(&self) -> bool {
        self.player_ids().is_some()
    }

    pub fn player_ids(&self) -> Option<(PlayerId, PlayerId)> {
        match &self.state {
            MatchState::Completed { players, .. } => Some(*players),
            MatchState::Pending { slots, .. } => {
                Some((slots.0.player_id()?, slots.1.player_id()?))
            }
        }
    }

    /// Status relative to `now`; a pending match whose scheduled time has
    /// passed is considered in progress.
    pub fn status(&self, now: DateTime<Utc>) -> MatchStatus {
        match &self.state {
            MatchState::Completed { .. } => MatchStatus::Completed,
            MatchState::Pending { scheduled_at, .. } => match scheduled_at {
                Some(at) if *at <= now => MatchStatus::InProgress,
                Some(_) => MatchStatus::Scheduled,
                None => MatchStatus::Upcoming,
            },
        }
    }

    pub fn winner_id(&self) -> Option<PlayerId> {
        match &self.state {
            MatchState::Completed {
                players,
                score1,
                score2,
                ..
            } => {
                if score1 > score2 {
                    Some(players.0)
                } else {
                    Some(players.1)
                }
            }
            MatchState::Pending { .. } => None,
        }
    }

    pub fn loser_id(&self) -> Option<PlayerId> {
        match &self.state {
            MatchState::Completed {
                players,
                score1,
                score2,
                ..
            } => {
                if score1 > score2 {
                    Some(players.1)
                } else {
                    Some(players.0)
                }
            }
            MatchState::Pending { .. } => None,
        }
    }

    pub fn has_player(&self, player_id: PlayerId) -> bool {
        match self.player_ids() {
            Some((p1, p2)) => p1 == player_id || p2 == player_id,
            None => false,
        }
    }

    pub fn opponent_of(&self, player_id: PlayerId) -> Option<PlayerId> {
        let (p1, p2) = self.player_ids()?;
        if player_id == p1 {
            Some(p2)
        } else if player_id == p2 {
            Some(p1)
        } else {
            None
        }
    }

    /// Racks won by `player_id`, for completed matches they took part in.
    pub fn rack_wins_for(&self, player_id: PlayerId) -> Option<u32> {
        match &self.state {
            MatchState::Completed {
                players,
                score1,
                score2,
                ..
            } => {
                if players.0 == player_id {
                    Some(*score1)
                } else if players.1 == player_id {
                    Some(*score2)
                } else {
                    None
                }
            }
            MatchState::Pending { .. } => None,
        }
    }

    pub fn rack_losses_for(&self, player_id: PlayerId) -> Option<u32> {
        let opponent = self.opponent_of(player_id)?;
        self.rack_wins_for(opponent)
    }
}
