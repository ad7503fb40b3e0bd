use thiserror::Error;

use crate::domain::{GroupId, MatchId, PlayerId};

/// Failures of the analytics core. Lookup failures propagate instead of
/// silently dropping a match, since dropped data would corrupt standings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("group {0} not found")]
    GroupNotFound(GroupId),

    #[error("match {0} references unknown match")]
    MatchNotFound(MatchId),

    #[error("invalid match {id}: {reason}")]
    InvalidMatch { id: MatchId, reason: String },

    #[error("not enough qualifiers: need {needed}, have {available}")]
    NotEnoughQualifiers { needed: usize, available: usize },
}
