pub mod matches;
pub mod models;

pub use matches::{KnockoutRound, Match, MatchSlot, MatchState, MatchStatus, Stage};
pub use models::{Group, GroupId, MatchId, Player, PlayerId};
