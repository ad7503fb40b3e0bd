use serde::{Deserialize, Serialize};

pub type PlayerId = i64;
pub type GroupId = i64;
pub type MatchId = i64;

/// Player reference data. Immutable from this subsystem's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub nickname: Option<String>,
}

/// A round-robin group. Member order is irrelevant to computation but kept
/// stable for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub players: Vec<Player>,
}

impl Group {
    pub fn member(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }
}
