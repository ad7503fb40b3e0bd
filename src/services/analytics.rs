use log::info;

use crate::config::settings::AppConfig;
use crate::domain::{Group, GroupId, Match};
use crate::errors::EngineError;
use crate::qualification::{self, Qualifier};
use crate::rating::{self, RatingMap};
use crate::simulation::{self, GroupPrediction};
use crate::snapshot::Tournament;
use crate::standings::{self, GroupStanding};

/// Orchestrates the analytics pipeline over a validated tournament
/// snapshot: ratings, per-group standings with forecast probabilities,
/// knockout qualifiers. Every call recomputes from the supplied snapshot;
/// nothing is cached.
pub struct AnalyticsService {
    config: AppConfig,
}

impl AnalyticsService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Elo ratings over the full chronological match history.
    pub fn ratings(&self, tournament: &Tournament) -> RatingMap {
        rating::compute_ratings(
            &tournament.player_ids(),
            &tournament.matches,
            &self.config.rating,
        )
    }

    /// Ranked table for one group, with 1st / top-two probabilities
    /// attached while the group is still unfinished.
    pub fn group_standings(
        &self,
        tournament: &Tournament,
        group_id: GroupId,
    ) -> Result<Vec<GroupStanding>, EngineError> {
        let group = tournament.group(group_id)?;
        let matches = tournament.group_matches(group_id);
        let mut table = standings::aggregate(group, &matches);

        let prediction = self.predict_with(tournament, group, &matches);
        if !prediction.top1.is_empty() {
            attach_probabilities(&mut table, &prediction);
        }
        Ok(table)
    }

    /// Knockout field across all groups, seeded.
    pub fn qualifiers(
        &self,
        tournament: &Tournament,
        total_slots: usize,
    ) -> Result<Vec<Qualifier>, EngineError> {
        info!(
            "computing standings for {} groups",
            tournament.groups.len()
        );
        let standings_by_group = tournament
            .groups
            .iter()
            .map(|group| {
                let matches = tournament.group_matches(group.id);
                standings::aggregate(group, &matches)
            })
            .collect::<Vec<_>>();

        qualification::select_qualifiers(&standings_by_group, total_slots)
    }

    /// Monte Carlo forecast for one group.
    pub fn predict(
        &self,
        tournament: &Tournament,
        group_id: GroupId,
    ) -> Result<GroupPrediction, EngineError> {
        let group = tournament.group(group_id)?;
        let matches = tournament.group_matches(group_id);
        Ok(self.predict_with(tournament, group, &matches))
    }

    fn predict_with(
        &self,
        tournament: &Tournament,
        group: &Group,
        matches: &[Match],
    ) -> GroupPrediction {
        let ratings = self.ratings(tournament);
        simulation::predict_group(group, matches, &ratings, &self.config)
    }
}

fn attach_probabilities(table: &mut [GroupStanding], prediction: &GroupPrediction) {
    for standing in table.iter_mut() {
        standing.top1_prob = Some(
            prediction
                .top1
                .get(&standing.player_id)
                .copied()
                .unwrap_or(0.0),
        );
        standing.top2_prob = Some(
            prediction
                .top2
                .get(&standing.player_id)
                .copied()
                .unwrap_or(0.0),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MatchSlot, Player, Stage};
    use crate::errors::EngineError;

    fn player(id: i64, name: &str) -> Player {
        Player {
            id,
            name: name.to_string(),
            nickname: None,
        }
    }

    fn small_tournament() -> Tournament {
        let players = vec![player(1, "Adam"), player(2, "Bartek"), player(3, "Celina")];
        let group = Group {
            id: 10,
            name: "Group A".to_string(),
            players: players.clone(),
        };
        let matches = vec![
            Match::completed(1, Stage::Group(10), (1, 2), 5, 2, None),
            Match::completed(2, Stage::Group(10), (1, 3), 5, 4, None),
            Match::pending(
                3,
                Stage::Group(10),
                (MatchSlot::Player(2), MatchSlot::Player(3)),
                None,
            ),
        ];
        Tournament {
            players,
            groups: vec![group],
            matches,
        }
    }

    fn seeded_service() -> AnalyticsService {
        let mut config = AppConfig::new();
        config.simulation.seed = Some(7);
        AnalyticsService::new(config)
    }

    #[test]
    fn standings_carry_probabilities_while_unfinished() {
        let service = seeded_service();
        let table = service
            .group_standings(&small_tournament(), 10)
            .unwrap();

        assert_eq!(table[0].player_id, 1);
        for standing in &table {
            assert!(standing.top1_prob.is_some());
            assert!(standing.top2_prob.is_some());
        }
        // Adam won both his matches; with one match left he stays on top in
        // every scenario.
        assert_eq!(table[0].top1_prob, Some(1.0));
    }

    #[test]
    fn unknown_group_propagates() {
        let service = seeded_service();
        let err = service.group_standings(&small_tournament(), 77).unwrap_err();
        assert_eq!(err, EngineError::GroupNotFound(77));
    }

    #[test]
    fn ratings_cover_every_player() {
        let service = seeded_service();
        let tournament = small_tournament();
        let ratings = service.ratings(&tournament);
        assert_eq!(ratings.len(), 3);
        assert!(ratings[&1] > ratings[&2]);
    }
}
