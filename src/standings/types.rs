use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::scoring::{PlacementResult, ScoringResult};

pub const STANDINGS_VERSION: u32 = 1;

/// Season point totals per athlete.
///
/// The engine hands out signed deltas; this is where they are applied and
/// where the running total is kept from dropping below zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Standings {
    pub version: u32,
    #[serde(default)]
    pub athletes: BTreeMap<String, AthleteStanding>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AthleteStanding {
    pub points: i64,
    #[serde(default)]
    pub matches_won: u32,
    #[serde(default)]
    pub matches_lost: u32,
    pub updated_at: DateTime<Utc>,
}

impl AthleteStanding {
    fn new() -> Self {
        Self {
            points: 0,
            matches_won: 0,
            matches_lost: 0,
            updated_at: Utc::now(),
        }
    }

    fn apply_delta(&mut self, delta: i64) {
        self.points = self.points.saturating_add(delta).max(0);
        self.updated_at = Utc::now();
    }
}

/// One row of the ranking table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedAthlete<'a> {
    pub ranking: i64,
    pub athlete_id: &'a str,
    pub standing: &'a AthleteStanding,
}

impl Default for Standings {
    fn default() -> Self {
        Self::new()
    }
}

impl Standings {
    pub fn new() -> Self {
        Self {
            version: STANDINGS_VERSION,
            athletes: BTreeMap::new(),
        }
    }

    /// Athletes ordered by points descending, ties broken by id so the table
    /// is stable.
    pub fn ranked(&self) -> Vec<RankedAthlete<'_>> {
        let mut rows: Vec<_> = self.athletes.iter().collect();
        rows.sort_by(|(a_id, a), (b_id, b)| b.points.cmp(&a.points).then_with(|| a_id.cmp(b_id)));
        rows.into_iter()
            .enumerate()
            .map(|(i, (id, standing))| RankedAthlete {
                ranking: i as i64 + 1,
                athlete_id: id.as_str(),
                standing,
            })
            .collect()
    }

    /// 1-based ranking of an athlete. Athletes not in the table rank just
    /// below everyone who is.
    pub fn ranking_of(&self, athlete_id: &str) -> i64 {
        self.ranked()
            .iter()
            .find(|row| row.athlete_id == athlete_id)
            .map(|row| row.ranking)
            .unwrap_or(self.athletes.len() as i64 + 1)
    }

    pub fn points_of(&self, athlete_id: &str) -> i64 {
        self.athletes.get(athlete_id).map_or(0, |a| a.points)
    }

    fn entry(&mut self, athlete_id: &str) -> &mut AthleteStanding {
        self.athletes
            .entry(athlete_id.to_string())
            .or_insert_with(AthleteStanding::new)
    }

    /// Apply a match result to both players.
    pub fn apply_match(&mut self, winner_id: &str, loser_id: &str, result: &ScoringResult) {
        let winner = self.entry(winner_id);
        winner.apply_delta(result.winner_points);
        winner.matches_won = winner.matches_won.saturating_add(1);

        let loser = self.entry(loser_id);
        loser.apply_delta(result.loser_points);
        loser.matches_lost = loser.matches_lost.saturating_add(1);
    }

    pub fn apply_placement(&mut self, result: &PlacementResult) {
        self.entry(&result.athlete_id)
            .apply_delta(result.placement_points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_result(winner_points: i64, loser_points: i64) -> ScoringResult {
        ScoringResult {
            winner_points,
            loser_points,
            bonus_points: 0,
            penalty_points: loser_points.min(0).saturating_abs(),
            total_points: winner_points,
            explanation: vec![],
        }
    }

    #[test]
    fn test_new_standings_empty() {
        let standings = Standings::new();
        assert_eq!(standings.version, 1);
        assert!(standings.athletes.is_empty());
        assert_eq!(standings.ranking_of("anyone"), 1);
    }

    #[test]
    fn test_apply_match() {
        let mut standings = Standings::new();
        standings.apply_match("ana", "bruno", &match_result(12, -3));

        assert_eq!(standings.points_of("ana"), 12);
        // Clamped: bruno had nothing to lose
        assert_eq!(standings.points_of("bruno"), 0);
        assert_eq!(standings.athletes["ana"].matches_won, 1);
        assert_eq!(standings.athletes["bruno"].matches_lost, 1);
    }

    #[test]
    fn test_total_never_negative() {
        let mut standings = Standings::new();
        standings.apply_match("ana", "bruno", &match_result(5, 0));
        standings.apply_match("carla", "ana", &match_result(10, -40));
        assert_eq!(standings.points_of("ana"), 0);
    }

    #[test]
    fn test_ranked_order_and_ties() {
        let mut standings = Standings::new();
        standings.apply_match("carla", "ana", &match_result(10, 0));
        standings.apply_match("bruno", "dani", &match_result(10, 0));
        standings.apply_match("ana", "dani", &match_result(20, 0));

        let ids: Vec<_> = standings.ranked().iter().map(|r| r.athlete_id).collect();
        assert_eq!(ids, vec!["ana", "bruno", "carla", "dani"]);
        assert_eq!(standings.ranking_of("bruno"), 2);
        assert_eq!(standings.ranking_of("carla"), 3);
        assert_eq!(standings.ranking_of("newcomer"), 5);
    }

    #[test]
    fn test_apply_placement() {
        let mut standings = Standings::new();
        standings.apply_placement(&PlacementResult {
            athlete_id: "ana".to_string(),
            placement: 1,
            placement_points: 50,
            explanation: vec![],
        });
        assert_eq!(standings.points_of("ana"), 50);
        assert_eq!(standings.athletes["ana"].matches_won, 0);
    }
}
