use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_BASE_POINTS: i64 = 10;
pub const DEFAULT_LOSE_PENALTY_POINTS: i64 = 3;
pub const DEFAULT_CHAMPION_POINTS: i64 = 50;
pub const DEFAULT_RUNNER_UP_POINTS: i64 = 30;
pub const DEFAULT_SEMIFINALIST_POINTS: i64 = 20;
pub const DEFAULT_QUARTERFINALIST_POINTS: i64 = 10;

/// Scoring configuration as stored on a tournament record.
///
/// Every field is optional: the blob is written by the admin UI and may omit
/// or null out anything. Call [`ScoringConfig::resolve`] to get the fully
/// populated [`ScoringRules`] the engine works with.
///
/// Example YAML:
/// ```yaml
/// enabled: true
/// basePoints: 10
/// useRankingMultiplier: true
/// rankingFormula: bracket
/// bonusForUpset: 5
/// losePenaltyEnabled: true
/// customFormula: "isUpset ? currentPoints + 2 : currentPoints"
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringConfig {
    /// Master switch (default: false)
    pub enabled: Option<bool>,

    /// Points for a plain win before adjustments (default: 10)
    pub base_points: Option<i64>,

    pub use_ranking_multiplier: Option<bool>,

    /// Multiplier curve: "linear", "exponential" or "bracket" (default: linear)
    pub ranking_formula: Option<RankingFormula>,

    /// Flat bonus when the worse-ranked player wins (default: 0)
    pub bonus_for_upset: Option<i64>,

    pub lose_penalty_enabled: Option<bool>,

    /// Penalty magnitude for the loser before multipliers (default: 3)
    pub lose_penalty_points: Option<i64>,

    pub use_lose_penalty_multiplier: Option<bool>,

    /// Extra flat penalty when the favourite's opponent loses as expected (default: 0)
    pub penalty_for_loss: Option<i64>,

    /// Expression that may override the winner total.
    /// Example: "max(currentPoints, basePoints * 2)"
    pub custom_formula: Option<String>,

    pub placement_points_enabled: Option<bool>,

    /// Placement curve: "dynamic", "fixed" or "percentage" (default: dynamic)
    pub placement_points_formula: Option<PlacementFormula>,

    pub champion_points: Option<i64>,
    pub runner_up_points: Option<i64>,
    pub semifinalist_points: Option<i64>,
    pub quarterfinalist_points: Option<i64>,
}

impl ScoringConfig {
    /// Fill in every default in one place.
    pub fn resolve(&self) -> ScoringRules {
        ScoringRules {
            enabled: self.enabled.unwrap_or(false),
            base_points: self.base_points.unwrap_or(DEFAULT_BASE_POINTS),
            use_ranking_multiplier: self.use_ranking_multiplier.unwrap_or(false),
            ranking_formula: self.ranking_formula.unwrap_or_default(),
            bonus_for_upset: self.bonus_for_upset.unwrap_or(0),
            lose_penalty_enabled: self.lose_penalty_enabled.unwrap_or(false),
            lose_penalty_points: self
                .lose_penalty_points
                .unwrap_or(DEFAULT_LOSE_PENALTY_POINTS),
            use_lose_penalty_multiplier: self.use_lose_penalty_multiplier.unwrap_or(false),
            penalty_for_loss: self.penalty_for_loss.unwrap_or(0),
            custom_formula: self
                .custom_formula
                .as_deref()
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string),
            placement_points_enabled: self.placement_points_enabled.unwrap_or(false),
            placement_points_formula: self.placement_points_formula.unwrap_or_default(),
            champion_points: self.champion_points.unwrap_or(DEFAULT_CHAMPION_POINTS),
            runner_up_points: self.runner_up_points.unwrap_or(DEFAULT_RUNNER_UP_POINTS),
            semifinalist_points: self
                .semifinalist_points
                .unwrap_or(DEFAULT_SEMIFINALIST_POINTS),
            quarterfinalist_points: self
                .quarterfinalist_points
                .unwrap_or(DEFAULT_QUARTERFINALIST_POINTS),
        }
    }
}

/// Fully resolved scoring rules. Built only through [`ScoringConfig::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRules {
    pub enabled: bool,
    pub base_points: i64,
    pub use_ranking_multiplier: bool,
    pub ranking_formula: RankingFormula,
    pub bonus_for_upset: i64,
    pub lose_penalty_enabled: bool,
    pub lose_penalty_points: i64,
    pub use_lose_penalty_multiplier: bool,
    pub penalty_for_loss: i64,
    pub custom_formula: Option<String>,
    pub placement_points_enabled: bool,
    pub placement_points_formula: PlacementFormula,
    pub champion_points: i64,
    pub runner_up_points: i64,
    pub semifinalist_points: i64,
    pub quarterfinalist_points: i64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        ScoringConfig::default().resolve()
    }
}

/// Curve mapping ranking gap and upset flag to a points multiplier.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RankingFormula {
    #[default]
    Linear,
    Exponential,
    Bracket,
    /// Any name we don't recognise. Behaves as a neutral multiplier.
    #[serde(other)]
    Unknown,
}

impl RankingFormula {
    pub fn name(&self) -> &'static str {
        match self {
            RankingFormula::Linear => "linear",
            RankingFormula::Exponential => "exponential",
            RankingFormula::Bracket => "bracket",
            RankingFormula::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RankingFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How final standings turn into placement points.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlacementFormula {
    #[default]
    Dynamic,
    Fixed,
    Percentage,
    #[serde(other)]
    Unknown,
}

impl PlacementFormula {
    pub fn name(&self) -> &'static str {
        match self {
            PlacementFormula::Dynamic => "dynamic",
            PlacementFormula::Fixed => "fixed",
            PlacementFormula::Percentage => "percentage",
            PlacementFormula::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PlacementFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = ScoringRules::default();

        assert!(!rules.enabled);
        assert_eq!(rules.base_points, 10);
        assert_eq!(rules.ranking_formula, RankingFormula::Linear);
        assert_eq!(rules.lose_penalty_points, 3);
        assert_eq!(rules.placement_points_formula, PlacementFormula::Dynamic);
        assert_eq!(rules.champion_points, 50);
        assert_eq!(rules.runner_up_points, 30);
        assert_eq!(rules.semifinalist_points, 20);
        assert_eq!(rules.quarterfinalist_points, 10);
        assert!(rules.custom_formula.is_none());
    }

    #[test]
    fn test_partial_yaml_parse() {
        let yaml = r#"
enabled: true
basePoints: 20
rankingFormula: bracket
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        let rules = config.resolve();
        assert!(rules.enabled);
        assert_eq!(rules.base_points, 20);
        assert_eq!(rules.ranking_formula, RankingFormula::Bracket);
        assert_eq!(rules.bonus_for_upset, 0);
    }

    #[test]
    fn test_json_blob_with_nulls_and_extra_keys() {
        let json = r#"{
            "enabled": true,
            "basePoints": null,
            "customFormula": null,
            "placementPointsFormula": "fixed",
            "legacyField": 42
        }"#;
        let config: ScoringConfig = serde_json::from_str(json).unwrap();
        let rules = config.resolve();
        assert_eq!(rules.base_points, DEFAULT_BASE_POINTS);
        assert_eq!(rules.placement_points_formula, PlacementFormula::Fixed);
    }

    #[test]
    fn test_unknown_formula_names_fall_back() {
        let json = r#"{"rankingFormula": "quadratic", "placementPointsFormula": "elo"}"#;
        let config: ScoringConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.ranking_formula, Some(RankingFormula::Unknown));
        assert_eq!(config.placement_points_formula, Some(PlacementFormula::Unknown));
    }

    #[test]
    fn test_blank_custom_formula_is_none() {
        let config = ScoringConfig {
            custom_formula: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(config.resolve().custom_formula.is_none());
    }

    #[test]
    fn test_empty_config_parse() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, ScoringConfig::default());
    }
}
