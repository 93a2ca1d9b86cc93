use super::config::{PlacementFormula, RankingFormula, ScoringConfig};
use super::formula::Formula;

/// Validate a scoring configuration before a tournament starts.
/// Returns all validation errors at once (not just the first).
///
/// The engine itself tolerates every problem reported here; this exists so
/// organisers find out before matches are scored with a silent fallback.
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let non_negative = [
        ("basePoints", config.base_points),
        ("bonusForUpset", config.bonus_for_upset),
        ("losePenaltyPoints", config.lose_penalty_points),
        ("penaltyForLoss", config.penalty_for_loss),
        ("championPoints", config.champion_points),
        ("runnerUpPoints", config.runner_up_points),
        ("semifinalistPoints", config.semifinalist_points),
        ("quarterfinalistPoints", config.quarterfinalist_points),
    ];
    for (field, value) in non_negative {
        if let Some(v) = value {
            if v < 0 {
                errors.push(format!("scoring.{}: must be non-negative (got {})", field, v));
            }
        }
    }

    if config.ranking_formula == Some(RankingFormula::Unknown) {
        errors.push(
            "scoring.rankingFormula: unrecognised, expected linear, exponential or bracket"
                .to_string(),
        );
    }

    if config.placement_points_formula == Some(PlacementFormula::Unknown) {
        errors.push(
            "scoring.placementPointsFormula: unrecognised, expected dynamic, fixed or percentage"
                .to_string(),
        );
    }

    if let Some(ref formula) = config.custom_formula {
        if !formula.trim().is_empty() {
            if let Err(e) = Formula::parse(formula) {
                errors.push(format!(
                    "scoring.customFormula: invalid '{}' - {}",
                    formula, e
                ));
            }
        }
    }

    // Placement tiers should not pay more for going out earlier
    let rules = config.resolve();
    if rules.placement_points_enabled
        && rules.placement_points_formula != PlacementFormula::Percentage
    {
        let tiers = [
            ("championPoints", rules.champion_points),
            ("runnerUpPoints", rules.runner_up_points),
            ("semifinalistPoints", rules.semifinalist_points),
            ("quarterfinalistPoints", rules.quarterfinalist_points),
        ];
        for pair in tiers.windows(2) {
            let (higher_name, higher) = pair[0];
            let (lower_name, lower) = pair[1];
            if lower > higher {
                errors.push(format!(
                    "scoring.{}: must not exceed {} ({} > {})",
                    lower_name, higher_name, lower, higher
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = ScoringConfig {
            enabled: Some(true),
            base_points: Some(10),
            ranking_formula: Some(RankingFormula::Exponential),
            custom_formula: Some("max(currentPoints, basePoints)".to_string()),
            placement_points_enabled: Some(true),
            ..Default::default()
        };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_empty_config() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_negative_base_points() {
        let config = ScoringConfig {
            base_points: Some(-10),
            ..Default::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.basePoints"));
    }

    #[test]
    fn test_invalid_custom_formula() {
        let config = ScoringConfig {
            custom_formula: Some("process.exit(1)".to_string()),
            ..Default::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].starts_with("scoring.customFormula: invalid 'process.exit(1)'"));
    }

    #[test]
    fn test_unknown_formula_names() {
        let config: ScoringConfig = serde_json::from_str(
            r#"{"rankingFormula": "cubic", "placementPointsFormula": "elo"}"#,
        )
        .unwrap();
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("rankingFormula"));
        assert!(errors[1].contains("placementPointsFormula"));
    }

    #[test]
    fn test_inverted_placement_tiers() {
        let config = ScoringConfig {
            placement_points_enabled: Some(true),
            placement_points_formula: Some(PlacementFormula::Fixed),
            runner_up_points: Some(60),
            ..Default::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(
            errors,
            vec!["scoring.runnerUpPoints: must not exceed championPoints (60 > 50)"]
        );
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            base_points: Some(-1),
            penalty_for_loss: Some(-2),
            custom_formula: Some("1 +".to_string()),
            ..Default::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
