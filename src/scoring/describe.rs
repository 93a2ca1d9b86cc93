use super::config::{PlacementFormula, RankingFormula, ScoringRules};

/// Human-readable summary of the active rules, in the order the engine
/// applies them. Used for the admin view of a tournament's scoring.
pub fn describe_rules(rules: &ScoringRules) -> Vec<String> {
    if !rules.enabled {
        return vec!["Scoring system disabled".to_string()];
    }

    let mut lines = vec![format!("Base points per win: {}", rules.base_points)];

    if rules.use_ranking_multiplier {
        lines.push(format!(
            "Ranking multiplier: {}",
            describe_ranking_formula(rules.ranking_formula)
        ));
    }

    if rules.bonus_for_upset > 0 {
        lines.push(format!("Upset bonus: +{} points", rules.bonus_for_upset));
    }

    if rules.lose_penalty_enabled {
        let mut penalty = format!("Loss penalty: -{} points", rules.lose_penalty_points);
        if rules.use_lose_penalty_multiplier {
            penalty.push_str(&format!(
                " (scaled by the {} curve)",
                rules.ranking_formula
            ));
        }
        lines.push(penalty);
        if rules.penalty_for_loss > 0 {
            lines.push(format!(
                "Extra penalty when the favourite wins: -{} points",
                rules.penalty_for_loss
            ));
        }
    }

    if let Some(ref formula) = rules.custom_formula {
        lines.push(format!("Custom formula: {}", formula));
    }

    if rules.placement_points_enabled {
        lines.push(format!(
            "Placement points: {}",
            describe_placement_formula(rules.placement_points_formula)
        ));
        if rules.placement_points_formula != PlacementFormula::Unknown {
            lines.push(format!(
                "Champion {} / runner-up {} / semifinalist {} / quarterfinalist {}",
                rules.champion_points,
                rules.runner_up_points,
                rules.semifinalist_points,
                rules.quarterfinalist_points
            ));
        }
    }

    lines
}

fn describe_ranking_formula(formula: RankingFormula) -> &'static str {
    match formula {
        RankingFormula::Linear => "linear (+1% per ranking place on upsets, -0.5% otherwise)",
        RankingFormula::Exponential => "exponential (grows sharply for large upsets)",
        RankingFormula::Bracket => "bracket (steps at 10, 25 and 50 ranking places)",
        RankingFormula::Unknown => "unrecognised formula, no adjustment",
    }
}

fn describe_placement_formula(formula: PlacementFormula) -> &'static str {
    match formula {
        PlacementFormula::Dynamic => "dynamic (scaled by field size)",
        PlacementFormula::Fixed => "fixed per elimination round",
        PlacementFormula::Percentage => "percentage of champion points by finishing position",
        PlacementFormula::Unknown => "unrecognised formula, no points awarded",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoringConfig;

    #[test]
    fn test_disabled() {
        assert_eq!(
            describe_rules(&ScoringRules::default()),
            vec!["Scoring system disabled"]
        );
    }

    #[test]
    fn test_full_description_order() {
        let rules = ScoringConfig {
            enabled: Some(true),
            use_ranking_multiplier: Some(true),
            ranking_formula: Some(RankingFormula::Bracket),
            bonus_for_upset: Some(5),
            lose_penalty_enabled: Some(true),
            use_lose_penalty_multiplier: Some(true),
            penalty_for_loss: Some(1),
            custom_formula: Some("currentPoints + 1".to_string()),
            placement_points_enabled: Some(true),
            placement_points_formula: Some(PlacementFormula::Fixed),
            ..Default::default()
        }
        .resolve();

        let lines = describe_rules(&rules);
        assert_eq!(
            lines,
            vec![
                "Base points per win: 10",
                "Ranking multiplier: bracket (steps at 10, 25 and 50 ranking places)",
                "Upset bonus: +5 points",
                "Loss penalty: -3 points (scaled by the bracket curve)",
                "Extra penalty when the favourite wins: -1 points",
                "Custom formula: currentPoints + 1",
                "Placement points: fixed per elimination round",
                "Champion 50 / runner-up 30 / semifinalist 20 / quarterfinalist 10",
            ]
        );
    }

    #[test]
    fn test_minimal_enabled() {
        let rules = ScoringConfig {
            enabled: Some(true),
            ..Default::default()
        }
        .resolve();
        assert_eq!(describe_rules(&rules), vec!["Base points per win: 10"]);
    }
}
