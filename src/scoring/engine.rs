use serde::Serialize;
use tracing::{debug, warn};

use super::config::{PlacementFormula, ScoringConfig, ScoringRules};
use super::formula::{Formula, FormulaError, FormulaVariables};
use super::multiplier::round_points;

/// Derived facts about one match, computed fresh per calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringContext {
    pub winner_ranking: i64,
    pub loser_ranking: i64,
    pub base_points: i64,
    /// Display only, e.g. "3-1"
    pub set_score: String,
    /// Winner held the numerically larger (weaker) ranking
    pub is_upset: bool,
    pub ranking_difference: i64,
}

impl ScoringContext {
    pub fn new(set_score: &str, winner_ranking: i64, loser_ranking: i64, base_points: i64) -> Self {
        Self {
            winner_ranking,
            loser_ranking,
            base_points,
            set_score: set_score.to_string(),
            is_upset: winner_ranking > loser_ranking,
            ranking_difference: i64::try_from(winner_ranking.abs_diff(loser_ranking))
                .unwrap_or(i64::MAX),
        }
    }

    /// The match seen from the loser's side: rankings swapped, and `is_upset`
    /// set when the loser was the better-ranked player. Feeding this to a
    /// multiplier curve makes a favourite's loss cost more and an underdog's
    /// loss cost less.
    pub fn inverted(&self) -> Self {
        Self {
            winner_ranking: self.loser_ranking,
            loser_ranking: self.winner_ranking,
            base_points: self.base_points,
            set_score: self.set_score.clone(),
            is_upset: self.loser_ranking < self.winner_ranking,
            ranking_difference: self.ranking_difference,
        }
    }

    fn formula_variables(&self, current_points: f64) -> FormulaVariables {
        FormulaVariables {
            base_points: self.base_points as f64,
            winner_ranking: self.winner_ranking as f64,
            loser_ranking: self.loser_ranking as f64,
            ranking_difference: self.ranking_difference as f64,
            is_upset: self.is_upset,
            current_points,
        }
    }
}

/// Point deltas for one match.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    /// Never negative
    pub winner_points: i64,
    /// Signed delta for the loser, not clamped
    pub loser_points: i64,
    pub bonus_points: i64,
    /// Magnitude of a negative loser delta
    pub penalty_points: i64,
    /// Same as `winner_points`
    pub total_points: i64,
    pub explanation: Vec<String>,
}

impl ScoringResult {
    fn disabled() -> Self {
        Self {
            winner_points: 0,
            loser_points: 0,
            bonus_points: 0,
            penalty_points: 0,
            total_points: 0,
            explanation: vec!["Scoring system not enabled".to_string()],
        }
    }
}

/// End-of-tournament bonus for one athlete.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementResult {
    pub athlete_id: String,
    /// 1 = champion
    pub placement: u32,
    pub placement_points: i64,
    pub explanation: Vec<String>,
}

/// Output of one calculation step: the new running value and the trail lines
/// the step produced.
struct Step {
    points: f64,
    notes: Vec<String>,
}

impl Step {
    fn unchanged(points: f64) -> Self {
        Self {
            points,
            notes: Vec::new(),
        }
    }
}

/// Stateless calculator over one tournament's scoring rules.
///
/// The custom formula is parsed once here; every calculation reuses it. A
/// formula that fails to parse is kept as an error and reported in each
/// match explanation instead of aborting.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    rules: ScoringRules,
    formula: Option<Result<Formula, FormulaError>>,
}

impl ScoringEngine {
    pub fn new(config: &ScoringConfig) -> Self {
        Self::from_rules(config.resolve())
    }

    pub fn from_rules(rules: ScoringRules) -> Self {
        let formula = rules.custom_formula.as_deref().map(Formula::parse);
        if let Some(Err(ref e)) = formula {
            warn!(error = %e, "custom scoring formula does not parse");
        }
        Self { rules, formula }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Winner and loser point deltas for a finished match.
    ///
    /// Rankings follow the usual convention: smaller is better, #1 is the top
    /// player. No bounds are enforced on them.
    pub fn calculate_points(
        &self,
        match_score: &str,
        winner_ranking: i64,
        loser_ranking: i64,
    ) -> ScoringResult {
        if !self.rules.enabled {
            return ScoringResult::disabled();
        }

        let ctx = ScoringContext::new(
            match_score,
            winner_ranking,
            loser_ranking,
            self.rules.base_points,
        );

        let base = self.base_step(&ctx);
        let multiplied = self.ranking_multiplier_step(&ctx, base.points);
        let bonus = self.upset_bonus_step(&ctx, multiplied.points);
        let bonus_points = round_points(bonus.points - multiplied.points);
        let penalty = self.loser_penalty_step(&ctx);
        let formula = self.custom_formula_step(&ctx, bonus.points);

        let winner_points = round_points(formula.points).max(0);
        let loser_points = round_points(penalty.points);

        let mut totals = vec![format!("Winner total: {}", winner_points)];
        if self.rules.lose_penalty_enabled {
            totals.push(format!("Loser delta: {}", loser_points));
        }

        let explanation = [
            base.notes,
            multiplied.notes,
            bonus.notes,
            penalty.notes,
            formula.notes,
            totals,
        ]
        .concat();

        debug!(
            winner_ranking,
            loser_ranking,
            is_upset = ctx.is_upset,
            winner_points,
            loser_points,
            "calculated match points"
        );

        ScoringResult {
            winner_points,
            loser_points,
            bonus_points,
            penalty_points: loser_points.min(0).saturating_abs(),
            total_points: winner_points,
            explanation,
        }
    }

    fn base_step(&self, ctx: &ScoringContext) -> Step {
        let note = if ctx.set_score.trim().is_empty() {
            format!("Base points: {}", ctx.base_points)
        } else {
            format!("Base points: {} (score {})", ctx.base_points, ctx.set_score.trim())
        };
        Step {
            points: ctx.base_points as f64,
            notes: vec![note],
        }
    }

    fn ranking_multiplier_step(&self, ctx: &ScoringContext, points: f64) -> Step {
        if !self.rules.use_ranking_multiplier {
            return Step::unchanged(points);
        }
        let formula = self.rules.ranking_formula;
        let multiplier = formula.multiplier(ctx.ranking_difference, ctx.is_upset);
        if multiplier == 1.0 {
            return Step::unchanged(points);
        }
        let adjusted = round_points(points * multiplier) as f64;
        Step {
            points: adjusted,
            notes: vec![format!(
                "Ranking multiplier ({}): x{:.2} -> {}",
                formula, multiplier, adjusted
            )],
        }
    }

    fn upset_bonus_step(&self, ctx: &ScoringContext, points: f64) -> Step {
        let bonus = self.rules.bonus_for_upset;
        if !ctx.is_upset || bonus <= 0 {
            return Step::unchanged(points);
        }
        Step {
            points: points + bonus as f64,
            notes: vec![format!(
                "Upset bonus: +{} (#{} beat #{})",
                bonus, ctx.winner_ranking, ctx.loser_ranking
            )],
        }
    }

    /// Loser delta, starting from zero. Only ever negative or zero.
    fn loser_penalty_step(&self, ctx: &ScoringContext) -> Step {
        if !self.rules.lose_penalty_enabled {
            return Step::unchanged(0.0);
        }

        let mut penalty = self.rules.lose_penalty_points;
        let mut notes = vec![format!("Loss penalty: -{}", penalty)];

        if self.rules.use_lose_penalty_multiplier {
            let formula = self.rules.ranking_formula;
            let from_loser = ctx.inverted();
            let multiplier = formula.multiplier(from_loser.ranking_difference, from_loser.is_upset);
            if multiplier != 1.0 {
                // Rounds the magnitude, so 3 x 1.5 costs 5, not 4
                penalty = round_points(penalty as f64 * multiplier);
                notes.push(format!(
                    "Loss penalty multiplier ({}): x{:.2} -> -{}",
                    formula, multiplier, penalty
                ));
            }
        }

        let flat = self.rules.penalty_for_loss;
        if !ctx.is_upset && flat > 0 {
            penalty = penalty.saturating_add(flat);
            notes.push(format!("Favourite-win penalty: -{}", flat));
        }

        Step {
            points: -(penalty as f64),
            notes,
        }
    }

    fn custom_formula_step(&self, ctx: &ScoringContext, points: f64) -> Step {
        let formula = match &self.formula {
            None => return Step::unchanged(points),
            Some(Ok(formula)) => formula,
            Some(Err(e)) => {
                return Step {
                    points,
                    notes: vec![format!("Custom formula error: {}", e)],
                }
            }
        };

        match formula.eval(&ctx.formula_variables(points)) {
            Ok(value) if value != points => Step {
                points: value,
                notes: vec![format!("Custom formula: {} -> {}", points, value)],
            },
            Ok(_) => Step::unchanged(points),
            Err(e) => {
                warn!(
                    formula = formula.source(),
                    error = %e,
                    "custom formula failed, keeping pre-formula total"
                );
                Step {
                    points,
                    notes: vec![format!("Custom formula error: {}", e)],
                }
            }
        }
    }

    /// Placement bonus for an athlete's final standing.
    pub fn calculate_placement_points(
        &self,
        athlete_id: &str,
        placement: u32,
        total_participants: u32,
        tournament_format: &str,
    ) -> PlacementResult {
        if !self.rules.enabled || !self.rules.placement_points_enabled {
            return PlacementResult {
                athlete_id: athlete_id.to_string(),
                placement,
                placement_points: 0,
                explanation: vec!["Placement points not enabled".to_string()],
            };
        }

        let mut explanation = Vec::new();
        if !tournament_format.trim().is_empty() {
            explanation.push(format!("Format: {}", tournament_format.trim()));
        }

        let formula = self.rules.placement_points_formula;
        let (points, notes) = match formula {
            PlacementFormula::Dynamic => self.dynamic_placement(placement, total_participants),
            PlacementFormula::Fixed => self.fixed_placement(placement),
            PlacementFormula::Percentage => {
                self.percentage_placement(placement, total_participants)
            }
            PlacementFormula::Unknown => (
                0,
                vec!["Unknown placement formula, no points awarded".to_string()],
            ),
        };
        let placement_points = points.max(0);

        if formula != PlacementFormula::Unknown {
            explanation.push(format!("Formula: {}", formula));
        }
        explanation.extend(notes);
        explanation.push(format!(
            "Placement #{}: {} points",
            placement, placement_points
        ));

        debug!(
            athlete_id,
            placement,
            total_participants,
            placement_points,
            "calculated placement points"
        );

        PlacementResult {
            athlete_id: athlete_id.to_string(),
            placement,
            placement_points,
            explanation,
        }
    }

    fn tier_points(&self, tier: Tier) -> Option<i64> {
        match tier {
            Tier::Champion => Some(self.rules.champion_points),
            Tier::RunnerUp => Some(self.rules.runner_up_points),
            Tier::Semifinalist => Some(self.rules.semifinalist_points),
            Tier::Quarterfinalist => Some(self.rules.quarterfinalist_points),
            Tier::RoundOf16 | Tier::RoundOf32 | Tier::Field => None,
        }
    }

    /// Tier value scaled by log2(field size) / 4, so a 16-player draw pays
    /// face value and bigger draws pay more.
    fn dynamic_placement(&self, placement: u32, total: u32) -> (i64, Vec<String>) {
        let Some(tier) = Tier::for_placement(placement) else {
            return (0, vec!["No tier for placement 0".to_string()]);
        };
        let size_factor = if total > 0 {
            f64::from(total).log2() / 4.0
        } else {
            0.0
        };
        let base = match tier {
            Tier::RoundOf16 => 8.0,
            Tier::RoundOf32 => 5.0,
            Tier::Field => 3.0 * relative_position(placement, total),
            _ => self.tier_points(tier).unwrap_or(0) as f64,
        };
        let points = round_points(base * size_factor);
        (
            points,
            vec![format!(
                "Tier base {} x size factor {:.2} ({} participants)",
                format_base(base),
                size_factor,
                total
            )],
        )
    }

    fn fixed_placement(&self, placement: u32) -> (i64, Vec<String>) {
        let Some(tier) = Tier::for_placement(placement) else {
            return (0, vec!["No tier for placement 0".to_string()]);
        };
        let points = self
            .tier_points(tier)
            .unwrap_or_else(|| (5 - i64::from(placement / 4)).max(0));
        (points, vec![format!("Tier: {}", tier.label())])
    }

    fn percentage_placement(&self, placement: u32, total: u32) -> (i64, Vec<String>) {
        let share = relative_position(placement, total);
        let points = round_points(self.rules.champion_points as f64 * share);
        (
            points,
            vec![format!("Percentage: {:.1}% of champion points", share * 100.0)],
        )
    }
}

/// Share of the field finishing at or below this placement.
fn relative_position(placement: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (f64::from(total) - f64::from(placement) + 1.0) / f64::from(total)
}

fn format_base(base: f64) -> String {
    if base.fract() == 0.0 {
        format!("{}", base)
    } else {
        format!("{:.2}", base)
    }
}

/// Elimination tiers. Both losing semifinalists share a tier: there is no
/// third-place match in table tennis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Champion,
    RunnerUp,
    Semifinalist,
    Quarterfinalist,
    RoundOf16,
    RoundOf32,
    Field,
}

impl Tier {
    fn for_placement(placement: u32) -> Option<Self> {
        match placement {
            0 => None,
            1 => Some(Tier::Champion),
            2 => Some(Tier::RunnerUp),
            3..=4 => Some(Tier::Semifinalist),
            5..=8 => Some(Tier::Quarterfinalist),
            9..=16 => Some(Tier::RoundOf16),
            17..=32 => Some(Tier::RoundOf32),
            _ => Some(Tier::Field),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Tier::Champion => "champion",
            Tier::RunnerUp => "runner-up",
            Tier::Semifinalist => "semifinalist",
            Tier::Quarterfinalist => "quarterfinalist",
            Tier::RoundOf16 => "round of 16",
            Tier::RoundOf32 => "round of 32",
            Tier::Field => "field",
        }
    }
}
