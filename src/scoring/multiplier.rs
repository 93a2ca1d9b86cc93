use super::config::RankingFormula;

impl RankingFormula {
    /// Multiplier applied to base points for a given ranking gap.
    ///
    /// `is_upset` selects the reward branch (worse-ranked player won) over the
    /// damping branch. A zero gap is always neutral.
    pub fn multiplier(&self, ranking_difference: i64, is_upset: bool) -> f64 {
        if ranking_difference == 0 {
            return 1.0;
        }
        let diff = ranking_difference.unsigned_abs() as f64;

        match (self, is_upset) {
            (RankingFormula::Linear, true) => 1.0 + diff * 0.01,
            (RankingFormula::Linear, false) => (1.0 - diff * 0.005).max(0.5),
            (RankingFormula::Exponential, true) => 1.0 + (diff / 100.0).powf(1.5),
            (RankingFormula::Exponential, false) => (1.0 - (diff / 200.0).powf(1.2)).max(0.3),
            (RankingFormula::Bracket, true) => bracket_step(diff, [2.0, 1.5, 1.25, 1.1]),
            (RankingFormula::Bracket, false) => bracket_step(diff, [0.5, 0.7, 0.85, 0.95]),
            (RankingFormula::Unknown, _) => 1.0,
        }
    }
}

/// Stepped thresholds: >50, >25, >10, otherwise.
fn bracket_step(diff: f64, steps: [f64; 4]) -> f64 {
    if diff > 50.0 {
        steps[0]
    } else if diff > 25.0 {
        steps[1]
    } else if diff > 10.0 {
        steps[2]
    } else {
        steps[3]
    }
}

/// Round half away from zero, the way point totals are rounded everywhere.
pub fn round_points(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [RankingFormula; 4] = [
        RankingFormula::Linear,
        RankingFormula::Exponential,
        RankingFormula::Bracket,
        RankingFormula::Unknown,
    ];

    #[test]
    fn test_zero_difference_is_neutral() {
        for formula in ALL {
            assert_eq!(formula.multiplier(0, true), 1.0);
            assert_eq!(formula.multiplier(0, false), 1.0);
        }
    }

    #[test]
    fn test_linear() {
        assert!((RankingFormula::Linear.multiplier(50, true) - 1.5).abs() < 1e-9);
        assert!((RankingFormula::Linear.multiplier(50, false) - 0.75).abs() < 1e-9);
        // Floor at 0.5
        assert_eq!(RankingFormula::Linear.multiplier(500, false), 0.5);
    }

    #[test]
    fn test_exponential() {
        // (100/100)^1.5 = 1
        assert!((RankingFormula::Exponential.multiplier(100, true) - 2.0).abs() < 1e-9);
        // 1 - (200/200)^1.2 = 0, floored to 0.3
        assert_eq!(RankingFormula::Exponential.multiplier(200, false), 0.3);
        let m = RankingFormula::Exponential.multiplier(50, false);
        assert!(m < 1.0 && m > 0.3);
    }

    #[test]
    fn test_bracket_thresholds() {
        let f = RankingFormula::Bracket;
        assert_eq!(f.multiplier(180, true), 2.0);
        assert_eq!(f.multiplier(51, true), 2.0);
        assert_eq!(f.multiplier(50, true), 1.5);
        assert_eq!(f.multiplier(26, true), 1.5);
        assert_eq!(f.multiplier(25, true), 1.25);
        assert_eq!(f.multiplier(11, true), 1.25);
        assert_eq!(f.multiplier(10, true), 1.1);
        assert_eq!(f.multiplier(1, true), 1.1);

        assert_eq!(f.multiplier(51, false), 0.5);
        assert_eq!(f.multiplier(26, false), 0.7);
        assert_eq!(f.multiplier(11, false), 0.85);
        assert_eq!(f.multiplier(3, false), 0.95);
    }

    #[test]
    fn test_unknown_is_neutral() {
        assert_eq!(RankingFormula::Unknown.multiplier(80, true), 1.0);
        assert_eq!(RankingFormula::Unknown.multiplier(80, false), 1.0);
    }

    #[test]
    fn test_round_points_half_away_from_zero() {
        assert_eq!(round_points(2.5), 3);
        assert_eq!(round_points(-2.5), -3);
        assert_eq!(round_points(12.4), 12);
    }
}
