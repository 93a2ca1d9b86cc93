use std::io::IsTerminal;
use owo_colors::OwoColorize;

use crate::scoring::{PlacementResult, ScoringResult};
use crate::standings::Standings;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a signed delta with an explicit sign ("+12", "-3", "0")
pub fn format_delta(delta: i64) -> String {
    if delta > 0 {
        format!("+{}", delta)
    } else {
        delta.to_string()
    }
}

fn colored_delta(delta: i64, use_colors: bool) -> String {
    let text = format_delta(delta);
    if !use_colors {
        return text;
    }
    if delta > 0 {
        text.green().to_string()
    } else if delta < 0 {
        text.red().to_string()
    } else {
        text.dimmed().to_string()
    }
}

fn format_explanation(lines: &[String], use_colors: bool) -> String {
    lines
        .iter()
        .map(|line| {
            if use_colors {
                format!("  {} {}", "·".dimmed(), line)
            } else {
                format!("  - {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Match result as a short summary followed by the explanation trail
pub fn format_match_result(result: &ScoringResult, use_colors: bool) -> String {
    let winner_label = if use_colors {
        "Winner".bold().to_string()
    } else {
        "Winner".to_string()
    };
    let loser_label = if use_colors {
        "Loser".bold().to_string()
    } else {
        "Loser".to_string()
    };

    format!(
        "{} {}  {} {}\n{}",
        winner_label,
        colored_delta(result.winner_points, use_colors),
        loser_label,
        colored_delta(result.loser_points, use_colors),
        format_explanation(&result.explanation, use_colors)
    )
}

pub fn format_placement_result(result: &PlacementResult, use_colors: bool) -> String {
    let athlete = if use_colors {
        result.athlete_id.yellow().to_string()
    } else {
        result.athlete_id.clone()
    };

    format!(
        "{} #{} {}\n{}",
        athlete,
        result.placement,
        colored_delta(result.placement_points, use_colors),
        format_explanation(&result.explanation, use_colors)
    )
}

/// Ranking table: "  1. athlete    120 pts  (W 5 / L 2)"
pub fn format_standings(standings: &Standings, use_colors: bool) -> String {
    let rows = standings.ranked();
    if rows.is_empty() {
        return "No athletes ranked yet.".to_string();
    }

    let id_width = rows
        .iter()
        .map(|r| r.athlete_id.chars().count())
        .max()
        .unwrap_or(0);

    rows.iter()
        .map(|row| {
            let id = format!("{:<width$}", row.athlete_id, width = id_width);
            let points = format!("{:>6} pts", row.standing.points);
            let record = format!(
                "(W {} / L {})",
                row.standing.matches_won, row.standing.matches_lost
            );
            if use_colors {
                format!(
                    "{:>3}. {}  {}  {}",
                    row.ranking,
                    id.yellow(),
                    points.bold(),
                    record.dimmed()
                )
            } else {
                format!("{:>3}. {}  {}  {}", row.ranking, id, points, record)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Numbered list, used for rule descriptions and validation errors
pub fn format_lines(lines: &[String]) -> String {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>2}. {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(12), "+12");
        assert_eq!(format_delta(-3), "-3");
        assert_eq!(format_delta(0), "0");
    }

    #[test]
    fn test_format_match_result_plain() {
        let result = ScoringResult {
            winner_points: 25,
            loser_points: -3,
            bonus_points: 5,
            penalty_points: 3,
            total_points: 25,
            explanation: vec!["Base points: 10".to_string(), "Winner total: 25".to_string()],
        };
        assert_eq!(
            format_match_result(&result, false),
            "Winner +25  Loser -3\n  - Base points: 10\n  - Winner total: 25"
        );
    }

    #[test]
    fn test_format_placement_result_plain() {
        let result = PlacementResult {
            athlete_id: "ana".to_string(),
            placement: 1,
            placement_points: 50,
            explanation: vec!["Placement #1: 50 points".to_string()],
        };
        assert_eq!(
            format_placement_result(&result, false),
            "ana #1 +50\n  - Placement #1: 50 points"
        );
    }

    #[test]
    fn test_format_empty_standings() {
        assert_eq!(
            format_standings(&Standings::new(), false),
            "No athletes ranked yet."
        );
    }

    #[test]
    fn test_format_standings_plain() {
        let mut standings = Standings::new();
        standings.apply_match(
            "ana",
            "bo",
            &ScoringResult {
                winner_points: 10,
                loser_points: 0,
                bonus_points: 0,
                penalty_points: 0,
                total_points: 10,
                explanation: vec![],
            },
        );
        assert_eq!(
            format_standings(&standings, false),
            "  1. ana      10 pts  (W 1 / L 0)\n  2. bo        0 pts  (W 0 / L 1)"
        );
    }

    #[test]
    fn test_format_lines() {
        let lines = vec!["a".to_string(), "b".to_string()];
        assert_eq!(format_lines(&lines), " 1. a\n 2. b");
    }
}
