use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::ScoringConfig;

#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Display name of the tournament these rules belong to
    pub tournament: Option<String>,

    /// Scoring rules, in the same shape as the tournament record blob
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Standings file (defaults to ~/.config/rally-score/standings.json)
    pub standings: Option<PathBuf>,
}
