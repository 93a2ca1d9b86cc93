mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/rally-score/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("rally-score"))
}

/// Get the default config file path (~/.config/rally-score/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML or JSON file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/rally-score/config.yaml)
///
/// Files ending in `.json` are parsed as JSON (the format tournament records
/// store their scoring blob in); anything else is parsed as YAML.
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read
/// - The contents cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Create ~/.config/rally-score/config.yaml",
            config_path.display()
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    parse_config(&config_content, &config_path)
}

fn parse_config(content: &str, path: &Path) -> Result<Config> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(content)
            .with_context(|| format!("Failed to parse config: invalid JSON in {}", path.display()))
    } else {
        serde_saphyr::from_str(content)
            .with_context(|| format!("Failed to parse config: invalid YAML in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::RankingFormula;

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
tournament: Copa Regional
scoring:
  enabled: true
  basePoints: 12
  rankingFormula: exponential
"#;
        let config = parse_config(yaml, Path::new("config.yaml")).unwrap();
        assert_eq!(config.tournament.as_deref(), Some("Copa Regional"));
        assert_eq!(config.scoring.base_points, Some(12));
        assert_eq!(config.scoring.ranking_formula, Some(RankingFormula::Exponential));
        assert!(config.standings.is_none());
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{"scoring": {"enabled": true, "customFormula": "currentPoints + 1"}}"#;
        let config = parse_config(json, Path::new("rules.JSON")).unwrap();
        assert_eq!(config.scoring.enabled, Some(true));
        assert_eq!(
            config.scoring.custom_formula.as_deref(),
            Some("currentPoints + 1")
        );
    }

    #[test]
    fn test_missing_scoring_section_uses_defaults() {
        let config = parse_config("tournament: Open", Path::new("c.yml")).unwrap();
        assert_eq!(config.scoring, Default::default());
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        let err = parse_config("scorng: {}", Path::new("c.yaml")).unwrap_err();
        assert!(err.to_string().contains("invalid YAML"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(dir.path().join("config.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
