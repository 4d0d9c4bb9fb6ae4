//! Match configuration: one search configuration per agent.
//!
//! Loaded from a TOML file with `[first]` and `[second]` tables, each a
//! `SearchConfig`. Missing keys fall back to the tuned defaults, so an
//! empty file describes two default full-MCTS agents.

use anyhow::{Context, Result};
use clap::ValueEnum;
use mosaic_mcts::{SearchConfig, SearchMode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Both agents' settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub first: SearchConfig,
    pub second: SearchConfig,
}

/// Search mode as spelled on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Full,
    Light,
    Minimax,
}

impl From<ModeArg> for SearchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Full => SearchMode::MctsFull,
            ModeArg::Light => SearchMode::MctsLight,
            ModeArg::Minimax => SearchMode::Minimax,
        }
    }
}

/// Command-line overrides applied on top of the file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub first_mode: Option<ModeArg>,
    pub second_mode: Option<ModeArg>,
    pub time_limit_ms: Option<u64>,
    pub iterations: Option<u32>,
}

impl MatchConfig {
    /// Load from `path`, or use defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: MatchConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply command-line overrides. Time and iteration limits affect both agents.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(mode) = overrides.first_mode {
            self.first.mode = mode.into();
        }
        if let Some(mode) = overrides.second_mode {
            self.second.mode = mode.into();
        }
        for agent in [&mut self.first, &mut self.second] {
            if let Some(ms) = overrides.time_limit_ms {
                agent.time_limit = Duration::from_millis(ms);
            }
            if let Some(iterations) = overrides.iterations {
                agent.max_iterations = Some(iterations);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.first.validate().context("invalid [first] agent")?;
        self.second.validate().context("invalid [second] agent")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_mcts::{BanditPolicy, QFunction, RolloutPolicy};

    #[test]
    fn test_empty_file_is_default() {
        let config = MatchConfig::from_toml("").unwrap();
        assert_eq!(config, MatchConfig::default());
    }

    #[test]
    fn test_partial_tables() {
        let toml_content = r#"
[first]
mode = "mcts_light"
time_limit = 0.5
rollout_policy = "random"

[second]
mode = "minimax"
secondary_q = "average"

[second.bandit]
kind = "epsilon_greedy"
epsilon = 0.1
"#;
        let config = MatchConfig::from_toml(toml_content).unwrap();

        assert_eq!(config.first.mode, SearchMode::MctsLight);
        assert_eq!(config.first.time_limit, Duration::from_millis(500));
        assert_eq!(config.first.rollout_policy, RolloutPolicy::Random);
        assert_eq!(config.first.primary_q, QFunction::Average);

        assert_eq!(config.second.mode, SearchMode::Minimax);
        assert_eq!(config.second.secondary_q, Some(QFunction::Average));
        assert_eq!(config.second.bandit, BanditPolicy::epsilon_greedy(0.1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = MatchConfig::default();
        config.second = SearchConfig::light();
        let text = config.to_toml().unwrap();
        assert_eq!(MatchConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_overrides() {
        let mut config = MatchConfig::default();
        config.apply(&Overrides {
            first_mode: Some(ModeArg::Minimax),
            second_mode: None,
            time_limit_ms: Some(250),
            iterations: Some(40),
        });
        assert_eq!(config.first.mode, SearchMode::Minimax);
        assert_eq!(config.second.mode, SearchMode::MctsFull);
        assert_eq!(config.second.time_limit, Duration::from_millis(250));
        assert_eq!(config.first.max_iterations, Some(40));
    }

    #[test]
    fn test_invalid_agent_reported() {
        let config = MatchConfig::from_toml("[second]\ndiscount_factor = 1.5\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[second]"));
    }
}
