//! JournalTemplate configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::stoic::{DAYS_IN_CYCLE, DEFAULT_CATCHUP_RATE};
use crate::wordcount::DEFAULT_WORDCOUNT_GOAL;

const APP_NAME: &str = "journaltemplate";

/// Main JournalTemplate configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[serde(rename = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Word count goal settings
    pub wordcount: WordcountConfig,

    /// Stoic prompt settings
    pub stoic: StoicConfig,
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        if self.stoic.catchup_rate == 0 {
            return Err(eyre::eyre!("stoic.catchup-rate must be at least 1"));
        }
        if self.stoic.catchup_rate > DAYS_IN_CYCLE {
            return Err(eyre::eyre!(
                "stoic.catchup-rate must be at most {} (one full cycle)",
                DAYS_IN_CYCLE
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .journaltemplate.yml
        let local_config = PathBuf::from(format!(".{}.yml", APP_NAME));
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/journaltemplate/journaltemplate.yml
        if let Some(user_config) = user_config_path()
            && user_config.exists()
        {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are swallowed; the full load reports them once logging works.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = [
            config_path.cloned(),
            Some(PathBuf::from(format!(".{}.yml", APP_NAME))),
            user_config_path(),
        ];
        candidates
            .into_iter()
            .flatten()
            .find(|p| p.exists())
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_yaml::from_str::<Config>(&content).ok())
            .and_then(|config| config.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join(format!("{}.yml", APP_NAME)))
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_NAME)
}

/// Word count goal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WordcountConfig {
    /// Words to write on top of the template's own count
    pub goal: usize,
}

impl Default for WordcountConfig {
    fn default() -> Self {
        Self {
            goal: DEFAULT_WORDCOUNT_GOAL,
        }
    }
}

/// Stoic prompt configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoicConfig {
    /// CSV with Day, Date and Question columns
    #[serde(rename = "prompts-file")]
    pub prompts_file: PathBuf,

    /// JSON snapshot of the cursor
    #[serde(rename = "progress-file")]
    pub progress_file: PathBuf,

    /// Prompts shown per run while behind
    #[serde(rename = "catchup-rate")]
    pub catchup_rate: u32,
}

impl Default for StoicConfig {
    fn default() -> Self {
        Self {
            prompts_file: data_dir().join("stoics.csv"),
            progress_file: data_dir().join("stoic_progress.json"),
            catchup_rate: DEFAULT_CATCHUP_RATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.wordcount.goal, 750);
        assert_eq!(config.stoic.catchup_rate, 2);
        assert!(config.stoic.prompts_file.ends_with("journaltemplate/stoics.csv"));
        assert!(config.stoic.progress_file.ends_with("journaltemplate/stoic_progress.json"));
        assert!(config.log_level.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
stoic:
  catchup-rate: 5
  prompts-file: /data/stoics.csv
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.stoic.catchup_rate, 5);
        assert_eq!(config.stoic.prompts_file, PathBuf::from("/data/stoics.csv"));
        assert!(config.stoic.progress_file.ends_with("stoic_progress.json"));
        assert_eq!(config.wordcount.goal, 750);
    }

    #[test]
    fn test_validate_rejects_zero_catchup() {
        let mut config = Config::default();
        config.stoic.catchup_rate = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_catchup_to_one_cycle() {
        let mut config = Config::default();
        config.stoic.catchup_rate = 366;
        assert!(config.validate().is_ok());

        config.stoic.catchup_rate = 367;
        assert!(config.validate().is_err());

        config.stoic.catchup_rate = u32::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("jt.yml");
        fs::write(&path, "log-level: debug\nwordcount:\n  goal: 500\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.wordcount.goal, 500);
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("debug"));
    }

    #[test]
    fn test_load_explicit_path_missing_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.yml");
        assert!(Config::load(Some(&path)).is_err());
    }
}
