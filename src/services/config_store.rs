// Configuration Storage Service
// Handles config file read/write, version backup and environment overrides

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to create config dir: {0}")]
    CreateDir(std::io::Error),
    #[error("Failed to read config: {0}")]
    Read(std::io::Error),
    #[error("Failed to write config: {0}")]
    Write(std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
    #[serde(default)]
    pub paraphrase: ParaphraseConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// Tunables of synonym selection and rewriting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParaphraseConfig {
    pub base_swap_rate: f64,
    pub fluent_swap_rate: f64,
    pub min_content_word_chars: usize,
    pub synset_limit: usize,
    /// Standard/Fluent strict mode: max extra characters over the original word.
    pub casual_max_extra_chars: usize,
    /// Formal strict mode: minimum candidate length.
    pub formal_min_chars: usize,
    pub document_variance: f64,
    pub variant_variance: f64,
    pub variant_attempts: usize,
    pub max_variants: usize,
    pub synonym_suggestion_limit: usize,
}

impl Default for ParaphraseConfig {
    fn default() -> Self {
        Self {
            base_swap_rate: 0.4,
            fluent_swap_rate: 0.5,
            min_content_word_chars: 3,
            synset_limit: 3,
            casual_max_extra_chars: 5,
            formal_min_chars: 4,
            document_variance: 1.5,
            variant_variance: 1.8,
            variant_attempts: 5,
            max_variants: 3,
            synonym_suggestion_limit: 6,
        }
    }
}

/// Thresholds of the risk policy and guards around external scoring calls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskConfig {
    pub ai_high_threshold: f64,
    pub sentence_medium_threshold: f64,
    pub modern_perplexity: f64,
    pub edit_perplexity: f64,
    pub modern_confidence: f64,
    pub edit_confidence: f64,
    pub min_sentence_chars: usize,
    pub duplicate_min_chars: usize,
    pub call_timeout_secs: u64,
    pub max_concurrency: usize,
    pub machine_labels: Vec<String>,
    pub human_labels: Vec<String>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            ai_high_threshold: 80.0,
            sentence_medium_threshold: 50.0,
            modern_perplexity: 25.0,
            edit_perplexity: 45.0,
            modern_confidence: 88.5,
            edit_confidence: 65.0,
            min_sentence_chars: 5,
            duplicate_min_chars: 30,
            call_timeout_secs: 30,
            max_concurrency: 4,
            machine_labels: vec!["Fake".to_string(), "LABEL_0".to_string()],
            human_labels: vec!["Real".to_string(), "LABEL_1".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProvidersConfig {
    pub classifier_url: Option<String>,
    pub perplexity_url: Option<String>,
    pub search_url: Option<String>,
    pub api_key: Option<String>,
    pub search_api_key: Option<String>,
}

fn env_non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Environment variables win over values from the file
    pub fn apply_env_overrides(mut self) -> Self {
        if let Some(path) = env_non_empty("INTEGRITY_LEXICON") {
            self.lexicon_path = Some(PathBuf::from(path));
        }
        let p = &mut self.providers;
        if let Some(v) = env_non_empty("INTEGRITY_CLASSIFIER_URL") {
            p.classifier_url = Some(v);
        }
        if let Some(v) = env_non_empty("INTEGRITY_PERPLEXITY_URL") {
            p.perplexity_url = Some(v);
        }
        if let Some(v) = env_non_empty("INTEGRITY_SEARCH_URL") {
            p.search_url = Some(v);
        }
        if let Some(v) = env_non_empty("INTEGRITY_API_KEY") {
            p.api_key = Some(v);
        }
        if let Some(v) = env_non_empty("INTEGRITY_SEARCH_API_KEY") {
            p.search_api_key = Some(v);
        }
        self
    }
}

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("integrityAI"))
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.config_dir).map_err(ConfigError::CreateDir)
    }

    /// Load configuration from file, defaults when absent
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file).map_err(ConfigError::Read)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.ensure_dir()?;

        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_file, content).map_err(ConfigError::Write)
    }

    fn create_backup(&self) -> Result<(), ConfigError> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir).map_err(ConfigError::CreateDir)?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file).map_err(ConfigError::Write)?;

        self.cleanup_old_backups(&backup_dir, 10)
    }

    /// Remove old backups, keeping only the most recent N
    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) -> Result<(), ConfigError> {
        let mut entries: Vec<_> = fs::read_dir(backup_dir)
            .map_err(ConfigError::Read)?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        // File names embed the timestamp, so name order is age order.
        entries.sort_by_key(|e| e.file_name());

        for entry in entries.iter().take(entries.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("integrity_cfg_{}_{}", tag, uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.paraphrase.synset_limit, 3);
        assert_eq!(config.risk.modern_confidence, 88.5);
        assert_eq!(config.risk.machine_labels, vec!["Fake", "LABEL_0"]);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{"version":"1.0.0","paraphrase":{"formalMinChars":6},"risk":{"callTimeoutSecs":5}}"#;
        let parsed: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.version, "1.0.0");
        assert_eq!(parsed.paraphrase.formal_min_chars, 6);
        assert_eq!(parsed.paraphrase.casual_max_extra_chars, 5);
        assert_eq!(parsed.risk.call_timeout_secs, 5);
        assert_eq!(parsed.risk.edit_perplexity, 45.0);
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let store = ConfigStore::new(temp_dir("missing").join("nested"));
        let config = store.load().unwrap();
        assert_eq!(config.paraphrase.max_variants, 3);
    }

    #[test]
    fn test_save_then_load_keeps_backup() {
        let dir = temp_dir("save");
        let store = ConfigStore::new(dir.clone());
        let mut config = AppConfig::default();
        config.version = "1".to_string();
        store.save(&config).unwrap();
        config.version = "2".to_string();
        store.save(&config).unwrap();

        assert_eq!(store.load().unwrap().version, "2");
        let backups = fs::read_dir(dir.join("backups")).unwrap().count();
        assert_eq!(backups, 1);
        let _ = fs::remove_dir_all(dir);
    }
}
