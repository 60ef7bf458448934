// Label Normalization
// Maps the raw label strings of different classifier builds onto two classes.

use crate::services::config_store::RiskConfig;

use super::scoring::{RawClassification, ScoringError};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AuthorshipClass {
    Machine,
    Human,
}

#[derive(Debug, Clone)]
pub struct LabelNormalizer {
    machine: Vec<String>,
    human: Vec<String>,
}

impl LabelNormalizer {
    pub fn new<S: AsRef<str>>(machine: &[S], human: &[S]) -> Self {
        let lower = |labels: &[S]| -> Vec<String> {
            labels.iter().map(|l| l.as_ref().trim().to_lowercase()).collect()
        };
        Self {
            machine: lower(machine),
            human: lower(human),
        }
    }

    pub fn from_config(config: &RiskConfig) -> Self {
        Self::new(config.machine_labels.as_slice(), config.human_labels.as_slice())
    }

    pub fn class_of(&self, label: &str) -> Result<AuthorshipClass, ScoringError> {
        let key = label.trim().to_lowercase();
        if self.machine.contains(&key) {
            Ok(AuthorshipClass::Machine)
        } else if self.human.contains(&key) {
            Ok(AuthorshipClass::Human)
        } else {
            Err(ScoringError::UnrecognizedLabel(label.to_string()))
        }
    }

    /// AI probability percentage (0-100) implied by a raw classification
    pub fn ai_probability(&self, raw: &RawClassification) -> Result<f64, ScoringError> {
        let pct = raw.score.clamp(0.0, 1.0) * 100.0;
        Ok(match self.class_of(&raw.label)? {
            AuthorshipClass::Machine => pct,
            AuthorshipClass::Human => 100.0 - pct,
        })
    }
}

impl Default for LabelNormalizer {
    fn default() -> Self {
        Self::from_config(&RiskConfig::default())
    }
}
