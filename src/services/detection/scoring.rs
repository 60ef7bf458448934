// Scoring Collaborators
// Traits for the external classifier, perplexity model and exact-phrase search,
// plus the timeout guard every call goes through.

use crate::models::SearchHit;
use crate::services::providers::ProviderError;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Backend could not produce a usable answer. Always degraded, never surfaced.
#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("backend timed out after {0}s")]
    Timeout(u64),
    #[error("unrecognized classifier label: {0}")]
    UnrecognizedLabel(String),
    #[error("invalid perplexity value: {0}")]
    InvalidPerplexity(f64),
}

impl From<ProviderError> for ScoringError {
    fn from(err: ProviderError) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// Classifier output before label normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RawClassification {
    pub label: String,
    /// Probability of `label`, in [0, 1].
    pub score: f64,
}

#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<RawClassification, ScoringError>;
}

#[async_trait]
pub trait PerplexityModel: Send + Sync {
    /// Lower values mean more predictable text.
    async fn perplexity(&self, text: &str) -> Result<f64, ScoringError>;
}

#[async_trait]
pub trait ExactSearch: Send + Sync {
    async fn search_exact(&self, text: &str) -> Result<Option<SearchHit>, ScoringError>;
}

/// Bound an external call by `timeout_secs`
pub async fn guarded<T, F>(timeout_secs: u64, fut: F) -> Result<T, ScoringError>
where
    F: Future<Output = Result<T, ScoringError>>,
{
    match tokio::time::timeout(Duration::from_secs(timeout_secs), fut).await {
        Ok(res) => res,
        Err(_) => Err(ScoringError::Timeout(timeout_secs)),
    }
}
