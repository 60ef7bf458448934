// Scoring Provider Service
// HTTP clients for the hosted classifier, perplexity model and search API

use crate::models::SearchHit;
use crate::services::config_store::ProvidersConfig;
use crate::services::detection::scoring::{
    ExactSearch, PerplexityModel, RawClassification, ScoringError, TextClassifier,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Missing content in response")]
    MissingContent,
    #[error("{0} endpoint not configured")]
    MissingEndpoint(&'static str),
}

pub struct ProviderClient {
    client: Client,
    classifier_url: Option<String>,
    perplexity_url: Option<String>,
    search_url: Option<String>,
    api_key: Option<String>,
    search_api_key: Option<String>,
}

impl ProviderClient {
    pub fn new(config: &ProvidersConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            classifier_url: config.classifier_url.clone(),
            perplexity_url: config.perplexity_url.clone(),
            search_url: config.search_url.clone(),
            api_key: config.api_key.clone(),
            search_api_key: config.search_api_key.clone(),
        }
    }

    /// Both scoring endpoints are configured
    pub fn scoring_configured(&self) -> bool {
        self.classifier_url.is_some() && self.perplexity_url.is_some()
    }

    async fn post_json(
        &self,
        url: &str,
        api_key: Option<&str>,
        body: &Value,
    ) -> Result<Value, ProviderError> {
        let start = Instant::now();

        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body);
        if let Some(key) = api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let data: Value = response.json().await?;
        debug!(
            "[PROVIDER] POST {} ok latency_ms={}",
            url,
            start.elapsed().as_millis()
        );
        Ok(data)
    }

    pub async fn call_classifier(&self, text: &str) -> Result<RawClassification, ProviderError> {
        let url = self
            .classifier_url
            .as_deref()
            .ok_or(ProviderError::MissingEndpoint("classifier"))?;
        let data = self
            .post_json(url, self.api_key.as_deref(), &serde_json::json!({ "inputs": text }))
            .await?;
        parse_classification(&data).ok_or(ProviderError::MissingContent)
    }

    pub async fn call_perplexity(&self, text: &str) -> Result<f64, ProviderError> {
        let url = self
            .perplexity_url
            .as_deref()
            .ok_or(ProviderError::MissingEndpoint("perplexity"))?;
        let data = self
            .post_json(url, self.api_key.as_deref(), &serde_json::json!({ "text": text }))
            .await?;
        parse_perplexity(&data).ok_or(ProviderError::MissingContent)
    }

    pub async fn call_search(&self, text: &str) -> Result<Option<SearchHit>, ProviderError> {
        let url = self
            .search_url
            .as_deref()
            .ok_or(ProviderError::MissingEndpoint("search"))?;
        let query = format!("\"{}\"", text.trim());
        let data = self
            .post_json(url, self.search_api_key.as_deref(), &serde_json::json!({ "query": query }))
            .await?;
        Ok(parse_search_hit(&data))
    }
}

/// Accepts `{label, score}`, `[{label, score}, ...]` or `[[{label, score}, ...]]`
/// and returns the highest-scoring entry.
pub fn parse_classification(data: &Value) -> Option<RawClassification> {
    let entry = |v: &Value| -> Option<RawClassification> {
        Some(RawClassification {
            label: v.get("label")?.as_str()?.to_string(),
            score: v.get("score")?.as_f64()?,
        })
    };

    let items: Vec<RawClassification> = match data {
        Value::Array(outer) => match outer.first() {
            Some(Value::Array(inner)) => inner.iter().filter_map(entry).collect(),
            _ => outer.iter().filter_map(entry).collect(),
        },
        Value::Object(_) => entry(data).into_iter().collect(),
        _ => Vec::new(),
    };

    items
        .into_iter()
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
}

/// Accepts a bare number, `{perplexity}` or `{ppl}`
pub fn parse_perplexity(data: &Value) -> Option<f64> {
    data.as_f64()
        .or_else(|| data.get("perplexity").and_then(Value::as_f64))
        .or_else(|| data.get("ppl").and_then(Value::as_f64))
}

/// First result of `{results: [{url|link, title}]}` or `{items: [...]}`
pub fn parse_search_hit(data: &Value) -> Option<SearchHit> {
    let first = data
        .get("results")
        .or_else(|| data.get("items"))
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())?;
    let url = first
        .get("url")
        .or_else(|| first.get("link"))
        .and_then(Value::as_str)?;
    let title = first.get("title").and_then(Value::as_str).unwrap_or("");
    Some(SearchHit {
        url: url.to_string(),
        title: title.to_string(),
    })
}

#[async_trait]
impl TextClassifier for ProviderClient {
    async fn classify(&self, text: &str) -> Result<RawClassification, ScoringError> {
        Ok(self.call_classifier(text).await?)
    }
}

#[async_trait]
impl PerplexityModel for ProviderClient {
    async fn perplexity(&self, text: &str) -> Result<f64, ScoringError> {
        Ok(self.call_perplexity(text).await?)
    }
}

#[async_trait]
impl ExactSearch for ProviderClient {
    async fn search_exact(&self, text: &str) -> Result<Option<SearchHit>, ScoringError> {
        Ok(self.call_search(text).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_classification_shapes() {
        let flat = json!([{"label": "Real", "score": 0.2}, {"label": "Fake", "score": 0.8}]);
        assert_eq!(parse_classification(&flat).unwrap().label, "Fake");

        let nested = json!([[{"label": "LABEL_0", "score": 0.91}, {"label": "LABEL_1", "score": 0.09}]]);
        let raw = parse_classification(&nested).unwrap();
        assert_eq!(raw.label, "LABEL_0");
        assert_eq!(raw.score, 0.91);

        let single = json!({"label": "Real", "score": 0.7});
        assert_eq!(parse_classification(&single).unwrap().score, 0.7);

        assert!(parse_classification(&json!({"error": "loading"})).is_none());
    }

    #[test]
    fn test_parse_perplexity_shapes() {
        assert_eq!(parse_perplexity(&json!(31.5)), Some(31.5));
        assert_eq!(parse_perplexity(&json!({"perplexity": 12.0})), Some(12.0));
        assert_eq!(parse_perplexity(&json!({"ppl": 40})), Some(40.0));
        assert_eq!(parse_perplexity(&json!({"loss": 3.1})), None);
    }

    #[test]
    fn test_parse_search_hit() {
        let hit = parse_search_hit(&json!({"items": [{"link": "https://a.example", "title": "A"}]})).unwrap();
        assert_eq!(hit.url, "https://a.example");
        assert_eq!(hit.title, "A");
        assert!(parse_search_hit(&json!({"results": []})).is_none());
    }

    #[tokio::test]
    async fn test_unconfigured_endpoints_fail_fast() {
        let client = ProviderClient::new(&ProvidersConfig::default());
        assert!(!client.scoring_configured());
        assert!(matches!(
            client.call_classifier("text").await,
            Err(ProviderError::MissingEndpoint("classifier"))
        ));
        let err = client.perplexity("text").await.unwrap_err();
        assert!(matches!(err, ScoringError::Unavailable(_)));
    }
}
