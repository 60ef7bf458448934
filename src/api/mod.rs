// Service Entry Points
// Request/response level operations for paraphrasing and risk analysis

use crate::models::{
    round1, AnalyzeResponse, DuplicateResponse, HealthResponse, ParaphraseRequest,
    ParaphraseResponse, SentenceRequest, SynonymsResponse, TextRequest, Tone, VariantsResponse,
    WordRequest,
};
use crate::services::config_store::AppConfig;
use crate::services::detection::{
    DuplicateChecker, ExactSearch, PerplexityModel, RiskClassifier, TextClassifier,
};
use crate::services::lexicon::{Lexicon, MemoryLexicon};
use crate::services::paraphrase::{paraphrase_document, select_synonyms, sentence_variants};
use crate::services::providers::ProviderClient;
use rand::Rng;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

pub struct IntegrityService {
    lexicon: Arc<dyn Lexicon>,
    risk: RiskClassifier,
    duplicates: DuplicateChecker,
    config: AppConfig,
    scoring_configured: bool,
}

impl IntegrityService {
    pub fn new(
        lexicon: Arc<dyn Lexicon>,
        classifier: Arc<dyn TextClassifier>,
        perplexity: Arc<dyn PerplexityModel>,
        search: Arc<dyn ExactSearch>,
        config: AppConfig,
    ) -> Self {
        let risk = RiskClassifier::new(classifier, perplexity, config.risk.clone());
        let duplicates = DuplicateChecker::new(search, &config.risk);
        Self {
            lexicon,
            risk,
            duplicates,
            config,
            scoring_configured: true,
        }
    }

    /// Wire the HTTP providers and the synset database named by `config`,
    /// falling back to the bundled database when no path is set.
    /// An unreadable database leaves only the functional-word table.
    pub fn from_config(config: AppConfig) -> Self {
        let loaded = match config.lexicon_path.as_deref() {
            Some(path) => MemoryLexicon::load(path),
            None => {
                info!("[API] No lexicon configured, using bundled lexicon");
                MemoryLexicon::bundled()
            }
        };
        let lexicon = loaded.unwrap_or_else(|e| {
            warn!("[API] Lexicon unavailable, synonyms disabled: {}", e);
            MemoryLexicon::new()
        });

        let providers = Arc::new(ProviderClient::new(&config.providers));
        let scoring_configured = providers.scoring_configured();
        let mut service = Self::new(
            Arc::new(lexicon),
            providers.clone(),
            providers.clone(),
            providers,
            config,
        );
        service.scoring_configured = scoring_configured;
        service
    }

    pub fn paraphrase(&self, request: &ParaphraseRequest) -> ParaphraseResponse {
        self.paraphrase_with_rng(request, &mut rand::thread_rng())
    }

    pub fn paraphrase_with_rng<R: Rng + ?Sized>(
        &self,
        request: &ParaphraseRequest,
        rng: &mut R,
    ) -> ParaphraseResponse {
        let paraphrased = paraphrase_document(
            self.lexicon.as_ref(),
            &self.config.paraphrase,
            &request.content,
            request.tone,
            rng,
        );
        ParaphraseResponse { paraphrased }
    }

    pub fn rewrite_sentence(&self, request: &SentenceRequest) -> VariantsResponse {
        self.rewrite_sentence_with_rng(request, &mut rand::thread_rng())
    }

    pub fn rewrite_sentence_with_rng<R: Rng + ?Sized>(
        &self,
        request: &SentenceRequest,
        rng: &mut R,
    ) -> VariantsResponse {
        let variants = sentence_variants(
            self.lexicon.as_ref(),
            &self.config.paraphrase,
            &request.sentence,
            request.tone,
            rng,
        );
        VariantsResponse {
            variants: variants.into_messages(),
        }
    }

    pub fn synonyms(&self, request: &WordRequest) -> SynonymsResponse {
        let mut synonyms = select_synonyms(
            self.lexicon.as_ref(),
            &self.config.paraphrase,
            &request.word,
            None,
            Tone::Standard,
            false,
        );
        synonyms.truncate(self.config.paraphrase.synonym_suggestion_limit);
        SynonymsResponse { synonyms }
    }

    pub async fn analyze(&self, request: &TextRequest) -> AnalyzeResponse {
        let request_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        let assessment = self.risk.assess(&request.content).await;
        info!(
            "[API] analyze request_id={} prediction={} sentences={} elapsed_ms={}",
            request_id,
            assessment.verdict.label.as_str(),
            assessment.breakdown.len(),
            started.elapsed().as_millis()
        );

        AnalyzeResponse {
            request_id,
            prediction: assessment.verdict.label,
            confidence: round1(assessment.verdict.confidence),
            risk_level: assessment.verdict.tier,
            breakdown: assessment.breakdown,
        }
    }

    pub async fn duplicates(&self, request: &TextRequest) -> DuplicateResponse {
        let report = self.duplicates.check(&request.content).await;
        DuplicateResponse {
            checked: report.checked,
            matched: report.matched,
            duplicate_percentage: report.duplicate_percentage,
        }
    }

    pub fn health(&self) -> HealthResponse {
        let status = if self.scoring_configured { "Ready" } else { "Degraded" };
        HealthResponse {
            status: status.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskTier, VerdictLabel};
    use crate::services::detection::duplicate::tests::StubSearch;
    use crate::services::detection::risk::tests::{StubClassifier, StubPerplexity};
    use crate::services::lexicon::tests::sample_lexicon;
    use crate::services::paraphrase::NO_VARIANT_MESSAGE;
    use rand::rngs::mock::StepRng;

    fn service(classifier: StubClassifier, ppl: Result<f64, ()>) -> IntegrityService {
        IntegrityService::new(
            Arc::new(sample_lexicon()),
            Arc::new(classifier),
            Arc::new(StubPerplexity(ppl)),
            Arc::new(StubSearch::new("copied")),
            AppConfig::default(),
        )
    }

    fn text(content: &str) -> TextRequest {
        TextRequest {
            title: String::new(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_paraphrase_with_forced_swaps() {
        let svc = service(StubClassifier::default(), Ok(60.0));
        let request = ParaphraseRequest {
            content: "I book a flight. The car is fast.".to_string(),
            tone: Tone::Standard,
        };
        let response = svc.paraphrase_with_rng(&request, &mut StepRng::new(0, 0));
        assert_eq!(response.paraphrased, "I hold a trip. This auto remains quick.");
    }

    #[test]
    fn test_rewrite_sentence_reports_no_variant() {
        let svc = service(StubClassifier::default(), Ok(60.0));
        let request = SentenceRequest {
            sentence: "Hello there.".to_string(),
            tone: Tone::Formal,
        };
        let response = svc.rewrite_sentence_with_rng(&request, &mut StepRng::new(0, 0));
        assert_eq!(response.variants, vec![NO_VARIANT_MESSAGE.to_string()]);
    }

    #[test]
    fn test_synonym_suggestions_are_capped() {
        let svc = service(StubClassifier::default(), Ok(60.0));
        let response = svc.synonyms(&WordRequest {
            word: "car".to_string(),
        });
        assert!(response.synonyms.len() <= 6);
        assert!(!response.synonyms.iter().any(|s| s == "car"));

        let response = svc.synonyms(&WordRequest {
            word: "zzzz".to_string(),
        });
        assert!(response.synonyms.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_rounds_and_ids() {
        let content = "The report was generated quickly.";
        let svc = service(StubClassifier::default().with(content, "Fake", 0.8768), Ok(60.0));
        let response = svc.analyze(&text(content)).await;

        assert_eq!(response.prediction, VerdictLabel::AiGenerated);
        assert_eq!(response.confidence, 87.7);
        assert_eq!(response.risk_level, RiskTier::High);
        assert_eq!(response.breakdown.len(), 1);
        assert_eq!(response.breakdown[0].prob, 87.7);
        assert!(uuid::Uuid::parse_str(&response.request_id).is_ok());

        let other = svc.analyze(&text(content)).await;
        assert_ne!(other.request_id, response.request_id);
    }

    #[tokio::test]
    async fn test_analyze_degrades_when_scoring_fails() {
        let svc = service(StubClassifier::default(), Err(()));
        let response = svc.analyze(&text("One long sentence here. Another long one here.")).await;
        assert_eq!(response.prediction, VerdictLabel::Unavailable);
        assert_eq!(response.confidence, 0.0);
        assert!(response.breakdown.iter().all(|e| e.prob == 0.0));

        let empty = svc.analyze(&text("")).await;
        assert_eq!(empty.prediction, VerdictLabel::InsufficientText);
        assert!(empty.breakdown.is_empty());
    }

    #[tokio::test]
    async fn test_duplicates_passthrough() {
        let svc = service(StubClassifier::default(), Ok(60.0));
        let response = svc
            .duplicates(&text("This sentence was copied from somewhere else. Short one."))
            .await;
        assert_eq!(response.checked, 1);
        assert_eq!(response.duplicate_percentage, 100.0);
        assert_eq!(response.matched[0].title, "Example source");
    }

    #[test]
    fn test_health_reflects_provider_configuration() {
        assert_eq!(service(StubClassifier::default(), Ok(60.0)).health().status, "Ready");
        let unconfigured = IntegrityService::from_config(AppConfig::default());
        assert_eq!(unconfigured.health().status, "Degraded");
    }

    #[test]
    fn test_default_config_uses_bundled_lexicon() {
        let svc = IntegrityService::from_config(AppConfig::default());
        let response = svc.synonyms(&WordRequest {
            word: "student".to_string(),
        });
        assert_eq!(response.synonyms[0], "pupil");
    }

    #[test]
    fn test_unreadable_lexicon_falls_back_to_empty() {
        let missing = std::env::temp_dir().join(format!("missing_{}.json", uuid::Uuid::new_v4()));
        let config = AppConfig {
            lexicon_path: Some(missing),
            ..AppConfig::default()
        };
        let svc = IntegrityService::from_config(config);
        let response = svc.synonyms(&WordRequest {
            word: "student".to_string(),
        });
        assert!(response.synonyms.is_empty());
    }
}
