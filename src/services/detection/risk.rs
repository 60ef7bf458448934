// Risk Classifier
// Fuses classifier probability and perplexity into a tiered verdict and
// re-scores each sentence for the breakdown view.
//
// Document rules, first match wins:
//   ai_prob > 80            -> AI-Generated, High, conf = ai_prob
//   perplexity < 25         -> Suspected AI (Modern), High, conf = 88.5
//   perplexity < 45         -> Possible AI Edit, Medium, conf = 65.0
//   otherwise               -> Human-Written, Low, conf = 100 - ai_prob

use crate::models::{round1, RiskTier, RiskVerdict, SentenceRisk, VerdictLabel};
use crate::services::config_store::RiskConfig;
use crate::services::text_processor::split_sentences;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use super::labels::LabelNormalizer;
use super::scoring::{guarded, PerplexityModel, ScoringError, TextClassifier};

/// Document-level decision for an AI probability percentage and a perplexity
pub fn decide_verdict(ai_probability: f64, perplexity: f64, config: &RiskConfig) -> RiskVerdict {
    if ai_probability > config.ai_high_threshold {
        RiskVerdict {
            label: VerdictLabel::AiGenerated,
            confidence: ai_probability,
            tier: RiskTier::High,
        }
    } else if perplexity < config.modern_perplexity {
        RiskVerdict {
            label: VerdictLabel::SuspectedAiModern,
            confidence: config.modern_confidence,
            tier: RiskTier::High,
        }
    } else if perplexity < config.edit_perplexity {
        RiskVerdict {
            label: VerdictLabel::PossibleAiEdit,
            confidence: config.edit_confidence,
            tier: RiskTier::Medium,
        }
    } else {
        RiskVerdict {
            label: VerdictLabel::HumanWritten,
            confidence: 100.0 - ai_probability,
            tier: RiskTier::Low,
        }
    }
}

pub fn sentence_tier(ai_probability: f64, config: &RiskConfig) -> RiskTier {
    if ai_probability > config.ai_high_threshold {
        RiskTier::High
    } else if ai_probability > config.sentence_medium_threshold {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

/// Cloneable classifier + normalizer pair that spawned tasks can own
#[derive(Clone)]
struct ClassifierHandle {
    classifier: Arc<dyn TextClassifier>,
    labels: Arc<LabelNormalizer>,
    timeout_secs: u64,
}

impl ClassifierHandle {
    async fn ai_probability(&self, text: &str) -> Result<f64, ScoringError> {
        let raw = guarded(self.timeout_secs, self.classifier.classify(text)).await?;
        self.labels.ai_probability(&raw)
    }
}

/// Verdict plus breakdown, as computed for one analyze request
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    pub verdict: RiskVerdict,
    pub breakdown: Vec<SentenceRisk>,
}

pub struct RiskClassifier {
    handle: ClassifierHandle,
    perplexity: Arc<dyn PerplexityModel>,
    config: RiskConfig,
}

impl RiskClassifier {
    pub fn new(
        classifier: Arc<dyn TextClassifier>,
        perplexity: Arc<dyn PerplexityModel>,
        config: RiskConfig,
    ) -> Self {
        let handle = ClassifierHandle {
            classifier,
            labels: Arc::new(LabelNormalizer::from_config(&config)),
            timeout_secs: config.call_timeout_secs,
        };
        Self {
            handle,
            perplexity,
            config,
        }
    }

    async fn score_perplexity(&self, text: &str) -> Result<f64, ScoringError> {
        let ppl = guarded(self.config.call_timeout_secs, self.perplexity.perplexity(text)).await?;
        if !ppl.is_finite() || ppl <= 0.0 {
            return Err(ScoringError::InvalidPerplexity(ppl));
        }
        Ok(ppl)
    }

    /// Document-level verdict. Never fails: backend trouble yields the
    /// unavailable verdict, blank content the insufficient-text verdict.
    pub async fn classify(&self, content: &str) -> RiskVerdict {
        if content.trim().is_empty() {
            return RiskVerdict::insufficient();
        }

        let (ai, ppl) = tokio::join!(
            self.handle.ai_probability(content),
            self.score_perplexity(content)
        );

        match (ai, ppl) {
            (Ok(ai_probability), Ok(perplexity)) => {
                let verdict = decide_verdict(ai_probability, perplexity, &self.config);
                info!(
                    "[RISK] ai_prob={:.1} perplexity={:.2} -> {} ({:?})",
                    ai_probability,
                    perplexity,
                    verdict.label.as_str(),
                    verdict.tier
                );
                verdict
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("[RISK] Scoring unavailable, returning neutral verdict: {}", e);
                RiskVerdict::unavailable()
            }
        }
    }

    /// One entry per sentence, in source order. Sentences shorter than
    /// `min_sentence_chars` are Low/0 without a classifier call.
    pub async fn breakdown(&self, content: &str) -> Vec<SentenceRisk> {
        let sentences = split_sentences(content);
        let started = Instant::now();
        let mut probabilities: Vec<Option<f64>> = vec![None; sentences.len()];

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let mut join_set: JoinSet<(usize, Result<f64, ScoringError>)> = JoinSet::new();
        let mut scored: usize = 0;

        for (idx, sentence) in sentences.iter().enumerate() {
            if sentence.chars().count() < self.config.min_sentence_chars {
                continue;
            }
            let handle = self.handle.clone();
            let semaphore = semaphore.clone();
            let sentence = sentence.clone();
            scored += 1;

            join_set.spawn(async move {
                let _permit = match semaphore.acquire().await {
                    Ok(p) => p,
                    Err(_) => return (idx, Err(ScoringError::Unavailable("semaphore closed".to_string()))),
                };
                (idx, handle.ai_probability(&sentence).await)
            });
        }

        while let Some(res) = join_set.join_next().await {
            match res {
                Ok((idx, Ok(prob))) => probabilities[idx] = Some(prob),
                Ok((idx, Err(e))) => {
                    warn!("[RISK] Sentence {} scoring unavailable: {}", idx, e);
                }
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => warn!("[RISK] Sentence task cancelled: {}", e),
            }
        }

        info!(
            "[RISK] Breakdown done: sentences={}, scored={}, elapsed_ms={}",
            sentences.len(),
            scored,
            started.elapsed().as_millis()
        );

        sentences
            .iter()
            .zip(probabilities)
            .map(|(text, prob)| match prob {
                Some(p) => SentenceRisk {
                    text: text.clone(),
                    risk: sentence_tier(p, &self.config),
                    prob: round1(p),
                },
                None => SentenceRisk::neutral(text),
            })
            .collect()
    }

    /// Verdict and breakdown together. When the document cannot be scored
    /// the breakdown is all-neutral and no further backend calls are made.
    pub async fn assess(&self, content: &str) -> RiskAssessment {
        let verdict = self.classify(content).await;
        let breakdown = match verdict.label {
            VerdictLabel::InsufficientText => Vec::new(),
            VerdictLabel::Unavailable => split_sentences(content)
                .iter()
                .map(|s| SentenceRisk::neutral(s))
                .collect(),
            _ => self.breakdown(content).await,
        };
        RiskAssessment { verdict, breakdown }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use super::super::scoring::RawClassification;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Classifier returning canned scores keyed by text; unknown text is 50% Fake
    #[derive(Default)]
    pub(crate) struct StubClassifier {
        pub scores: HashMap<String, (String, f64)>,
        pub delays_ms: HashMap<String, u64>,
        pub fail: bool,
        pub calls: AtomicUsize,
    }

    impl StubClassifier {
        pub(crate) fn with(mut self, text: &str, label: &str, score: f64) -> Self {
            self.scores.insert(text.to_string(), (label.to_string(), score));
            self
        }
    }

    #[async_trait]
    impl TextClassifier for StubClassifier {
        async fn classify(&self, text: &str) -> Result<RawClassification, ScoringError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(ms) = self.delays_ms.get(text) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            if self.fail {
                return Err(ScoringError::Unavailable("model is still loading".to_string()));
            }
            let (label, score) = self
                .scores
                .get(text)
                .cloned()
                .unwrap_or_else(|| ("Fake".to_string(), 0.5));
            Ok(RawClassification { label, score })
        }
    }

    pub(crate) struct StubPerplexity(pub Result<f64, ()>);

    #[async_trait]
    impl PerplexityModel for StubPerplexity {
        async fn perplexity(&self, _text: &str) -> Result<f64, ScoringError> {
            self.0
                .map_err(|_| ScoringError::Unavailable("perplexity model offline".to_string()))
        }
    }

    fn classifier(stub: StubClassifier, ppl: Result<f64, ()>) -> (RiskClassifier, Arc<StubClassifier>) {
        let stub = Arc::new(stub);
        let rc = RiskClassifier::new(stub.clone(), Arc::new(StubPerplexity(ppl)), RiskConfig::default());
        (rc, stub)
    }

    #[test]
    fn test_classifier_rule_fires_before_perplexity() {
        let v = decide_verdict(85.0, 60.0, &RiskConfig::default());
        assert_eq!(v.label, VerdictLabel::AiGenerated);
        assert_eq!(v.tier, RiskTier::High);
        assert_eq!(v.confidence, 85.0);

        let v = decide_verdict(85.0, 10.0, &RiskConfig::default());
        assert_eq!(v.label, VerdictLabel::AiGenerated);
    }

    #[test]
    fn test_low_perplexity_is_suspected_modern() {
        let v = decide_verdict(50.0, 20.0, &RiskConfig::default());
        assert_eq!(v.label, VerdictLabel::SuspectedAiModern);
        assert_eq!(v.tier, RiskTier::High);
        assert_eq!(v.confidence, 88.5);
    }

    #[test]
    fn test_middle_perplexity_and_human_fallthrough() {
        let config = RiskConfig::default();
        let v = decide_verdict(50.0, 30.0, &config);
        assert_eq!((v.label, v.tier, v.confidence), (VerdictLabel::PossibleAiEdit, RiskTier::Medium, 65.0));

        let v = decide_verdict(30.0, 60.0, &config);
        assert_eq!((v.label, v.tier, v.confidence), (VerdictLabel::HumanWritten, RiskTier::Low, 70.0));

        // Thresholds are strict inequalities
        let v = decide_verdict(80.0, 45.0, &config);
        assert_eq!(v.label, VerdictLabel::HumanWritten);
        let v = decide_verdict(80.0, 25.0, &config);
        assert_eq!(v.label, VerdictLabel::PossibleAiEdit);
    }

    #[test]
    fn test_sentence_tiers() {
        let config = RiskConfig::default();
        assert_eq!(sentence_tier(80.1, &config), RiskTier::High);
        assert_eq!(sentence_tier(80.0, &config), RiskTier::Medium);
        assert_eq!(sentence_tier(50.0, &config), RiskTier::Low);
    }

    #[tokio::test]
    async fn test_classify_uses_both_signals() {
        let text = "This passage reads like a template.";
        let (rc, _) = classifier(StubClassifier::default().with(text, "Real", 0.5), Ok(20.0));
        let v = rc.classify(text).await;
        assert_eq!(v.label, VerdictLabel::SuspectedAiModern);
        assert_eq!(v.confidence, 88.5);
    }

    #[tokio::test]
    async fn test_classify_blank_content_skips_backends() {
        let (rc, stub) = classifier(StubClassifier::default(), Ok(60.0));
        assert_eq!(rc.classify("   \n").await, RiskVerdict::insufficient());
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_backend_failures_degrade_to_neutral() {
        let failing = StubClassifier {
            fail: true,
            ..StubClassifier::default()
        };
        let (rc, _) = classifier(failing, Ok(60.0));
        assert_eq!(rc.classify("Some text here.").await, RiskVerdict::unavailable());

        let (rc, _) = classifier(StubClassifier::default(), Err(()));
        assert_eq!(rc.classify("Some text here.").await, RiskVerdict::unavailable());

        let (rc, _) = classifier(StubClassifier::default(), Ok(f64::NAN));
        assert_eq!(rc.classify("Some text here.").await, RiskVerdict::unavailable());

        let (rc, _) = classifier(StubClassifier::default().with("Odd label.", "LABEL_9", 0.9), Ok(60.0));
        assert_eq!(rc.classify("Odd label.").await, RiskVerdict::unavailable());
    }

    #[tokio::test]
    async fn test_breakdown_skips_short_sentences_and_keeps_order() {
        let content = "First sentence is long. Ok. Second sentence is long. Third one here!";
        let mut stub = StubClassifier::default()
            .with("First sentence is long.", "Fake", 0.9)
            .with("Second sentence is long.", "Real", 0.9)
            .with("Third one here!", "Fake", 0.6);
        stub.delays_ms.insert("First sentence is long.".to_string(), 60);
        stub.delays_ms.insert("Second sentence is long.".to_string(), 20);

        let (rc, stub) = classifier(stub, Ok(60.0));
        let breakdown = rc.breakdown(content).await;

        assert_eq!(breakdown.len(), split_sentences(content).len());
        assert_eq!(breakdown[0].text, "First sentence is long.");
        assert_eq!((breakdown[0].risk, breakdown[0].prob), (RiskTier::High, 90.0));
        assert_eq!(breakdown[1], SentenceRisk::neutral("Ok."));
        assert_eq!((breakdown[2].risk, breakdown[2].prob), (RiskTier::Low, 10.0));
        assert_eq!((breakdown[3].risk, breakdown[3].prob), (RiskTier::Medium, 60.0));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_breakdown_failures_are_neutral_entries() {
        let failing = StubClassifier {
            fail: true,
            ..StubClassifier::default()
        };
        let (rc, _) = classifier(failing, Ok(60.0));
        let breakdown = rc.breakdown("One long sentence here. Another long one here.").await;
        assert_eq!(breakdown.len(), 2);
        assert!(breakdown.iter().all(|e| e.risk == RiskTier::Low && e.prob == 0.0));
    }

    #[tokio::test]
    async fn test_assess_unavailable_makes_no_sentence_calls() {
        let (rc, stub) = classifier(StubClassifier::default(), Err(()));
        let assessment = rc.assess("One long sentence here. Another long one here.").await;
        assert_eq!(assessment.verdict, RiskVerdict::unavailable());
        assert_eq!(assessment.breakdown.len(), 2);
        // only the document-level call
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_assess_blank_content() {
        let (rc, _) = classifier(StubClassifier::default(), Ok(60.0));
        let assessment = rc.assess("").await;
        assert_eq!(assessment.verdict.label, VerdictLabel::InsufficientText);
        assert!(assessment.breakdown.is_empty());
    }
}
