// Detection Module
// AI-authorship risk scoring organized into specialized submodules:
// - scoring: collaborator traits (classifier, perplexity, search) and the timeout guard
// - labels: raw classifier label normalization
// - risk: document verdict and sentence breakdown
// - duplicate: exact-phrase duplicate-content check

pub mod scoring;
pub mod labels;
pub mod risk;
pub mod duplicate;

pub use scoring::{
    guarded, ExactSearch, PerplexityModel, RawClassification, ScoringError, TextClassifier,
};
pub use labels::{AuthorshipClass, LabelNormalizer};
pub use risk::{decide_verdict, sentence_tier, RiskAssessment, RiskClassifier};
pub use duplicate::{DuplicateChecker, DuplicateReport};
