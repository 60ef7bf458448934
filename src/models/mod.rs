// IntegrityAI Data Models
// Request/response payloads and the shared value types of both pipelines

use serde::{Deserialize, Serialize};

use crate::services::text_processor::strip_punctuation;

// ============ Shared Value Types ============

/// Register the caller wants the rewrite to land in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String")]
pub enum Tone {
    #[default]
    Standard,
    Fluent,
    Formal,
}

impl Tone {
    pub fn from_str(val: &str) -> Self {
        match val.trim().to_lowercase().as_str() {
            "fluent" => Self::Fluent,
            "formal" => Self::Formal,
            _ => Self::Standard,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Fluent => "Fluent",
            Self::Formal => "Formal",
        }
    }
}

impl From<String> for Tone {
    fn from(val: String) -> Self {
        Self::from_str(&val)
    }
}

/// Coarse part-of-speech category.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PosTag {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Other,
}

impl PosTag {
    /// Parses the category names used by the synset database.
    pub fn from_category(val: &str) -> Option<Self> {
        match val.trim().to_lowercase().as_str() {
            "n" | "noun" => Some(Self::Noun),
            "v" | "verb" => Some(Self::Verb),
            "a" | "s" | "adj" | "adjective" => Some(Self::Adjective),
            "r" | "adv" | "adverb" => Some(Self::Adverb),
            _ => None,
        }
    }

    /// Lexical category used to filter synsets; `Other` searches everything.
    pub fn lexical_category(self) -> Option<Self> {
        match self {
            Self::Other => None,
            tag => Some(tag),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordToken {
    /// Surface form exactly as it appeared in the input.
    pub raw: String,
    /// Lowercased, punctuation-stripped form.
    pub normalized: String,
    pub pos: Option<PosTag>,
}

impl WordToken {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            normalized: strip_punctuation(raw).to_lowercase(),
            pos: None,
        }
    }

    pub fn with_pos(mut self, pos: PosTag) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn starts_uppercase(&self) -> bool {
        self.raw.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum VerdictLabel {
    #[serde(rename = "Human-Written")]
    HumanWritten,
    #[serde(rename = "AI-Generated")]
    AiGenerated,
    #[serde(rename = "Suspected AI (Modern)")]
    SuspectedAiModern,
    #[serde(rename = "Possible AI Edit")]
    PossibleAiEdit,
    #[serde(rename = "Unavailable")]
    Unavailable,
    #[serde(rename = "Insufficient Text")]
    InsufficientText,
}

impl VerdictLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HumanWritten => "Human-Written",
            Self::AiGenerated => "AI-Generated",
            Self::SuspectedAiModern => "Suspected AI (Modern)",
            Self::PossibleAiEdit => "Possible AI Edit",
            Self::Unavailable => "Unavailable",
            Self::InsufficientText => "Insufficient Text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskVerdict {
    pub label: VerdictLabel,
    /// Percentage in 0..=100.
    pub confidence: f64,
    pub tier: RiskTier,
}

impl RiskVerdict {
    /// Returned when a scoring backend could not be reached.
    pub fn unavailable() -> Self {
        Self {
            label: VerdictLabel::Unavailable,
            confidence: 0.0,
            tier: RiskTier::Low,
        }
    }

    /// Returned for empty or whitespace-only content.
    pub fn insufficient() -> Self {
        Self {
            label: VerdictLabel::InsufficientText,
            confidence: 0.0,
            tier: RiskTier::Low,
        }
    }
}

/// One entry of the sentence-level breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceRisk {
    pub text: String,
    pub risk: RiskTier,
    /// AI probability percentage, rounded to one decimal.
    pub prob: f64,
}

impl SentenceRisk {
    pub fn neutral(text: &str) -> Self {
        Self {
            text: text.to_string(),
            risk: RiskTier::Low,
            prob: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateMatch {
    pub sentence: String,
    pub url: String,
    pub title: String,
}

// ============ Requests ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParaphraseRequest {
    pub content: String,
    #[serde(default)]
    pub tone: Tone,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceRequest {
    pub sentence: String,
    #[serde(default)]
    pub tone: Tone,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordRequest {
    pub word: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub title: String,
    pub content: String,
}

// ============ Responses ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParaphraseResponse {
    pub paraphrased: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantsResponse {
    pub variants: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynonymsResponse {
    pub synonyms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub request_id: String,
    pub prediction: VerdictLabel,
    pub confidence: f64,
    pub risk_level: RiskTier,
    pub breakdown: Vec<SentenceRisk>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateResponse {
    pub checked: usize,
    pub matched: Vec<DuplicateMatch>,
    pub duplicate_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Rounds a percentage to one decimal place for display.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
