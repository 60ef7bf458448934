// IntegrityAI Core Services

pub mod text_processor;
pub mod config_store;
pub mod providers;
pub mod lexicon;
pub mod paraphrase;
pub mod detection;

pub use text_processor::*;
pub use config_store::*;
pub use providers::*;
pub use lexicon::{Lexicon, LexiconError, MemoryLexicon, Synset};

pub use paraphrase::{
    paraphrase_document,
    rewrite_sentence,
    select_synonyms,
    sentence_variants,
    SentenceVariants,
    NO_VARIANT_MESSAGE,
};

pub use detection::{
    decide_verdict,
    sentence_tier,
    DuplicateChecker,
    DuplicateReport,
    ExactSearch,
    LabelNormalizer,
    PerplexityModel,
    RiskAssessment,
    RiskClassifier,
    ScoringError,
    TextClassifier,
};
