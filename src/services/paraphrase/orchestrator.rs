// Paraphrase Orchestrator
// Whole-document paraphrasing and per-sentence variant generation

use crate::models::Tone;
use crate::services::config_store::ParaphraseConfig;
use crate::services::lexicon::Lexicon;
use rand::Rng;
use tracing::{debug, info};

use super::rewriter::{reconstruct_unchanged, rewrite_sentence};

/// Shown to the user when no attempt produced a distinct rewrite
pub const NO_VARIANT_MESSAGE: &str = "Could not generate a distinct variation.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentenceVariants {
    Found(Vec<String>),
    NoDistinctVariant,
}

impl SentenceVariants {
    /// Variants as user-facing strings, the sentinel message when none were found
    pub fn into_messages(self) -> Vec<String> {
        match self {
            Self::Found(variants) => variants,
            Self::NoDistinctVariant => vec![NO_VARIANT_MESSAGE.to_string()],
        }
    }
}

/// Rewrite every sentence independently and join them with single spaces
pub fn paraphrase_document<R: Rng + ?Sized>(
    lexicon: &dyn Lexicon,
    config: &ParaphraseConfig,
    content: &str,
    tone: Tone,
    rng: &mut R,
) -> String {
    let sentences = lexicon.tokenize_sentences(content);
    info!(
        "[PARAPHRASE] Document: {} sentences, tone={}",
        sentences.len(),
        tone.as_str()
    );

    sentences
        .iter()
        .map(|s| rewrite_sentence(lexicon, config, s, tone, config.document_variance, rng))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Up to `max_variants` rewrites that differ from each other and from the input
pub fn sentence_variants<R: Rng + ?Sized>(
    lexicon: &dyn Lexicon,
    config: &ParaphraseConfig,
    sentence: &str,
    tone: Tone,
    rng: &mut R,
) -> SentenceVariants {
    let original = sentence.trim();
    // Re-spacing alone is not a variation.
    let unchanged = reconstruct_unchanged(lexicon, original);
    let mut variants: Vec<String> = Vec::new();

    for attempt in 1..=config.variant_attempts {
        if variants.len() >= config.max_variants {
            break;
        }
        let candidate = rewrite_sentence(lexicon, config, original, tone, config.variant_variance, rng);
        if candidate == original || candidate == unchanged || variants.contains(&candidate) {
            debug!("[PARAPHRASE] Variant attempt {} produced nothing new", attempt);
            continue;
        }
        variants.push(candidate);
    }

    if variants.is_empty() {
        SentenceVariants::NoDistinctVariant
    } else {
        SentenceVariants::Found(variants)
    }
}
