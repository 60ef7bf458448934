// Paraphrase Module
// Lexical substitution pipeline:
// - functional_words: fixed substitutes for closed-class words
// - synonyms: tone-aware, POS-constrained candidate selection
// - rewriter: probabilistic per-token substitution and reconstruction
// - orchestrator: document paraphrase and sentence variants

pub mod functional_words;
pub mod synonyms;
pub mod rewriter;
pub mod orchestrator;

pub use functional_words::{functional_substitutes, is_functional};
pub use synonyms::select_synonyms;
pub use rewriter::{rewrite_sentence, should_swap, swap_rate};
pub use orchestrator::{paraphrase_document, sentence_variants, SentenceVariants, NO_VARIANT_MESSAGE};
