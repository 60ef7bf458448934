// Synonym Selector
// Ranked, tone-filtered replacement candidates for a single word

use crate::models::{PosTag, Tone};
use crate::services::config_store::ParaphraseConfig;
use crate::services::lexicon::Lexicon;
use std::collections::HashSet;

use super::functional_words::functional_substitutes;

fn passes_strict_filter(candidate: &str, word_len: usize, tone: Tone, config: &ParaphraseConfig) -> bool {
    let len = candidate.chars().count();
    match tone {
        Tone::Standard | Tone::Fluent => len <= word_len + config.casual_max_extra_chars,
        Tone::Formal => len >= config.formal_min_chars,
    }
}

/// Candidate replacements for `word`, shortest first.
///
/// Functional words short-circuit to their fixed list regardless of the
/// other arguments. Otherwise only the first `synset_limit` senses in the
/// tag's category are used. An empty result means no substitution.
pub fn select_synonyms(
    lexicon: &dyn Lexicon,
    config: &ParaphraseConfig,
    word: &str,
    pos: Option<PosTag>,
    tone: Tone,
    strict: bool,
) -> Vec<String> {
    if let Some(fixed) = functional_substitutes(word) {
        return fixed.iter().map(|s| s.to_string()).collect();
    }

    let word = word.trim();
    let word_lower = word.to_lowercase();
    let word_len = word.chars().count();
    let category = pos.and_then(PosTag::lexical_category);

    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates: Vec<String> = Vec::new();

    for synset in lexicon
        .lookup_synsets(word, category)
        .into_iter()
        .take(config.synset_limit)
    {
        for lemma in synset.lemmas {
            let candidate = lemma.replace('_', " ");
            let key = candidate.to_lowercase();
            if key == word_lower {
                continue;
            }
            if strict && !passes_strict_filter(&candidate, word_len, tone, config) {
                continue;
            }
            if seen.insert(key) {
                candidates.push(candidate);
            }
        }
    }

    candidates.sort_by(|a, b| {
        a.chars()
            .count()
            .cmp(&b.chars().count())
            .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
    });
    candidates
}
