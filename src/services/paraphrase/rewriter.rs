// Sentence Rewriter
// Probabilistic word-by-word substitution followed by reconstruction

use crate::models::{PosTag, Tone, WordToken};
use crate::services::config_store::ParaphraseConfig;
use crate::services::lexicon::Lexicon;
use crate::services::text_processor::{capitalize_first, reconstruct_sentence, strip_punctuation};
use rand::Rng;

use super::functional_words::is_functional;
use super::synonyms::select_synonyms;

/// Base swap rate for the tone before the variance multiplier
pub fn swap_rate(tone: Tone, config: &ParaphraseConfig) -> f64 {
    match tone {
        Tone::Fluent => config.fluent_swap_rate,
        Tone::Standard | Tone::Formal => config.base_swap_rate,
    }
}

/// Swap decision for one token. The probability is clamped to [0, 1]
/// so any effective rate >= 1 always attempts a swap.
pub fn should_swap(effective_probability: f64, draw: f64) -> bool {
    draw < effective_probability.clamp(0.0, 1.0)
}

fn tag_tokens(lexicon: &dyn Lexicon, sentence: &str) -> Vec<WordToken> {
    let words = lexicon.tokenize_words(sentence);
    let tags = lexicon.tag_pos(&words);
    words
        .iter()
        .zip(tags.into_iter().chain(std::iter::repeat(PosTag::Other)))
        .map(|(w, tag)| WordToken::new(w).with_pos(tag))
        .collect()
}

/// Rewrite one sentence. Each eligible token independently draws against
/// `swap_rate(tone) * variance_level`; failed draws and empty candidate
/// sets keep the original token.
pub fn rewrite_sentence<R: Rng + ?Sized>(
    lexicon: &dyn Lexicon,
    config: &ParaphraseConfig,
    sentence: &str,
    tone: Tone,
    variance_level: f64,
    rng: &mut R,
) -> String {
    let effective = swap_rate(tone, config) * variance_level;
    let tokens = tag_tokens(lexicon, sentence);
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());

    for token in &tokens {
        let functional = is_functional(&token.normalized);
        if !functional && token.normalized.chars().count() < config.min_content_word_chars {
            out.push(token.raw.clone());
            continue;
        }

        if !should_swap(effective, rng.gen::<f64>()) {
            out.push(token.raw.clone());
            continue;
        }

        let clean = strip_punctuation(&token.raw);
        let candidates = select_synonyms(lexicon, config, &clean, token.pos, tone, true);
        if candidates.is_empty() {
            out.push(token.raw.clone());
            continue;
        }

        let replacement = &candidates[rng.gen_range(0..candidates.len())];
        if token.starts_uppercase() {
            out.push(capitalize_first(replacement));
        } else {
            out.push(replacement.clone());
        }
    }

    reconstruct_sentence(&out)
}

/// The sentence as it reads after tokenizing and reconstructing with no swaps
pub fn reconstruct_unchanged(lexicon: &dyn Lexicon, sentence: &str) -> String {
    reconstruct_sentence(&lexicon.tokenize_words(sentence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::lexicon::tests::sample_lexicon;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn always_first() -> StepRng {
        StepRng::new(0, 0)
    }

    fn never_swap() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    #[test]
    fn test_should_swap_clamps_probability() {
        assert!(should_swap(0.6, 0.59));
        assert!(!should_swap(0.6, 0.6));
        assert!(should_swap(1.8, 0.999_999));
        assert!(!should_swap(-0.5, 0.0));
        assert!(!should_swap(0.0, 0.0));
    }

    #[test]
    fn test_swap_rate_per_tone() {
        let config = ParaphraseConfig::default();
        assert_eq!(swap_rate(Tone::Standard, &config), 0.4);
        assert_eq!(swap_rate(Tone::Formal, &config), 0.4);
        assert_eq!(swap_rate(Tone::Fluent, &config), 0.5);
    }

    #[test]
    fn test_rewrite_swaps_only_eligible_words() {
        let lex = sample_lexicon();
        let out = rewrite_sentence(
            &lex,
            &ParaphraseConfig::default(),
            "I book a flight.",
            Tone::Standard,
            1.0,
            &mut always_first(),
        );
        assert_eq!(out, "I hold a trip.");
    }

    #[test]
    fn test_rewrite_restores_capitalization_and_functional_words() {
        let lex = sample_lexicon();
        let out = rewrite_sentence(
            &lex,
            &ParaphraseConfig::default(),
            "The car is fast.",
            Tone::Standard,
            1.0,
            &mut always_first(),
        );
        assert_eq!(out, "This auto remains quick.");
    }

    #[test]
    fn test_failed_draw_keeps_sentence() {
        let lex = sample_lexicon();
        let out = rewrite_sentence(
            &lex,
            &ParaphraseConfig::default(),
            "I book a flight , today .",
            Tone::Fluent,
            1.0,
            &mut never_swap(),
        );
        assert_eq!(out, "I book a flight, today.");
    }

    #[test]
    fn test_random_rewrites_keep_short_words_and_attached_period() {
        let lex = sample_lexicon();
        let config = ParaphraseConfig::default();
        for seed in 0..200u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = rewrite_sentence(&lex, &config, "I book a flight.", Tone::Standard, 1.5, &mut rng);
            let words: Vec<&str> = out.split_whitespace().collect();
            assert_eq!(words.len(), 4, "{}", out);
            assert_eq!(words[0], "I");
            assert!(["book", "hold", "reserve", "schedule"].contains(&words[1]), "{}", out);
            assert_eq!(words[2], "a");
            assert!(["flight.", "trip.", "flying."].contains(&words[3]), "{}", out);
            assert!(!out.contains(" ."));
        }
    }

    #[test]
    fn test_reconstruct_unchanged() {
        let lex = sample_lexicon();
        assert_eq!(reconstruct_unchanged(&lex, "Well , fine !"), "Well, fine!");
    }
}
