// Lexicon Adapter
// Tokenizer, coarse POS tagger and synset lookup behind one trait.
// The synset database is loaded once and only read afterwards.

use crate::models::PosTag;
use crate::services::text_processor::{split_sentences, strip_punctuation, tokenize_words};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("Failed to read lexicon {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse lexicon: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One sense: the lemmas sharing it, in the order the database lists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synset {
    pub pos: PosTag,
    pub lemmas: Vec<String>,
}

pub trait Lexicon: Send + Sync {
    fn tokenize_words(&self, text: &str) -> Vec<String>;

    fn tokenize_sentences(&self, text: &str) -> Vec<String>;

    /// One tag per input word, parallel to `words`.
    fn tag_pos(&self, words: &[String]) -> Vec<PosTag>;

    /// Synsets for `word` in sense-frequency order, optionally restricted to one category.
    fn lookup_synsets(&self, word: &str, category: Option<PosTag>) -> Vec<Synset>;
}

#[derive(Debug, Deserialize)]
struct SynsetRecord {
    pos: String,
    lemmas: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    words: HashMap<String, Vec<SynsetRecord>>,
}

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "my", "your", "his", "her", "its", "our",
    "their", "some", "any", "every", "each", "no",
];
const PERSONAL_PRONOUNS: &[&str] = &["i", "you", "he", "she", "it", "we", "they"];
const MODALS: &[&str] = &[
    "can", "could", "will", "would", "shall", "should", "may", "might", "must", "to",
];
const CLOSED_CLASS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "so", "as", "of", "in", "on", "at", "by", "for",
    "with", "without", "to", "from", "into", "i", "you", "he", "she", "it", "we", "they", "me",
    "him", "us", "them", "this", "that", "these", "those", "my", "your", "his", "her", "its",
    "our", "their", "because", "when", "while",
];

// WordNet-style detachment rules: (suffix, replacement).
const NOUN_RULES: &[(&str, &str)] = &[
    ("ses", "s"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
    ("s", ""),
];
const VERB_RULES: &[(&str, &str)] = &[
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
    ("s", ""),
];
const ADJ_RULES: &[(&str, &str)] = &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")];

const BUNDLED_LEXICON: &str = include_str!("../../data/lexicon.json");

/// In-memory synset database with a heuristic tagger
#[derive(Debug, Clone, Default)]
pub struct MemoryLexicon {
    words: HashMap<String, Vec<Synset>>,
}

impl MemoryLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the JSON synset database; unknown categories are skipped.
    pub fn from_json(content: &str) -> Result<Self, LexiconError> {
        let file: LexiconFile = serde_json::from_str(content)?;
        let mut lexicon = Self::new();
        for (word, records) in file.words {
            for record in records {
                if let Some(pos) = PosTag::from_category(&record.pos) {
                    lexicon.insert(&word, pos, &record.lemmas);
                }
            }
        }
        Ok(lexicon)
    }

    /// The small synset database shipped in `data/lexicon.json`
    pub fn bundled() -> Result<Self, LexiconError> {
        Self::from_json(BUNDLED_LEXICON)
    }

    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let content = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let lexicon = Self::from_json(&content)?;
        info!(
            "[LEXICON] Loaded {} entries from {}",
            lexicon.len(),
            path.display()
        );
        Ok(lexicon)
    }

    /// Append a synset for `word`; earlier inserts rank as more common senses.
    pub fn insert<S: AsRef<str>>(&mut self, word: &str, pos: PosTag, lemmas: &[S]) {
        self.words
            .entry(word.trim().to_lowercase())
            .or_default()
            .push(Synset {
                pos,
                lemmas: lemmas.iter().map(|l| l.as_ref().to_string()).collect(),
            });
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn senses(&self, base: &str, category: Option<PosTag>) -> Vec<Synset> {
        self.words
            .get(base)
            .map(|synsets| {
                synsets
                    .iter()
                    .filter(|s| category.map_or(true, |c| s.pos == c))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Candidate base forms: the word itself, then detachment-rule reductions.
    fn base_forms(word: &str, category: Option<PosTag>) -> Vec<String> {
        let mut forms = vec![word.to_string()];
        let rule_sets: Vec<&[(&str, &str)]> = match category {
            Some(PosTag::Noun) => vec![NOUN_RULES],
            Some(PosTag::Verb) => vec![VERB_RULES],
            Some(PosTag::Adjective) => vec![ADJ_RULES],
            Some(PosTag::Adverb) | Some(PosTag::Other) => vec![],
            None => vec![NOUN_RULES, VERB_RULES, ADJ_RULES],
        };
        for rules in rule_sets {
            for (suffix, replacement) in rules {
                if let Some(stem) = word.strip_suffix(suffix) {
                    if stem.chars().count() < 2 {
                        continue;
                    }
                    let form = format!("{}{}", stem, replacement);
                    if !forms.contains(&form) {
                        forms.push(form);
                    }
                }
            }
        }
        forms
    }

    fn has_sense(&self, word: &str, pos: PosTag) -> bool {
        !self.lookup_synsets(word, Some(pos)).is_empty()
    }

    fn primary_sense(&self, word: &str) -> Option<PosTag> {
        self.lookup_synsets(word, None).first().map(|s| s.pos)
    }
}

fn suffix_guess(word: &str) -> PosTag {
    if !word.chars().any(|c| c.is_alphabetic()) {
        return PosTag::Other;
    }
    if word.ends_with("ly") {
        PosTag::Adverb
    } else if word.ends_with("ing") || word.ends_with("ed") {
        PosTag::Verb
    } else if ["ous", "ful", "ive", "able", "ible", "al", "less"]
        .iter()
        .any(|s| word.ends_with(s))
    {
        PosTag::Adjective
    } else {
        PosTag::Noun
    }
}

impl Lexicon for MemoryLexicon {
    fn tokenize_words(&self, text: &str) -> Vec<String> {
        tokenize_words(text)
    }

    fn tokenize_sentences(&self, text: &str) -> Vec<String> {
        split_sentences(text)
    }

    fn tag_pos(&self, words: &[String]) -> Vec<PosTag> {
        let mut tags = Vec::with_capacity(words.len());
        let mut prev: Option<String> = None;

        for word in words {
            let lower = strip_punctuation(word).to_lowercase();
            let tag = if lower.is_empty() || CLOSED_CLASS.contains(&lower.as_str()) {
                PosTag::Other
            } else {
                let prev_word = prev.as_deref().unwrap_or("");
                if (PERSONAL_PRONOUNS.contains(&prev_word) || MODALS.contains(&prev_word))
                    && self.has_sense(&lower, PosTag::Verb)
                {
                    PosTag::Verb
                } else if DETERMINERS.contains(&prev_word) && self.has_sense(&lower, PosTag::Noun) {
                    PosTag::Noun
                } else {
                    self.primary_sense(&lower).unwrap_or_else(|| suffix_guess(&lower))
                }
            };
            tags.push(tag);
            prev = if lower.is_empty() { None } else { Some(lower) };
        }

        tags
    }

    fn lookup_synsets(&self, word: &str, category: Option<PosTag>) -> Vec<Synset> {
        let lower = word.trim().to_lowercase();
        if lower.is_empty() {
            return Vec::new();
        }
        for form in Self::base_forms(&lower, category) {
            let senses = self.senses(&form, category);
            if !senses.is_empty() {
                return senses;
            }
        }
        Vec::new()
    }
}
