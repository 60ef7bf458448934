// Text Processing Service
// Sentence segmentation, word tokenization and sentence reconstruction

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Abbreviations whose trailing period never ends a sentence.
const ABBREVIATIONS: &[&str] = &[
    "e.g.", "i.e.", "etc.", "vs.", "mr.", "mrs.", "ms.", "dr.", "prof.", "fig.", "eq.", "inc.",
    "ltd.", "jr.", "sr.",
];

/// Abbreviations that only hold when a number follows ("No. 5", "pp. 12").
const NUMBERED_ABBREVIATIONS: &[&str] = &["no.", "pp."];

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[\p{L}\p{N}_]+(?:['’-][\p{L}\p{N}_]+)*|[^\s\p{L}\p{N}_]")
            .expect("word regex")
    })
}

fn space_before_punct_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+([?.!,:;])").expect("punctuation spacing regex"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceOffset {
    pub text: String,
    /// UTF-8 byte offset (0-based) into the segmented text.
    pub start: usize,
    /// UTF-8 byte offset (end-exclusive).
    pub end: usize,
}

fn ends_with_word(lower: &str, abbr: &str) -> bool {
    lower.strip_suffix(abbr).map_or(false, |head| {
        head.is_empty() || head.ends_with(|c: char| !c.is_alphanumeric())
    })
}

/// `next` is the first non-whitespace character after the period, if any.
fn ends_with_abbreviation(buffer: &str, next: Option<char>) -> bool {
    let lower = buffer.trim_end().to_lowercase();
    if ABBREVIATIONS.iter().any(|abbr| ends_with_word(&lower, abbr)) {
        return true;
    }
    if next.map_or(false, |c| c.is_ascii_digit())
        && NUMBERED_ABBREVIATIONS.iter().any(|abbr| ends_with_word(&lower, abbr))
    {
        return true;
    }

    // Single capital initial such as "J." in "J. Smith".
    let chars: Vec<char> = buffer.trim_end().chars().collect();
    let n = chars.len();
    n >= 2
        && chars[n - 1] == '.'
        && chars[n - 2].is_uppercase()
        && (n == 2 || !chars[n - 3].is_alphanumeric())
}

/// Sentence splitting with offset tracking.
/// Quote-aware, keeps decimals and common abbreviations intact.
pub fn split_sentences_advanced(text: &str) -> Vec<SentenceOffset> {
    if text.trim().is_empty() {
        return vec![];
    }

    let mut sentences = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let quote_chars = ['"', '\u{201c}', '\u{201d}'];

    let mut current_start: usize = 0;
    let mut buffer = String::new();
    let mut in_quote = false;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        buffer.push(ch);

        if quote_chars.contains(&ch) {
            in_quote = !in_quote;
        }

        let mut is_sentence_end = false;
        if ['。', '！', '？', '.', '!', '?'].contains(&ch) && !in_quote {
            let next = chars.get(i + 1).copied();
            let ascii_end = matches!(ch, '.' | '!' | '?');

            if ascii_end && next.map(|c| !c.is_whitespace()).unwrap_or(false) {
                // "3.14", "example.com", "?!", "..." all continue
                is_sentence_end = false;
            } else if ch == '.'
                && ends_with_abbreviation(
                    &buffer,
                    chars[i + 1..].iter().copied().find(|c| !c.is_whitespace()),
                )
            {
                is_sentence_end = false;
            } else {
                is_sentence_end = true;
            }
        }

        if is_sentence_end {
            while i + 1 < chars.len() && chars[i + 1].is_whitespace() {
                i += 1;
                buffer.push(chars[i]);
            }

            let sentence_text = buffer.trim().to_string();
            if !sentence_text.is_empty() {
                sentences.push(SentenceOffset {
                    text: sentence_text,
                    start: current_start,
                    end: current_start + buffer.len(),
                });
            }
            current_start += buffer.len();
            buffer.clear();
        }

        i += 1;
    }

    let remaining = buffer.trim().to_string();
    if !remaining.is_empty() {
        sentences.push(SentenceOffset {
            text: remaining,
            start: current_start,
            end: text.len(),
        });
    }

    sentences
}

/// Split text into trimmed sentence strings, in source order
pub fn split_sentences(text: &str) -> Vec<String> {
    split_sentences_advanced(text)
        .into_iter()
        .map(|s| s.text)
        .collect()
}

/// Split a sentence into word and punctuation tokens.
/// Internal apostrophes and hyphens stay inside the word.
pub fn tokenize_words(text: &str) -> Vec<String> {
    word_re()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Remove everything that is neither a word character nor whitespace
pub fn strip_punctuation(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect()
}

/// Join tokens with single spaces, then attach `. , ! ? : ;` to the preceding word
pub fn reconstruct_sentence<S: AsRef<str>>(tokens: &[S]) -> String {
    let joined = tokens
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(" ");
    space_before_punct_re().replace_all(&joined, "$1").to_string()
}

/// Upper-case the first character, leaving the rest untouched
pub fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
