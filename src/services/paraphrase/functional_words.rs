// Functional-Word Table
// Closed-class words get a curated substitute list instead of a lexicon lookup.

const FUNCTIONAL_SYNONYMS: &[(&str, &[&str])] = &[
    ("when", &["while", "at the time", "during which", "as soon as"]),
    ("as", &["since", "because", "while", "in the role of"]),
    ("the", &["this", "that", "said", "the specific"]),
    ("if", &["provided that", "assuming", "in case", "whether"]),
    ("but", &["however", "although", "yet", "nevertheless"]),
    ("and", &["plus", "along with", "as well as", "together with"]),
    ("or", &["alternatively", "conversely", "on the other hand"]),
    ("because", &["since", "due to the fact", "as", "owing to"]),
    ("so", &["therefore", "thus", "consequently", "hence"]),
    ("with", &["alongside", "using", "accompanied by"]),
    ("without", &["lacking", "void of", "minus", "free from"]),
    ("to", &["towards", "in the direction of", "until"]),
    ("for", &["on behalf of", "in favor of", "intended for"]),
    ("is", &["remains", "exists as", "constitutes", "represents"]),
    ("are", &["remain", "exist as", "constitute", "represent"]),
    ("was", &["remained", "existed as", "constituted"]),
    ("very", &["extremely", "highly", "exceedingly", "truly"]),
    ("good", &["excellent", "beneficial", "favorable", "positive"]),
    ("bad", &["negative", "detrimental", "poor", "adverse"]),
    ("use", &["utilize", "employ", "apply", "leverage"]),
];

/// Fixed substitutes for `word` (case-insensitive), if it is a functional word
pub fn functional_substitutes(word: &str) -> Option<&'static [&'static str]> {
    let lower = word.trim().to_lowercase();
    FUNCTIONAL_SYNONYMS
        .iter()
        .find(|(key, _)| *key == lower)
        .map(|(_, subs)| *subs)
}

pub fn is_functional(word: &str) -> bool {
    functional_substitutes(word).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(functional_substitutes("But").unwrap()[0], "however");
        assert!(is_functional("THE"));
        assert!(!is_functional("flight"));
    }

    #[test]
    fn test_table_never_maps_word_to_itself() {
        for (key, subs) in FUNCTIONAL_SYNONYMS {
            assert!(!subs.is_empty());
            assert!(subs.iter().all(|s| s != key), "{} maps to itself", key);
        }
    }
}
