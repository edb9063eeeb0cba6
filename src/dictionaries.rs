#![allow(clippy::must_use_candidate)]

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// Word lists the grammar consults, as stored in `assets/dictionaries.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct DictionarySpec {
    pub infraspecific_ranks: IndexMap<String, String>,
    pub infrageneric_ranks: IndexMap<String, String>,
    pub approximations: Vec<String>,
    pub comparisons: Vec<String>,
    pub author_prefixes: Vec<String>,
    pub author_suffixes: Vec<String>,
    pub ex_markers: Vec<String>,
    pub emend_markers: Vec<String>,
    pub author_separators: Vec<String>,
    pub tail_annotations: Vec<String>,
    pub virus_markers: Vec<String>,
    pub no_parse_prefixes: Vec<String>,
    #[serde(default)]
    pub ligatures: IndexMap<String, String>,
}

pub struct Dictionaries {
    spec: DictionarySpec,
    approximations: HashSet<String>,
    comparisons: HashSet<String>,
    author_prefixes: HashSet<String>,
    author_suffixes: HashSet<String>,
    ex_markers: HashSet<String>,
    emend_markers: HashSet<String>,
    author_separators: HashSet<String>,
    tail_annotations: HashSet<String>,
    virus_markers: HashSet<String>,
    // Single-char transliterations keyed by char for the canonical pass
    ligatures: HashMap<char, String>,
}

fn to_set(words: &[String]) -> HashSet<String> {
    words.iter().cloned().collect()
}

impl Dictionaries {
    fn from_spec(spec: DictionarySpec) -> Self {
        Self {
            approximations: to_set(&spec.approximations),
            comparisons: to_set(&spec.comparisons),
            author_prefixes: to_set(&spec.author_prefixes),
            author_suffixes: to_set(&spec.author_suffixes),
            ex_markers: to_set(&spec.ex_markers),
            emend_markers: to_set(&spec.emend_markers),
            author_separators: to_set(&spec.author_separators),
            tail_annotations: to_set(&spec.tail_annotations),
            virus_markers: to_set(&spec.virus_markers),
            ligatures: spec
                .ligatures
                .iter()
                .filter_map(|(k, v)| {
                    let mut chars = k.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Some((c, v.clone())),
                        _ => None,
                    }
                })
                .collect(),
            spec,
        }
    }

    /// Normalized marker for an infraspecific rank (`ssp.` -> `subsp.`).
    pub fn infraspecific_rank(&self, word: &str) -> Option<&str> {
        self.spec
            .infraspecific_ranks
            .get(word)
            .map(String::as_str)
    }

    /// Normalized marker for a rank between genus and species, or above genus.
    pub fn infrageneric_rank(&self, word: &str) -> Option<&str> {
        self.spec.infrageneric_ranks.get(word).map(String::as_str)
    }

    pub fn is_rank(&self, word: &str) -> bool {
        self.infraspecific_rank(word).is_some() || self.infrageneric_rank(word).is_some()
    }

    pub fn is_approximation(&self, word: &str) -> bool {
        self.approximations.contains(word)
    }

    pub fn is_comparison(&self, word: &str) -> bool {
        self.comparisons.contains(word)
    }

    pub fn is_author_prefix(&self, word: &str) -> bool {
        self.author_prefixes.contains(word)
    }

    pub fn is_author_suffix(&self, word: &str) -> bool {
        self.author_suffixes.contains(word)
    }

    pub fn is_ex_marker(&self, word: &str) -> bool {
        self.ex_markers.contains(word)
    }

    pub fn is_emend_marker(&self, word: &str) -> bool {
        self.emend_markers.contains(word)
    }

    pub fn is_author_separator(&self, word: &str) -> bool {
        self.author_separators.contains(word)
    }

    pub fn is_tail_annotation(&self, word: &str) -> bool {
        self.tail_annotations.contains(word)
    }

    pub fn is_virus_marker(&self, word: &str) -> bool {
        self.virus_markers.contains(word)
    }

    pub fn no_parse_prefixes(&self) -> &[String] {
        &self.spec.no_parse_prefixes
    }

    pub fn ligature(&self, c: char) -> Option<&str> {
        self.ligatures.get(&c).map(String::as_str)
    }

    /// True for words the grammar reserves and never takes as an epithet.
    pub fn is_reserved(&self, word: &str) -> bool {
        self.is_rank(word)
            || self.is_approximation(word)
            || self.is_comparison(word)
            || self.is_ex_marker(word)
            || self.is_emend_marker(word)
            || self.is_author_separator(word)
    }
}

static EMBEDDED_DICTIONARIES_JSON: &str = include_str!("../assets/dictionaries.json");

pub static DICTIONARIES: Lazy<Dictionaries> = Lazy::new(|| {
    let spec: DictionarySpec = serde_json::from_str(EMBEDDED_DICTIONARIES_JSON)
        .expect("invalid embedded dictionaries.json");
    Dictionaries::from_spec(spec)
});

pub fn dictionaries() -> &'static Dictionaries {
    &DICTIONARIES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_markers_are_normalized() {
        let d = dictionaries();
        assert_eq!(d.infraspecific_rank("ssp."), Some("subsp."));
        assert_eq!(d.infraspecific_rank("forma"), Some("f."));
        assert_eq!(d.infraspecific_rank("var"), Some("var."));
        assert_eq!(d.infrageneric_rank("subg."), Some("subgen."));
        assert_eq!(d.infraspecific_rank("sapiens"), None);
    }

    #[test]
    fn reserved_words_cover_markers() {
        let d = dictionaries();
        for w in ["var.", "sp.", "cf.", "ex", "emend.", "et", "&", "sect."] {
            assert!(d.is_reserved(w), "{w} should be reserved");
        }
        assert!(!d.is_reserved("alba"));
    }

    #[test]
    fn ligatures_are_loaded_by_char() {
        let d = dictionaries();
        assert_eq!(d.ligature('æ'), Some("ae"));
        assert_eq!(d.ligature('Œ'), Some("Oe"));
        assert_eq!(d.ligature('a'), None);
    }

    #[test]
    fn prefixes_and_suffixes() {
        let d = dictionaries();
        assert!(d.is_author_prefix("van"));
        assert!(d.is_author_prefix("de"));
        assert!(d.is_author_suffix("f."));
        assert!(d.is_author_suffix("fil."));
        assert!(!d.is_author_prefix("alba"));
    }
}
