use std::collections::HashMap;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Result;
use crate::model::vocabulary::VocabularyEntry;
use crate::services::json_io::{self, WIDE_INDENT};

const SEPARATORS: [char; 4] = ['；', ';', '，', ','];
const STRIPPED: [char; 3] = ['<', '>', '/'];

/// Ordered `word → meaning` mapping.
///
/// Inserting a word that is already present keeps its position and takes the
/// new meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedWords {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl NormalizedWords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, word: String, meaning: String) {
        match self.index.get(&word) {
            Some(&i) => self.entries[i].1 = meaning,
            None => {
                self.index.insert(word.clone(), self.entries.len());
                self.entries.push((word, meaning));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(w, _)| w.as_str())
    }

    pub fn meanings(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, m)| m.as_str())
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(w, m)| (w.as_str(), m.as_str()))
    }

    /// Stable sort by [`sort_key`].
    pub fn sort(&mut self) {
        self.entries.sort_by_cached_key(|(w, _)| sort_key(w));
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (w, _))| (w.clone(), i))
            .collect();
    }

    pub fn load(path: &Path) -> Result<Self> {
        json_io::read_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        json_io::write_json(path, self, WIDE_INDENT)
    }
}

impl Serialize for NormalizedWords {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (w, m) in &self.entries {
            map.serialize_entry(w, m)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NormalizedWords {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct WordsVisitor;

        impl<'de> Visitor<'de> for WordsVisitor {
            type Value = NormalizedWords;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("an object of word to meaning strings")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<NormalizedWords, A::Error> {
                let mut words = NormalizedWords::new();
                while let Some((w, m)) = access.next_entry::<String, String>()? {
                    words.insert(w, m);
                }
                Ok(words)
            }
        }

        deserializer.deserialize_map(WordsVisitor)
    }
}

/// Alphanumerics of the word, lowercased.
pub fn sort_key(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Reduces a translation string to its headline meaning.
///
/// Separators are applied one after another in a fixed order, each keeping
/// only the text before it. Parenthetical remarks are cut afterwards.
pub fn first_meaning(translation: &str) -> String {
    let cleaned: String = translation.chars().filter(|c| !STRIPPED.contains(c)).collect();
    let mut result = cleaned.trim();
    if result.is_empty() {
        return String::new();
    }

    for sep in SEPARATORS {
        if let Some((head, _)) = result.split_once(sep) {
            result = head;
        }
    }
    result = result.trim();

    if let Some((head, _)) = result.split_once('(') {
        result = head;
    }
    if let Some((head, _)) = result.split_once('（') {
        result = head;
    }

    result.trim().to_string()
}

pub fn normalize_entries(entries: &[VocabularyEntry]) -> NormalizedWords {
    let mut words = NormalizedWords::new();

    for entry in entries {
        let (Some(word), Some(translation)) = (entry.word.as_deref(), entry.first_translation())
        else {
            continue;
        };

        let meaning = first_meaning(translation);
        if meaning.is_empty() {
            tracing::debug!("dropping {word}: empty meaning");
            continue;
        }
        words.insert(word.to_string(), meaning);
    }

    words.sort();
    words
}

/// Reads the vocabulary file and writes the sorted mapping.
///
/// Nothing is written unless the whole input loads.
pub fn run(input: &Path, output: &Path) -> Result<usize> {
    let entries: Vec<VocabularyEntry> = json_io::read_json(input)?;
    if entries.is_empty() {
        tracing::warn!("{} holds no vocabulary entries", input.display());
    }

    let words = normalize_entries(&entries);
    if words.is_empty() {
        tracing::warn!("no meanings extracted from {}", input.display());
    }

    words.save(output)?;
    tracing::info!("wrote {} words to {}", words.len(), output.display());
    Ok(words.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(json: &str) -> Vec<VocabularyEntry> {
        serde_json::from_str(json).expect("valid vocabulary")
    }

    #[test]
    fn first_meaning_cuts_at_separator_and_parenthesis() {
        assert_eq!(first_meaning("减少；减弱（语气等）"), "减少");
        assert_eq!(first_meaning("放弃(权利), 抛弃"), "放弃");
        assert_eq!(first_meaning("  缩写（abbr.）  "), "缩写");
    }

    #[test]
    fn first_meaning_applies_separators_in_priority_order() {
        // the full-width semicolon wins even though the comma comes first
        assert_eq!(first_meaning("甲,乙；丙"), "甲");
        assert_eq!(first_meaning("甲，乙;丙"), "甲");
    }

    #[test]
    fn first_meaning_strips_markup_characters() {
        assert_eq!(first_meaning("<b>突然的</b>"), "b突然的b");
        assert_eq!(first_meaning("和/或"), "和或");
    }

    #[test]
    fn first_meaning_can_be_empty() {
        assert_eq!(first_meaning("</>"), "");
        assert_eq!(first_meaning("（仅用于复数）"), "");
        assert_eq!(first_meaning("；后面"), "");
    }

    #[test]
    fn sort_key_ignores_case_and_punctuation() {
        assert_eq!(sort_key("A-Level"), "alevel");
        assert_eq!(sort_key("o'clock"), "oclock");
        assert_eq!(sort_key("café"), "caf");
    }

    #[test]
    fn normalize_example_entry() {
        let words = normalize_entries(&entries(
            r#"[{"word":"abate","translations":[{"translation":"减少；减弱（语气等）"}]}]"#,
        ));
        assert_eq!(words.iter().collect::<Vec<_>>(), [("abate", "减少")]);
    }

    #[test]
    fn normalize_skips_entries_without_translations_or_meaning() {
        let words = normalize_entries(&entries(
            r#"[
                {"word":"alpha"},
                {"word":"beta","translations":[]},
                {"word":"gamma","translations":[{"translation":"（复数）"}]},
                {"word":"delta","translations":[{"translation":"三角洲"},{"translation":"第四"}]}
            ]"#,
        ));
        assert_eq!(words.iter().collect::<Vec<_>>(), [("delta", "三角洲")]);
    }

    #[test]
    fn irregular_entries_are_skipped_without_failing_the_batch() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let input = temp.path().join("vocab.json");
        let output = temp.path().join("WordData.json");
        std::fs::write(
            &input,
            r#"[
                {"word":"abate","translations":[{"translation":"减少"},{"type":"v"}]},
                {"word":"ghost","translations":null},
                {"translations":[{"translation":"无词"}]},
                {"word":"hollow","translations":[{"type":"adj"}]},
                {"word":"idle","translations":[{"translation":null}]}
            ]"#,
        )
        .unwrap();

        assert_eq!(run(&input, &output).unwrap(), 1);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "{\n    \"abate\": \"减少\"\n}"
        );
    }

    #[test]
    fn normalize_sorts_by_cleaned_key_and_keeps_ties_stable() {
        let words = normalize_entries(&entries(
            r#"[
                {"word":"Zeal","translations":[{"translation":"热情"}]},
                {"word":"a.m.","translations":[{"translation":"上午"}]},
                {"word":"am","translations":[{"translation":"是"}]},
                {"word":"Able","translations":[{"translation":"能够的"}]}
            ]"#,
        ));
        assert_eq!(words.words().collect::<Vec<_>>(), ["Able", "a.m.", "am", "Zeal"]);

        let keys: Vec<String> = words.words().map(sort_key).collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn duplicate_word_keeps_first_position_with_last_meaning() {
        let mut words = NormalizedWords::new();
        words.insert("a".into(), "一".into());
        words.insert("b".into(), "二".into());
        words.insert("a".into(), "壹".into());
        assert_eq!(words.iter().collect::<Vec<_>>(), [("a", "壹"), ("b", "二")]);
    }

    #[test]
    fn run_is_byte_identical_across_reruns() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let input = temp.path().join("vocab.json");
        let output = temp.path().join("WordData.json");
        std::fs::write(
            &input,
            r#"[{"word":"abate","translations":[{"translation":"减少；减弱（语气等）"}]},
                {"word":"Abandon","translations":[{"translation":"放弃，抛弃"}]}]"#,
        )
        .unwrap();

        assert_eq!(run(&input, &output).unwrap(), 2);
        let first = std::fs::read(&output).unwrap();
        run(&input, &output).unwrap();
        let second = std::fs::read(&output).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            String::from_utf8(first).unwrap(),
            "{\n    \"Abandon\": \"放弃\",\n    \"abate\": \"减少\"\n}"
        );
    }

    #[test]
    fn run_writes_nothing_when_input_is_malformed() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let input = temp.path().join("vocab.json");
        let output = temp.path().join("WordData.json");
        std::fs::write(&input, r#"[{"word":"abate","translations":[{"translation":"#).unwrap();

        assert!(run(&input, &output).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn saved_mapping_loads_back_in_order() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("WordData.json");
        let mut words = NormalizedWords::new();
        words.insert("b".into(), "二".into());
        words.insert("a".into(), "一".into());
        words.save(&path).unwrap();

        let loaded = NormalizedWords::load(&path).unwrap();
        assert_eq!(loaded, words);
    }
}
