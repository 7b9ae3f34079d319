use serde::{Deserialize, Serialize};

/// One entry of the vocabulary export. Irregular entries (no word, null or
/// missing translations) still load and are skipped when normalizing.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VocabularyEntry {
    #[serde(default)]
    pub word: Option<String>,

    #[serde(default)]
    pub translations: Option<Vec<TranslationItem>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationItem {
    #[serde(default)]
    pub translation: Option<String>,
}

impl VocabularyEntry {
    /// Only the first item counts; later items need not carry a translation.
    pub fn first_translation(&self) -> Option<&str> {
        self.translations
            .as_deref()?
            .first()?
            .translation
            .as_deref()
    }
}
