use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::Result;
use crate::services::json_io;
use crate::services::normalize::NormalizedWords;

fn bracket_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // [...] and 【...】, mixed pairs included; contents must be non-empty
    RE.get_or_init(|| Regex::new(r"[\[【].+?[\]】]").expect("valid bracket pattern"))
}

pub fn clean_meaning(meaning: &str) -> String {
    bracket_re()
        .replace_all(meaning, "")
        .chars()
        .filter(|c| !matches!(c, ' ' | '、' | '…'))
        .collect()
}

/// Distinct cleaned meanings, in sorted order.
pub fn extract<'a>(meanings: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    meanings.into_iter().map(clean_meaning).collect()
}

/// Writes the distinct meanings of the word mapping as one unseparated blob.
pub fn run(input: &Path, output: &Path) -> Result<usize> {
    let words = NormalizedWords::load(input)?;
    let cleaned = extract(words.meanings());

    let blob: String = cleaned.iter().map(String::as_str).collect();
    json_io::write_atomic(output, blob.as_bytes())?;

    tracing::info!(
        "extracted {} distinct meanings to {}",
        cleaned.len(),
        output.display()
    );
    Ok(cleaned.len())
}
