use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::config::PokemonConfig;
use crate::error::{Result, ToolError};
use crate::model::category::Category;
use crate::model::record::Record;
use crate::services::baidu::{BaiduClient, TranslationApi};
use crate::services::json_io::{self, NARROW_INDENT};
use crate::services::translation_cache::{DescField, TranslationCache};
use crate::services::translator::{DescTranslator, TranslateStats};

const TYPE_DICTIONARY: &str = "type_translations.json";
const SKILL_UP_DICTIONARY: &str = "pokemon_moves_up.json";
const MEGA: &str = "超级";

/// Read-only `englishKey → value` lookup table.
#[derive(Debug, Default, Clone)]
pub struct Dictionary(HashMap<String, Value>);

impl Dictionary {
    /// Load failures are logged and give an empty dictionary.
    pub fn load(path: &Path) -> Self {
        match json_io::read_json::<HashMap<String, Value>>(path) {
            Ok(map) => Dictionary(map),
            Err(e) => {
                tracing::error!("error loading {}: {e}", path.display());
                Dictionary::default()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Translates a string value, falling back to the value itself.
    pub fn lookup_or_keep(&self, value: &Value) -> Value {
        value
            .as_str()
            .and_then(|s| self.get(s))
            .unwrap_or(value)
            .clone()
    }
}

impl FromIterator<(String, Value)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Dictionary(iter.into_iter().collect())
    }
}

/// Load failures are logged and give no records.
pub fn load_records(path: &Path) -> Vec<Record> {
    match json_io::read_json(path) {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("error loading {}: {e}", path.display());
            Vec::new()
        }
    }
}

pub fn save_records(records: &[Record], path: &Path) -> Result<()> {
    json_io::write_json(path, records, NARROW_INDENT)?;
    tracing::info!("saved {}", path.display());
    Ok(())
}

/// Drops Chinese descriptions left over from an earlier run.
pub fn clean_existing_translations(records: &mut [Record]) {
    for record in records {
        for field in DescField::ALL {
            record.remove(field.chinese_key());
        }
    }
}

/// Names that occur more than once and would therefore share cache keys.
pub fn duplicate_names(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut dups = Vec::new();
    for name in records.iter().filter_map(Record::name) {
        if !seen.insert(name) && !dups.iter().any(|d| d == name) {
            dups.push(name.to_string());
        }
    }
    dups
}

/// Adds `chineseName`, `chineseDesc` and `chineseShortDesc` to an ability,
/// item or move. Records whose name has no static translation are left as
/// they are. Returns whether the record was augmented.
pub fn augment_described<A: TranslationApi>(
    record: &mut Record,
    names: &Dictionary,
    cache: &mut TranslationCache,
    translator: &mut DescTranslator<A>,
) -> bool {
    let Some(name) = record.name().map(str::to_string) else {
        return false;
    };
    let Some(chinese_name) = names.get(&name) else {
        return false;
    };

    record.insert_after("name", "chineseName", chinese_name.clone());

    for field in DescField::ALL {
        let Some(text) = record.get_str(field.source_key()).map(str::to_string) else {
            continue;
        };

        let resolved = translator.resolve(cache, &field.cache_key(&name), &text);
        tracing::debug!("{name} {}: {:?}", field.source_key(), resolved.source);
        record.insert_after(
            field.source_key(),
            field.chinese_key(),
            Value::String(resolved.text),
        );
    }

    true
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CategoryReport {
    pub records: usize,
    pub augmented: usize,
    pub stats: TranslateStats,
}

/// Translates one description category (abilities, items or moves) and
/// writes it to the output directory.
pub fn translate_category<A: TranslationApi>(
    cfg: &PokemonConfig,
    category: Category,
    translator: &mut DescTranslator<A>,
) -> Result<CategoryReport> {
    let cache_file = category.cache_file().ok_or_else(|| {
        ToolError::InvalidInput(format!("{category} records carry no descriptions"))
    })?;

    tracing::info!("translating {category}...");

    let mut cache = TranslationCache::load(&cfg.dictionary_path(cache_file))?;
    tracing::info!("{category}: {} cached descriptions", cache.len());
    let names = Dictionary::load(&cfg.dictionary_path(category.name_dictionary_file()));
    let mut records = load_records(&cfg.data_path(category));

    clean_existing_translations(&mut records);

    let dups = duplicate_names(&records);
    if !dups.is_empty() {
        tracing::warn!(
            "{category}: duplicate names share cached descriptions: {}",
            dups.join(", ")
        );
    }

    let total = records.len();
    let mut augmented = 0usize;
    for (i, record) in records.iter_mut().enumerate() {
        if augment_described(record, &names, &mut cache, translator) {
            augmented += 1;
        }
        tracing::info!(
            "[{category} {}/{}] {}",
            i + 1,
            total,
            record.name().unwrap_or("<unnamed>")
        );
    }

    save_records(&records, &cfg.output_path(category))?;

    Ok(CategoryReport {
        records: total,
        augmented,
        stats: translator.take_stats(),
    })
}

/// Lookup tables for the pokemon category.
#[derive(Debug, Default)]
pub struct PokemonDictionaries {
    pub names: Dictionary,
    pub types: Dictionary,
    pub abilities: Dictionary,
    pub skill_up: Dictionary,
}

impl PokemonDictionaries {
    pub fn load(cfg: &PokemonConfig) -> Self {
        Self {
            names: Dictionary::load(&cfg.dictionary_path(Category::Pokemon.name_dictionary_file())),
            types: Dictionary::load(&cfg.dictionary_path(TYPE_DICTIONARY)),
            abilities: Dictionary::load(
                &cfg.dictionary_path(Category::Abilities.name_dictionary_file()),
            ),
            skill_up: Dictionary::load(&cfg.dictionary_path(SKILL_UP_DICTIONARY)),
        }
    }
}

pub fn augment_pokemon(record: &mut Record, dicts: &PokemonDictionaries) {
    let name = record.name().map(str::to_string);

    if let Some(chinese) = name.as_deref().and_then(|n| dicts.names.get(n)) {
        record.insert_after("name", "chineseName", chinese.clone());
    }

    let chinese_types: Option<Vec<Value>> = record
        .get("types")
        .and_then(Value::as_array)
        .map(|types| types.iter().map(|t| dicts.types.lookup_or_keep(t)).collect());
    if let Some(chinese) = chinese_types {
        record.insert_after("types", "chineseTypes", Value::Array(chinese));
    }

    let chinese_abilities: Option<Map<String, Value>> = record
        .get("abilities")
        .and_then(Value::as_object)
        .map(|abilities| {
            abilities
                .iter()
                .map(|(slot, ability)| (slot.clone(), dicts.abilities.lookup_or_keep(ability)))
                .collect()
        });
    if let Some(chinese) = chinese_abilities {
        record.insert_after("abilities", "chineseAbilities", Value::Object(chinese));
    }

    if let Some(skill_up) = name.as_deref().and_then(|n| dicts.skill_up.get(n)) {
        record.set("SkillUp", skill_up.clone());
    }
}

pub fn translate_pokemon(cfg: &PokemonConfig) -> Result<usize> {
    tracing::info!("translating pokemon...");

    let dicts = PokemonDictionaries::load(cfg);
    let mut records = load_records(&cfg.data_path(Category::Pokemon));

    let total = records.len();
    for (i, record) in records.iter_mut().enumerate() {
        augment_pokemon(record, &dicts);
        tracing::info!(
            "[pokemon {}/{}] {}",
            i + 1,
            total,
            record.name().unwrap_or("<unnamed>")
        );
    }

    save_records(&records, &cfg.output_path(Category::Pokemon))?;
    Ok(total)
}

fn form_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\((.*?)\)").expect("valid form pattern"))
}

/// Keeps base forms and Mega forms; drops every other parenthesised form.
pub fn keep_pokemon(record: &Record) -> bool {
    let Some(name) = record.get_str("chineseName") else {
        return true;
    };
    if !name.contains(['(', '（']) {
        return true;
    }

    let name = name.replace('（', "(").replace('）', ")");
    match form_re().captures(&name) {
        Some(caps) if &caps[1] != MEGA => {
            tracing::info!("dropping {name}");
            false
        }
        _ => true,
    }
}

/// Rewrites the translated pokemon file without alternate forms.
/// Returns how many records were dropped.
pub fn filter_names(path: &Path) -> Result<usize> {
    let records: Vec<Record> = json_io::read_json(path)?;
    let before = records.len();

    let kept: Vec<Record> = records.into_iter().filter(keep_pokemon).collect();
    let dropped = before - kept.len();

    save_records(&kept, path)?;
    tracing::info!("kept {} of {} pokemon", kept.len(), before);
    Ok(dropped)
}

/// Runs the configured categories against the Baidu API, optionally followed
/// by the name filter.
pub fn run(cfg: &PokemonConfig, filter: bool) -> Result<()> {
    let mut translator = DescTranslator::new(BaiduClient::new(&cfg.baidu)?, &cfg.baidu);
    run_with(cfg, &mut translator, filter)
}

/// A failing category is logged and the rest still run.
pub fn run_with<A: TranslationApi>(
    cfg: &PokemonConfig,
    translator: &mut DescTranslator<A>,
    filter: bool,
) -> Result<()> {
    for &category in &cfg.categories {
        let result = match category {
            Category::Pokemon => translate_pokemon(cfg)
                .map(|total| tracing::info!("pokemon: {total} records augmented")),
            _ => translate_category(cfg, category, translator).map(|r| {
                tracing::info!(
                    "{category}: {}/{} named, {} cached, {} translated, {} failed",
                    r.augmented,
                    r.records,
                    r.stats.cache_hits,
                    r.stats.live,
                    r.stats.failed
                )
            }),
        };
        if let Err(e) = result {
            tracing::error!("{category} failed: {e}");
        }
    }

    if filter {
        let path = cfg.output_path(Category::Pokemon);
        if !cfg.categories.contains(&Category::Pokemon) && !path.exists() {
            tracing::warn!(
                "skipping name filter: pokemon is not configured and {} does not exist",
                path.display()
            );
        } else {
            filter_names(&path)?;
        }
    }

    tracing::info!("translation completed");
    Ok(())
}
