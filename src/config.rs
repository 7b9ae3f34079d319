use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};
use crate::model::category::Category;
use crate::services::encoding;

pub const DEFAULT_CONFIG_FILE: &str = "wordkit.json";

fn default_vocabulary_file() -> PathBuf {
    PathBuf::from("WordData_GraduateStudent.json")
}

fn default_word_file() -> PathBuf {
    PathBuf::from("WordData.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub normalize: NormalizeConfig,
    pub audio: AudioConfig,
    pub meanings: MeaningsConfig,
    pub format: FormatConfig,
    pub pokemon: PokemonConfig,
}

impl Config {
    /// Loads the file named by `WORDKIT_CONFIG`, falling back to
    /// `wordkit.json`. A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = env::var("WORDKIT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = Self::from_file(&path)?;
        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let text = encoding::read_text(path)?;
        serde_json::from_str(&text)
            .map_err(|e| ToolError::Config(format!("{}: {e}", path.display())))
    }

    fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Baidu credentials from `BAIDU_APP_ID` and `BAIDU_SECRET_KEY` win over
    /// the file.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("BAIDU_APP_ID") {
            self.pokemon.baidu.app_id = v;
        }
        if let Some(v) = lookup("BAIDU_SECRET_KEY") {
            self.pokemon.baidu.secret_key = v;
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct NormalizeConfig {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            input: default_vocabulary_file(),
            output: default_word_file(),
        }
    }
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_accent() -> String {
    "com".to_string()
}

fn default_max_attempts() -> usize {
    3
}

fn default_retry_delay_ms() -> u64 {
    2000
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AudioConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Spoken language, e.g. `en`.
    #[serde(default = "default_lang")]
    pub lang: String,
    /// Accent as a top-level domain: `com`, `co.uk`, `com.au`, ...
    #[serde(default = "default_accent")]
    pub accent: String,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Overrides HTTP_PROXY/HTTPS_PROXY when set.
    pub proxy: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            input: default_word_file(),
            output_dir: default_output_dir(),
            lang: default_lang(),
            accent: default_accent(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            timeout_secs: default_timeout_secs(),
            proxy: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct MeaningsConfig {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Default for MeaningsConfig {
    fn default() -> Self {
        Self {
            input: default_word_file(),
            output: PathBuf::from("chinese_meanings.txt"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct FormatConfig {
    pub input: PathBuf,
    /// Rewrites `input` in place when unset.
    pub output: Option<PathBuf>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            input: default_vocabulary_file(),
            output: None,
        }
    }
}

fn default_generation() -> String {
    "gen4".to_string()
}

fn default_categories() -> Vec<Category> {
    vec![Category::Items, Category::Moves]
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PokemonConfig {
    #[serde(default = "default_generation")]
    pub generation: String,
    pub data_dir: PathBuf,
    pub translations_dir: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,
    pub baidu: BaiduConfig,
}

impl Default for PokemonConfig {
    fn default() -> Self {
        Self {
            generation: default_generation(),
            data_dir: PathBuf::from("json_data"),
            translations_dir: PathBuf::from("translations"),
            output_dir: default_output_dir(),
            categories: default_categories(),
            baidu: BaiduConfig::default(),
        }
    }
}

impl PokemonConfig {
    pub fn data_path(&self, category: Category) -> PathBuf {
        self.data_dir.join(category.data_file(&self.generation))
    }

    pub fn output_path(&self, category: Category) -> PathBuf {
        self.output_dir.join(category.data_file(&self.generation))
    }

    pub fn dictionary_path(&self, file_name: &str) -> PathBuf {
        self.translations_dir.join(file_name)
    }
}

fn default_endpoint() -> String {
    "https://fanyi-api.baidu.com/api/trans/vip/translate".to_string()
}

fn default_from_lang() -> String {
    "en".to_string()
}

fn default_to_lang() -> String {
    "zh".to_string()
}

fn default_rate_limit_retries() -> usize {
    10
}

fn default_rate_limit_delay_ms() -> u64 {
    1000
}

fn default_courtesy_delay_ms() -> u64 {
    1500
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct BaiduConfig {
    pub app_id: String,
    pub secret_key: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_from_lang")]
    pub from: String,
    #[serde(default = "default_to_lang")]
    pub to: String,
    #[serde(default = "default_rate_limit_retries")]
    pub rate_limit_retries: usize,
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,
    /// Pause after every successful live call.
    #[serde(default = "default_courtesy_delay_ms")]
    pub courtesy_delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BaiduConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            secret_key: String::new(),
            endpoint: default_endpoint(),
            from: default_from_lang(),
            to: default_to_lang(),
            rate_limit_retries: default_rate_limit_retries(),
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            courtesy_delay_ms: default_courtesy_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BaiduConfig {
    pub fn has_credentials(&self) -> bool {
        !self.app_id.trim().is_empty() && !self.secret_key.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let config = Config::from_file(&temp.path().join("wordkit.json")).unwrap();
        assert_eq!(config.normalize.output, PathBuf::from("WordData.json"));
        assert_eq!(config.audio.max_attempts, 3);
        assert_eq!(config.pokemon.categories, [Category::Items, Category::Moves]);
        assert_eq!(config.pokemon.baidu.rate_limit_delay_ms, 1000);
    }

    #[test]
    fn baidu_credentials_from_env_override_the_file() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("wordkit.json");
        std::fs::write(
            &path,
            r#"{ "pokemon": { "baidu": { "app_id": "file-id", "secret_key": "file-key" } } }"#,
        )
        .unwrap();

        let mut config = Config::from_file(&path).unwrap();
        config.apply_overrides(|key| (key == "BAIDU_SECRET_KEY").then(|| "env-key".to_string()));

        assert_eq!(config.pokemon.baidu.app_id, "file-id");
        assert_eq!(config.pokemon.baidu.secret_key, "env-key");
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("wordkit.json");
        std::fs::write(
            &path,
            r#"{ "audio": { "accent": "co.uk" }, "pokemon": { "categories": ["abilities"] } }"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.audio.accent, "co.uk");
        assert_eq!(config.audio.lang, "en");
        assert_eq!(config.audio.retry_delay_ms, 2000);
        assert_eq!(config.pokemon.categories, [Category::Abilities]);
        assert_eq!(config.pokemon.generation, "gen4");
    }

    #[test]
    fn invalid_file_is_a_config_error() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("wordkit.json");
        std::fs::write(&path, r#"{ "audio": { "max_attempts": "three" } }"#).unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(ToolError::Config(_))
        ));
    }

    #[test]
    fn pokemon_paths_join_generation_files() {
        let config = PokemonConfig::default();
        assert_eq!(
            config.data_path(Category::Abilities),
            PathBuf::from("json_data").join("gen4_abilities.json")
        );
        assert_eq!(
            config.output_path(Category::Pokemon),
            PathBuf::from("output").join("gen4_pokemons.json")
        );
    }

    #[test]
    fn credentials_require_both_halves() {
        let mut baidu = BaiduConfig::default();
        assert!(!baidu.has_credentials());
        baidu.app_id = "20250220000000000".into();
        assert!(!baidu.has_credentials());
        baidu.secret_key = "secret".into();
        assert!(baidu.has_credentials());
    }
}
