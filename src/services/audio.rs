use std::path::{Path, PathBuf};
use std::{thread, time::Duration};

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;

use crate::config::AudioConfig;
use crate::error::{Result, ToolError};
use crate::services::json_io;
use crate::services::normalize::NormalizedWords;

const BROWSER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub trait SpeechSynthesizer {
    /// Returns MP3 bytes for `text`.
    fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// Google Translate's public TTS endpoint. The accent is picked by the
/// top-level domain the request goes to.
pub struct GoogleTts {
    client: Client,
    lang: String,
    accent: String,
}

impl GoogleTts {
    pub fn new(cfg: &AudioConfig) -> Result<Self> {
        let mut builder = Client::builder().timeout(Duration::from_secs(cfg.timeout_secs));

        if let Some(proxy) = cfg.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| ToolError::Config(format!("invalid proxy {proxy}: {e}")))?;
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            client: builder.build()?,
            lang: cfg.lang.clone(),
            accent: cfg.accent.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("https://translate.google.{}/translate_tts", self.accent)
    }
}

impl SpeechSynthesizer for GoogleTts {
    fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get(self.endpoint())
            .header(USER_AGENT, BROWSER_AGENT)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.lang.as_str()),
                ("q", text),
            ])
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ToolError::Api(format!("TTS HTTP {}", status.as_u16())));
        }

        let bytes = resp.bytes()?;
        if bytes.is_empty() {
            return Err(ToolError::Api("TTS returned an empty body".into()));
        }
        Ok(bytes.to_vec())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordOutcome {
    Downloaded,
    Skipped,
    Failed,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct AudioReport {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct AudioFetcher<S> {
    synth: S,
    output_dir: PathBuf,
    max_attempts: usize,
    retry_delay: Duration,
}

impl<S: SpeechSynthesizer> AudioFetcher<S> {
    pub fn new(synth: S, cfg: &AudioConfig) -> Self {
        Self {
            synth,
            output_dir: cfg.output_dir.clone(),
            max_attempts: cfg.max_attempts.max(1),
            retry_delay: Duration::from_millis(cfg.retry_delay_ms),
        }
    }

    pub fn audio_path(&self, word: &str) -> PathBuf {
        self.output_dir.join(format!("{word}.mp3"))
    }

    pub fn fetch_all(&self, words: &[&str]) -> Result<AudioReport> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| ToolError::io(&self.output_dir, e))?;

        let total = words.len();
        let mut report = AudioReport::default();

        for (i, &word) in words.iter().enumerate() {
            let outcome = self.fetch_word(word);
            match outcome {
                WordOutcome::Downloaded => report.downloaded += 1,
                WordOutcome::Skipped => report.skipped += 1,
                WordOutcome::Failed => report.failed += 1,
            }
            tracing::info!("[{}/{}] {word}: {outcome:?}", i + 1, total);
        }

        Ok(report)
    }

    pub fn fetch_word(&self, word: &str) -> WordOutcome {
        if word.trim().is_empty() || word.contains(['/', '\\']) {
            tracing::warn!("{word:?} cannot be used as a file name");
            return WordOutcome::Failed;
        }

        let path = self.audio_path(word);
        if path.exists() {
            return WordOutcome::Skipped;
        }

        for attempt in 1..=self.max_attempts {
            match self.download(word, &path) {
                Ok(()) => return WordOutcome::Downloaded,
                Err(e) => {
                    tracing::warn!(
                        "{word}: attempt {attempt}/{} failed: {e}",
                        self.max_attempts
                    );
                    if attempt < self.max_attempts {
                        thread::sleep(self.retry_delay);
                    }
                }
            }
        }

        tracing::warn!("{word}: giving up after {} attempts", self.max_attempts);
        WordOutcome::Failed
    }

    fn download(&self, word: &str, path: &Path) -> Result<()> {
        let audio = self.synth.synthesize(word)?;
        json_io::write_atomic(path, &audio)
    }
}

pub fn run(cfg: &AudioConfig) -> Result<AudioReport> {
    let words = NormalizedWords::load(&cfg.input)?;
    let fetcher = AudioFetcher::new(GoogleTts::new(cfg)?, cfg);

    let report = fetcher.fetch_all(&words.words().collect::<Vec<_>>())?;
    tracing::info!(
        "audio done: {} downloaded, {} skipped, {} failed",
        report.downloaded,
        report.skipped,
        report.failed
    );
    Ok(report)
}
