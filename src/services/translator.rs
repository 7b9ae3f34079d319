use std::{thread, time::Duration};

use crate::config::BaiduConfig;
use crate::services::baidu::{ApiReply, TranslationApi};
use crate::services::translation_cache::TranslationCache;

/// Result of resolving one description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub text: String,
    pub source: Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Live,
    /// The original text, standing in for a failed translation.
    Untranslated,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TranslateStats {
    pub cache_hits: usize,
    pub live: usize,
    pub failed: usize,
}

pub struct DescTranslator<A> {
    api: A,
    enabled: bool,
    rate_limit_retries: usize,
    rate_limit_delay: Duration,
    courtesy_delay: Duration,
    pub stats: TranslateStats,
}

impl<A: TranslationApi> DescTranslator<A> {
    pub fn new(api: A, cfg: &BaiduConfig) -> Self {
        let enabled = cfg.has_credentials();
        if !enabled {
            tracing::warn!(
                "Baidu credentials missing; uncached descriptions keep their English text"
            );
        }

        Self {
            api,
            enabled,
            rate_limit_retries: cfg.rate_limit_retries,
            rate_limit_delay: Duration::from_millis(cfg.rate_limit_delay_ms),
            courtesy_delay: Duration::from_millis(cfg.courtesy_delay_ms),
            stats: TranslateStats::default(),
        }
    }

    /// Live call. Returns the translation, or `None` when the original text
    /// should stand in.
    ///
    /// Rate-limit replies are retried at most `rate_limit_retries` times.
    pub fn translate(&self, text: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let mut retries = 0usize;
        loop {
            match self.api.request(text) {
                ApiReply::Translated(dst) => {
                    thread::sleep(self.courtesy_delay);
                    return Some(dst);
                }
                ApiReply::RateLimited if retries < self.rate_limit_retries => {
                    retries += 1;
                    tracing::info!(
                        "rate limited, waiting {:?} (retry {retries}/{})",
                        self.rate_limit_delay,
                        self.rate_limit_retries
                    );
                    thread::sleep(self.rate_limit_delay);
                }
                ApiReply::RateLimited => {
                    tracing::warn!("still rate limited after {retries} retries, giving up");
                    return None;
                }
                ApiReply::QuotaExhausted => {
                    tracing::warn!("translation quota exhausted, try again tomorrow");
                    return None;
                }
                ApiReply::Failed(msg) => {
                    tracing::warn!("translation failed: {msg}");
                    return None;
                }
            }
        }
    }

    /// Cache first, then a live call. Live results are persisted before
    /// this returns; failures are never cached.
    pub fn resolve(&mut self, cache: &mut TranslationCache, key: &str, text: &str) -> Resolved {
        if let Some(hit) = cache.get(key) {
            self.stats.cache_hits += 1;
            return Resolved {
                text: hit.to_string(),
                source: Source::Cache,
            };
        }

        match self.translate(text) {
            Some(dst) => {
                self.stats.live += 1;
                if let Err(e) = cache.insert(key.to_string(), dst.clone()) {
                    tracing::error!("failed to persist {key} to {}: {e}", cache.path().display());
                }
                Resolved {
                    text: dst,
                    source: Source::Live,
                }
            }
            None => {
                self.stats.failed += 1;
                Resolved {
                    text: text.to_string(),
                    source: Source::Untranslated,
                }
            }
        }
    }

    pub fn take_stats(&mut self) -> TranslateStats {
        std::mem::take(&mut self.stats)
    }
}
