use rand::{thread_rng, Rng};
use reqwest::blocking::Client;
use serde_json::Value;

use std::time::Duration;

use crate::config::BaiduConfig;
use crate::error::Result;

const RATE_LIMITED: &str = "54003";
const QUOTA_EXHAUSTED: &str = "54004";

/// What a single translation request came back with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiReply {
    Translated(String),
    RateLimited,
    QuotaExhausted,
    Failed(String),
}

pub trait TranslationApi {
    fn request(&self, text: &str) -> ApiReply;
}

/// Baidu Fanyi general translation API.
pub struct BaiduClient {
    client: Client,
    app_id: String,
    secret_key: String,
    endpoint: String,
    from: String,
    to: String,
}

impl BaiduClient {
    pub fn new(cfg: &BaiduConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            app_id: cfg.app_id.clone(),
            secret_key: cfg.secret_key.clone(),
            endpoint: cfg.endpoint.clone(),
            from: cfg.from.clone(),
            to: cfg.to.clone(),
        })
    }

    fn send(&self, text: &str) -> Result<Value> {
        let salt: u32 = thread_rng().gen_range(32768..=65536);
        let salt = salt.to_string();
        let sign = sign(&self.app_id, text, &salt, &self.secret_key);

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", text),
                ("from", self.from.as_str()),
                ("to", self.to.as_str()),
                ("appid", self.app_id.as_str()),
                ("salt", salt.as_str()),
                ("sign", sign.as_str()),
            ])
            .send()?;

        Ok(resp.json::<Value>()?)
    }
}

impl TranslationApi for BaiduClient {
    fn request(&self, text: &str) -> ApiReply {
        match self.send(text) {
            Ok(body) => parse_reply(&body),
            Err(e) => ApiReply::Failed(e.to_string()),
        }
    }
}

/// Lowercase hex MD5 of `appid + q + salt + secret`.
pub fn sign(app_id: &str, text: &str, salt: &str, secret_key: &str) -> String {
    let digest = md5::compute(format!("{app_id}{text}{salt}{secret_key}"));
    format!("{digest:x}")
}

pub fn parse_reply(body: &Value) -> ApiReply {
    if let Some(code) = body.get("error_code") {
        // the API sends codes as strings, but be lenient about numbers
        let code = match code {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return match code.as_str() {
            RATE_LIMITED => ApiReply::RateLimited,
            QUOTA_EXHAUSTED => ApiReply::QuotaExhausted,
            _ => {
                let msg = body
                    .get("error_msg")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error");
                ApiReply::Failed(format!("error {code}: {msg}"))
            }
        };
    }

    match body
        .get("trans_result")
        .and_then(|r| r.get(0))
        .and_then(|r| r.get("dst"))
        .and_then(Value::as_str)
    {
        Some(dst) => ApiReply::Translated(dst.to_string()),
        None => ApiReply::Failed("reply has no trans_result[0].dst".into()),
    }
}
