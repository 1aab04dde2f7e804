//! Augmentation by an OpenAI-compatible chat completions endpoint.

use crate::{Augmentation, Augmenter, Candidate, Error, Phrase, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::env;
use std::time::Duration;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You are a strict profanity classifier. Return only valid JSON. \
Use severity: 1 (mild), 2 (medium), 3 (strong insult). \
Never flag whitelist terms. Always flag blacklist terms if present.";

/// Where and how to reach the model.
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Per request. [`crate::Engine`] applies its own, usually shorter, timeout on top.
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";
    pub const DEFAULT_MODEL: &'static str = "gpt-4o-mini";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: String::from(Self::DEFAULT_BASE_URL),
            model: String::from(Self::DEFAULT_MODEL),
            timeout: Duration::from_secs(30),
        }
    }

    /// Reads `OPENAI_API_KEY` (required), `OPENAI_BASE_URL` and `OPENAI_MODEL`.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(Error::MissingApiKey)?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = env::var("OPENAI_MODEL") {
            config.model = model;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Asks a chat model to classify the text, in JSON mode.
///
/// ```no_run
/// # async fn run() -> swearjar::Result<()> {
/// use swearjar::{Engine, OpenAiAugmenter};
///
/// let engine = Engine::default().with_augmenter(OpenAiAugmenter::from_env()?);
/// let evaluation = engine.evaluate("you utter muppet", true).await;
/// println!("{}", evaluation.masked_text);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct OpenAiAugmenter {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiAugmenter {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(OpenAiConfig::from_env()?)
    }

    fn request_body(&self, text: &str, whitelist: &[String], blacklist: &[Phrase]) -> Value {
        let whitelist = whitelist
            .iter()
            .filter(|phrase| !phrase.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let blacklist = blacklist
            .iter()
            .map(|entry| format!("{}(sev={})", entry.phrase, entry.severity.level()))
            .collect::<Vec<_>>()
            .join(", ");

        let user = format!(
            "TEXT: \"\"\"{}\"\"\"\n\n\
             WHITELIST (do not flag): {}\n\
             BLACKLIST (always flag): {}\n\n\
             Respond as JSON with keys: contains_profanity (boolean), \
             matches (array of {{word, severity, start, end}}). \
             Indexes must be 0-based positions in the ORIGINAL TEXT.",
            text,
            or_none(&whitelist),
            or_none(&blacklist),
        );

        json!({
            "model": self.config.model,
            "temperature": 0,
            "response_format": {"type": "json_object"},
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": user},
            ],
        })
    }
}

fn or_none(list: &str) -> &str {
    if list.is_empty() {
        "none"
    } else {
        list
    }
}

#[async_trait]
impl Augmenter for OpenAiAugmenter {
    async fn augment(
        &self,
        text: &str,
        whitelist: &[String],
        blacklist: &[Phrase],
    ) -> Result<Augmentation> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&self.request_body(text, whitelist, blacklist))
            .send()
            .await?
            .error_for_status()?;

        let body: Value = serde_json::from_slice(&response.bytes().await?)?;
        let content = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .unwrap_or("{}");
        debug!("{} replied with {} bytes", self.config.model, content.len());

        Ok(parse_reply(content))
    }
}

/// Reads the model's JSON answer as leniently as possible. Anything unreadable counts as no
/// answer; individual fields are checked later by [`crate::sanitize`].
pub(crate) fn parse_reply(content: &str) -> Augmentation {
    let parsed: Value = serde_json::from_str(content).unwrap_or_else(|_| json!({}));
    let candidates = parsed
        .get("matches")
        .and_then(Value::as_array)
        .map(|matches| matches.iter().map(candidate).collect())
        .unwrap_or_default();

    Augmentation {
        contains_profanity: parsed.get("contains_profanity").map_or(false, truthy),
        candidates,
    }
}

fn candidate(raw: &Value) -> Candidate {
    Candidate {
        word: raw.get("word").and_then(|word| match word {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }),
        severity: raw.get("severity").and_then(number),
        start: raw.get("start").and_then(integer),
        end: raw.get("end").and_then(integer),
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn integer(value: &Value) -> Option<i64> {
    number(value)
        .filter(|n| n.fract() == 0.0)
        .map(|n| n as i64)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
