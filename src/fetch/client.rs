use rand::Rng;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::fetch::cache::ResponseCache;

/// Directory listing of every available table conversion.
pub const DIRECTORY_URL: &str = "http://sde.zzeve.com/tables.json";

/// Upper bound for the random politeness delay between uncached fetches.
const MAX_PACING_DELAY_MS: u64 = 5_000;

#[derive(Debug, Clone, Deserialize)]
pub struct TableEntry {
    pub name: String,
    pub href: String,
}

/// Anything that can produce the raw rows of a named table. The HTTP client
/// is the production implementation; tests supply fixtures.
pub trait TableSource {
    fn table(&mut self, name: &str) -> Result<Vec<Value>>;
}

pub struct SdeClient {
    client: Client,
    cache: Option<ResponseCache>,
    directory: Option<Vec<TableEntry>>,
    fetched_once: bool,
}

impl SdeClient {
    pub fn new(cache: Option<ResponseCache>) -> Result<Self> {
        let client = Client::builder()
            .user_agent("eve-sde-blueprints")
            .build()
            .map_err(Error::Client)?;

        Ok(Self {
            client,
            cache,
            directory: None,
            fetched_once: false,
        })
    }

    /// The table directory, fetched once per client.
    pub fn directory(&mut self) -> Result<&[TableEntry]> {
        if self.directory.is_none() {
            let rows = self.fetch_json_array(DIRECTORY_URL)?;
            let entries: Vec<TableEntry> = rows
                .into_iter()
                .map(serde_json::from_value)
                .collect::<std::result::Result<_, _>>()
                .map_err(|err| Error::MalformedResponse {
                    url: DIRECTORY_URL.to_string(),
                    reason: err.to_string(),
                })?;
            info!(tables = entries.len(), "fetched table directory");
            self.directory = Some(entries);
        }

        Ok(self.directory.as_deref().unwrap_or_default())
    }

    fn fetch_json_array(&mut self, url: &str) -> Result<Vec<Value>> {
        let body = self.fetch_text(url)?;
        let value: Value =
            serde_json::from_str(&body).map_err(|err| Error::MalformedResponse {
                url: url.to_string(),
                reason: err.to_string(),
            })?;

        match value {
            Value::Array(rows) => Ok(rows),
            other => Err(Error::MalformedResponse {
                url: url.to_string(),
                reason: format!("expected a JSON array, got {}", json_type(&other)),
            }),
        }
    }

    fn fetch_text(&mut self, url: &str) -> Result<String> {
        if let Some(cache) = &self.cache {
            if let Some(body) = cache.get(url) {
                debug!(url, "cache hit");
                return Ok(body);
            }
        }

        self.pace();
        let body = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|source| Error::SourceUnavailable {
                url: url.to_string(),
                source,
            })?;
        self.fetched_once = true;

        if let Some(cache) = &self.cache {
            if let Err(err) = cache.put(url, &body) {
                warn!(url, %err, "failed to write response cache");
            }
        }

        Ok(body)
    }

    /// Sleep a random 0–5 s between uncached requests. The shared conversion
    /// service is a community mirror; this is politeness, not correctness.
    fn pace(&self) {
        if !self.fetched_once {
            return;
        }
        let delay = rand::thread_rng().gen_range(0..=MAX_PACING_DELAY_MS);
        if delay > 0 {
            debug!(delay_ms = delay, "pacing before next fetch");
            thread::sleep(Duration::from_millis(delay));
        }
    }
}

impl TableSource for SdeClient {
    fn table(&mut self, name: &str) -> Result<Vec<Value>> {
        let href = self
            .directory()?
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.href.clone())
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?;

        debug!(table = name, url = %href, "fetching table");
        self.fetch_json_array(&href)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
