use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::FetchError;

/// Placeholder in the item URL template that receives the route id.
pub const ID_TOKEN: &str = "@id";

/// Something that can produce a `T` for a URL.
///
/// Views only see this capability, so the HTTP client and the in-memory
/// fetcher used by tests are interchangeable.
#[async_trait]
pub trait DataFetcher<T>: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<T, FetchError>;
}

/// The two remote endpoints the reader talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub feed_url: String,
    pub item_url: String,
}

impl Endpoints {
    pub fn from_config(api: &ApiConfig) -> Self {
        Self {
            feed_url: api.feed_url.clone(),
            item_url: api.item_url.clone(),
        }
    }

    /// Item URL for a raw route id. The id is not validated, only encoded.
    pub fn item_url_for(&self, id: &str) -> String {
        self.item_url.replace(ID_TOKEN, &urlencoding::encode(id))
    }
}

pub struct HackerNewsClient {
    client: Client,
}

impl HackerNewsClient {
    pub fn new(api: &ApiConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .user_agent(api.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl<T> DataFetcher<T> for HackerNewsClient
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(&self, url: &str) -> Result<T, FetchError> {
        tracing::debug!(url, "fetching");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        decode_json(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Decodes a response body with no nesting limit.
///
/// Comment threads can be arbitrarily deep, so the parser's recursion limit
/// is lifted and the stack grows on demand instead.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    deserializer.disable_recursion_limit();
    let value: T =
        serde::Deserialize::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(value)
}

/// Serves canned responses keyed by URL and remembers what was asked for.
pub struct MemoryFetcher<T> {
    responses: HashMap<String, T>,
    requests: Mutex<Vec<String>>,
}

impl<T> Default for MemoryFetcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemoryFetcher<T> {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(mut self, url: impl Into<String>, response: T) -> Self {
        self.responses.insert(url.into(), response);
        self
    }

    /// URLs requested so far, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl<T> DataFetcher<T> for MemoryFetcher<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn fetch(&self, url: &str) -> Result<T, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Missing(url.to_string()))
    }
}
