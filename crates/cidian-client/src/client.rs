use std::sync::Arc;

use cidian_config::api::ApiConfig;
use cidian_types::{Concept, WordItem};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::inflight::InFlight;
use crate::service::{DictionaryService, PartOfSpeechRepository};
use crate::DictionaryError;

type JsonResult = Result<Value, DictionaryError>;

/// REST client for the dictionary backend
#[derive(Clone)]
pub struct HttpDictionaryClient {
    base_url: Url,
    client: reqwest::Client,
    in_flight: Arc<InFlight<JsonResult>>,
}

impl HttpDictionaryClient {
    pub fn new(config: &ApiConfig) -> Result<Self, DictionaryError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| DictionaryError::InvalidBaseUrl(format!("{}: {}", config.base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(DictionaryError::InvalidBaseUrl(config.base_url.clone()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| DictionaryError::Client(e.to_string()))?;

        Ok(Self {
            base_url,
            client,
            in_flight: Arc::new(InFlight::new()),
        })
    }

    /// Build a URL below the base, each segment percent-encoded on its own
    fn endpoint(&self, segments: &[&str]) -> Result<Url, DictionaryError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DictionaryError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T>(&self, segments: &[&str]) -> Result<T, DictionaryError>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let key = url.to_string();
        let path = url.path().to_string();
        let client = self.client.clone();

        let value = self
            .in_flight
            .run(&key, move || fetch_json(client, url))
            .await?;

        serde_json::from_value(value).map_err(|e| DictionaryError::Decode {
            path,
            message: e.to_string(),
        })
    }
}

async fn fetch_json(client: reqwest::Client, url: Url) -> JsonResult {
    tracing::debug!("GET {}", url);
    let path = url.path().to_string();

    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("GET {} returned {}", path, status);
        return Err(DictionaryError::Status {
            status: status.as_u16(),
            path,
        });
    }

    response.json::<Value>().await.map_err(|e| {
        if e.is_decode() {
            DictionaryError::Decode {
                path,
                message: e.to_string(),
            }
        } else {
            e.into()
        }
    })
}

#[async_trait::async_trait]
impl DictionaryService for HttpDictionaryClient {
    async fn fetch_concept_list(&self) -> Result<Vec<Concept>, DictionaryError> {
        self.get(&["concept"]).await
    }

    async fn fetch_word_heads(
        &self,
        dictionary_type: &str,
        pinyin: &str,
    ) -> Result<Vec<String>, DictionaryError> {
        self.get(&["dictionary", dictionary_type, "pinyin", pinyin])
            .await
    }

    async fn fetch_word_items(
        &self,
        dictionary_type: &str,
        head: &str,
    ) -> Result<Vec<WordItem>, DictionaryError> {
        self.get(&["dictionary", dictionary_type, "heads", head])
            .await
    }
}

#[async_trait::async_trait]
impl PartOfSpeechRepository for HttpDictionaryClient {
    async fn concepts(&self) -> Result<Vec<Concept>, DictionaryError> {
        self.fetch_concept_list().await
    }
}
