use super::models::{ProviderResult, SearchResponse, SongQuery};
use super::{MetadataError, MetadataSource, Result};
use crate::config::{ApiConfig, HttpSettings};
use crate::http::{self, RetryPolicy};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

/// Outcome of asking one provider
enum Lookup {
    Found(ProviderResult),
    Miss(String),
}

/// Client for the song search endpoint, walking providers in a fixed order
#[derive(Debug, Clone)]
pub struct MetadataClient {
    client: Client,
    endpoint: String,
    providers: Vec<String>,
    page: u32,
    retry: RetryPolicy,
}

impl MetadataClient {
    /// Create a client with its own connection pool
    pub fn new(api: &ApiConfig, settings: &HttpSettings) -> Result<Self> {
        let client = http::build_client(settings).map_err(MetadataError::Client)?;
        Ok(Self::with_client(client, api, RetryPolicy::from(settings)))
    }

    /// Create a client on top of an existing `reqwest::Client`
    pub fn with_client(client: Client, api: &ApiConfig, retry: RetryPolicy) -> Self {
        Self {
            client,
            endpoint: api.endpoint.clone(),
            providers: api.providers.clone(),
            page: api.page,
            retry,
        }
    }

    pub fn providers(&self) -> &[String] {
        &self.providers
    }

    /// Look a song up, returning the first provider hit.
    ///
    /// Provider misses (bad status code, undecodable or empty body) move on to
    /// the next provider. A transport failure that survives every retry ends
    /// the whole query.
    pub async fn query(&self, query: &SongQuery) -> Result<ProviderResult> {
        if query.title.is_empty() {
            return Err(MetadataError::EmptyTitle);
        }

        for provider in &self.providers {
            match self.query_provider(query, provider).await? {
                Lookup::Found(result) => {
                    info!(
                        title = %query.title,
                        provider = %provider,
                        song_id = %result.song_id,
                        "Song found"
                    );
                    return Ok(result);
                }
                Lookup::Miss(reason) => {
                    debug!(
                        title = %query.title,
                        provider = %provider,
                        reason = %reason,
                        "Provider miss"
                    );
                }
            }
        }

        Err(MetadataError::NotFound {
            title: query.title.clone(),
        })
    }

    async fn query_provider(&self, query: &SongQuery, provider: &str) -> Result<Lookup> {
        let page = self.page.to_string();
        let form = [
            ("input", query.title.as_str()),
            ("filter", query.filter.as_str()),
            ("type", provider),
            ("page", page.as_str()),
        ];

        let response = self
            .retry
            .send(&self.endpoint, || {
                self.client
                    .post(&self.endpoint)
                    .header("X-Requested-With", "XMLHttpRequest")
                    .form(&form[..])
            })
            .await
            .map_err(|source| MetadataError::Transport {
                provider: provider.to_string(),
                source,
            })?;

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                warn!(provider, error = %e, "Failed to read response body");
                return Ok(Lookup::Miss(format!("body read failed: {}", e)));
            }
        };

        let decoded: SearchResponse = match serde_json::from_slice(&body) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(provider, error = %e, "Failed to decode response body");
                return Ok(Lookup::Miss(format!("decode failed: {}", e)));
            }
        };

        if decoded.code != 200 {
            warn!(
                provider,
                code = decoded.code,
                error = decoded.error.as_deref().unwrap_or(""),
                "Provider does not have the song"
            );
            return Ok(Lookup::Miss(format!("code {}", decoded.code)));
        }

        match decoded.data.and_then(|entries| entries.into_iter().next()) {
            Some(entry) => Ok(Lookup::Found(entry.into_result(provider))),
            None => Ok(Lookup::Miss("empty result list".to_string())),
        }
    }
}

#[async_trait]
impl MetadataSource for MetadataClient {
    async fn query(&self, query: &SongQuery) -> Result<ProviderResult> {
        MetadataClient::query(self, query).await
    }
}
