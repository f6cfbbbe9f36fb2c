//! Song metadata lookup
//!
//! [`MetadataClient`] posts a search for one title to each configured
//! provider in turn and returns the first hit as a [`ProviderResult`].

mod client;
mod models;

pub use client::MetadataClient;
pub use models::{FilterMode, ProviderResult, SongQuery};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("song title is empty")]
    EmptyTitle,

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to provider '{provider}' failed: {source}")]
    Transport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("no provider has '{title}'")]
    NotFound { title: String },
}

pub type Result<T> = std::result::Result<T, MetadataError>;

/// Anything that can resolve a song query to a downloadable result
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn query(&self, query: &SongQuery) -> Result<ProviderResult>;
}
