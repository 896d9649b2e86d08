use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use wtw_models::{FlatSource, ProviderSource};

use crate::error::SourceError;
use crate::http::create_client;
use crate::traits::AvailabilitySource;
use crate::watchmode::api;

pub const DEFAULT_BASE_URL: &str = "https://api.watchmode.com/v1";

/// Flat streaming-source list keyed by catalog movie id
#[derive(Clone)]
pub struct WatchmodeClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl WatchmodeClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, SourceError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SourceError::MissingCredential("Watchmode API key"));
        }

        Ok(Self {
            client: Arc::new(create_client()?),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub async fn title_sources(&self, title_id: &str) -> Result<Option<Vec<FlatSource>>, SourceError> {
        api::title_sources(&self.client, &self.base_url, &self.api_key, title_id).await
    }
}

#[async_trait]
impl AvailabilitySource for WatchmodeClient {
    fn source_name(&self) -> &str {
        "watchmode"
    }

    async fn availability(&self, movie_id: i64) -> Result<Option<ProviderSource>, SourceError> {
        let sources = self.title_sources(&api::movie_title_id(movie_id)).await?;
        Ok(sources.map(ProviderSource::Flat))
    }
}
