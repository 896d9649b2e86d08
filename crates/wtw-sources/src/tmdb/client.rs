use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;
use wtw_models::{GenreMap, Movie, MovieDetail, ProviderSource};

use crate::error::SourceError;
use crate::http::create_client;
use crate::tmdb::api;
use crate::traits::{AvailabilitySource, MovieCatalog};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_LANGUAGE: &str = "en-US";

/// Movie catalog client: search, detail, genres, discover and region-grouped providers
#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    base_url: String,
    access_token: String,
    language: String,
}

impl TmdbClient {
    /// Fails with `MissingCredential` when the token is blank; no request is made.
    pub fn new(access_token: impl Into<String>) -> Result<Self, SourceError> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(SourceError::MissingCredential("TMDB access token"));
        }

        Ok(Self {
            client: Arc::new(create_client()?),
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token,
            language: DEFAULT_LANGUAGE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Movie>, SourceError> {
        debug!("Searching catalog for {:?}", query);
        api::search_movies(&self.client, &self.base_url, &self.access_token, &self.language, query).await
    }

    pub async fn discover_by_genre(&self, genre_id: i64) -> Result<Vec<Movie>, SourceError> {
        api::discover_by_genre(&self.client, &self.base_url, &self.access_token, &self.language, genre_id).await
    }

    pub async fn genres(&self) -> Result<GenreMap, SourceError> {
        api::genres(&self.client, &self.base_url, &self.access_token).await
    }
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    async fn movie_detail(&self, movie_id: i64) -> Result<MovieDetail, SourceError> {
        api::movie_detail(&self.client, &self.base_url, &self.access_token, &self.language, movie_id).await
    }
}

#[async_trait]
impl AvailabilitySource for TmdbClient {
    fn source_name(&self) -> &str {
        "tmdb"
    }

    async fn availability(&self, movie_id: i64) -> Result<Option<ProviderSource>, SourceError> {
        let grouped = api::watch_providers(&self.client, &self.base_url, &self.access_token, movie_id).await?;
        Ok(grouped.map(ProviderSource::Grouped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_is_missing_credential() {
        let err = TmdbClient::new("  ").err().unwrap();
        assert!(err.is_missing_credential());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = TmdbClient::new("token").unwrap().with_base_url("http://localhost:1234/3/");
        assert_eq!(client.base_url(), "http://localhost:1234/3");
    }
}
