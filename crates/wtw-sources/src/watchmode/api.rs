use reqwest::Client;
use tracing::{debug, warn};
use wtw_models::FlatSource;

use crate::error::SourceError;
use crate::http::send_json;

/// Title ids are namespaced by the catalog they come from
pub fn movie_title_id(movie_id: i64) -> String {
    format!("movie-{}", movie_id)
}

/// Flat source list for a title; `None` when the body is not an array
pub async fn title_sources(
    client: &Client,
    base_url: &str,
    api_key: &str,
    title_id: &str,
) -> Result<Option<Vec<FlatSource>>, SourceError> {
    let endpoint = format!("title/{}/sources", urlencoding::encode(title_id));
    let request = client
        .get(format!("{}/{}/", base_url, endpoint))
        .query(&[("apiKey", api_key)]);

    let json = send_json(request, &endpoint).await?;
    if !json.is_array() {
        warn!("{} response is not a source list", endpoint);
        return Ok(None);
    }

    let sources = FlatSource::list_from_value(&json);
    debug!("{}: {} sources", endpoint, sources.len());
    Ok(Some(sources))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_title_id() {
        assert_eq!(movie_title_id(603), "movie-603");
    }
}
