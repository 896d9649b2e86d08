use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use wtw_models::{GenreMap, GroupedAvailability, Movie, MovieDetail};

use crate::error::SourceError;
use crate::http::send_json;

/// Search results are always the first page, adult titles excluded
pub async fn search_movies(
    client: &Client,
    base_url: &str,
    access_token: &str,
    language: &str,
    query: &str,
) -> Result<Vec<Movie>, SourceError> {
    let request = client
        .get(format!("{}/search/movie", base_url))
        .bearer_auth(access_token)
        .query(&[
            ("include_adult", "false"),
            ("language", language),
            ("page", "1"),
            ("query", query),
        ]);

    let json = send_json(request, "search/movie").await?;
    Ok(movies_from_results(&json, "search/movie"))
}

/// Most-voted movies in a genre
pub async fn discover_by_genre(
    client: &Client,
    base_url: &str,
    access_token: &str,
    language: &str,
    genre_id: i64,
) -> Result<Vec<Movie>, SourceError> {
    let genre = genre_id.to_string();
    let request = client
        .get(format!("{}/discover/movie", base_url))
        .bearer_auth(access_token)
        .query(&[
            ("include_adult", "false"),
            ("include_video", "false"),
            ("language", language),
            ("page", "1"),
            ("sort_by", "vote_count.desc"),
            ("with_genres", genre.as_str()),
        ]);

    let json = send_json(request, "discover/movie").await?;
    Ok(movies_from_results(&json, "discover/movie"))
}

pub async fn movie_detail(
    client: &Client,
    base_url: &str,
    access_token: &str,
    language: &str,
    movie_id: i64,
) -> Result<MovieDetail, SourceError> {
    let endpoint = format!("movie/{}", movie_id);
    let request = client
        .get(format!("{}/{}", base_url, endpoint))
        .bearer_auth(access_token)
        .query(&[("language", language)]);

    let json = send_json(request, &endpoint).await?;
    MovieDetail::from_value(&json).ok_or_else(|| SourceError::Decode {
        endpoint,
        message: "detail has no numeric id or title".to_string(),
    })
}

/// Genre names always come back in English; they label chips, not content
pub async fn genres(client: &Client, base_url: &str, access_token: &str) -> Result<GenreMap, SourceError> {
    let request = client
        .get(format!("{}/genre/movie/list", base_url))
        .bearer_auth(access_token)
        .query(&[("language", "en")]);

    let json = send_json(request, "genre/movie/list").await?;
    let genres = GenreMap::from_response(&json);
    debug!("Loaded {} genres", genres.len());
    Ok(genres)
}

/// Region-grouped availability; `None` when the response has no `results` object
pub async fn watch_providers(
    client: &Client,
    base_url: &str,
    access_token: &str,
    movie_id: i64,
) -> Result<Option<GroupedAvailability>, SourceError> {
    let endpoint = format!("movie/{}/watch/providers", movie_id);
    let request = client
        .get(format!("{}/{}", base_url, endpoint))
        .bearer_auth(access_token);

    let json = send_json(request, &endpoint).await?;
    let grouped = GroupedAvailability::from_response(&json);
    if grouped.is_none() {
        warn!("{} response has no results object", endpoint);
    }
    Ok(grouped)
}

/// Normalize the `results` array of a search-shaped response, dropping invalid entries
fn movies_from_results(json: &Value, endpoint: &str) -> Vec<Movie> {
    let Some(results) = json.get("results").and_then(Value::as_array) else {
        warn!("{} response has no results array", endpoint);
        return Vec::new();
    };
    let movies = Movie::list_from_values(results);
    if movies.len() < results.len() {
        debug!(
            "{}: dropped {} invalid entries of {}",
            endpoint,
            results.len() - movies.len(),
            results.len()
        );
    }
    movies
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_movies_from_results_drops_invalid() {
        let json = json!({
            "page": 1,
            "results": [
                {"id": 105, "title": "Back to the Future"},
                {"id": null, "title": ""},
                {"id": 165, "title": "Back to the Future Part II"}
            ]
        });
        let movies = movies_from_results(&json, "search/movie");
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[1].id, 165);
    }

    #[test]
    fn test_movies_from_results_without_array() {
        assert!(movies_from_results(&json!({"status_code": 7}), "search/movie").is_empty());
    }
}
