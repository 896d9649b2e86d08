//! Integration tests for `TmdbClient` using wiremock HTTP mocks.

use wtw_models::{OfferType, ProviderSource};
use wtw_sources::{AvailabilitySource, MovieCatalog, SourceError, TmdbClient};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> TmdbClient {
    TmdbClient::new("test-token")
        .expect("client construction should not fail")
        .with_base_url(base_url)
}

#[tokio::test]
async fn search_sends_fixed_query_and_normalizes_results() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "page": 1,
        "results": [
            {
                "id": 105,
                "title": "Back to the Future",
                "release_date": "1985-07-03",
                "vote_average": 8.3,
                "vote_count": "18000",
                "genre_ids": [12, 35, 878]
            },
            { "id": "", "title": "" },
            { "id": 165, "original_title": "Back to the Future Part II" }
        ],
        "total_results": 3
    });

    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(header("authorization", "Bearer test-token"))
        .and(query_param("include_adult", "false"))
        .and(query_param("language", "en-US"))
        .and(query_param("page", "1"))
        .and(query_param("query", "back to the future"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let movies = client.search("back to the future").await.expect("should parse search results");

    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].id, 105);
    assert_eq!(movies[0].release_year, "1985");
    assert_eq!(movies[0].vote_count, 18000);
    assert_eq!(movies[0].genre_ids, vec![12, 35, 878]);
    assert_eq!(movies[1].title, "");
    assert_eq!(movies[1].original_title, "Back to the Future Part II");
}

#[tokio::test]
async fn discover_sorts_by_vote_count_for_genre() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("include_video", "false"))
        .and(query_param("sort_by", "vote_count.desc"))
        .and(query_param("with_genres", "878"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{ "id": 603, "title": "The Matrix" }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let movies = client.discover_by_genre(878).await.expect("should parse discover results");

    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "The Matrix");
}

#[tokio::test]
async fn genres_use_english_names() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/genre/movie/list"))
        .and(query_param("language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "genres": [
                { "id": 28, "name": "Action" },
                { "id": 35, "name": "Comedy" }
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let genres = client.genres().await.expect("should parse genres");

    assert_eq!(genres.len(), 2);
    assert_eq!(genres.name(35), Some("Comedy"));
}

#[tokio::test]
async fn movie_detail_parses_runtime_and_genres() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/603"))
        .and(query_param("language", "en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 603,
            "title": "The Matrix",
            "runtime": 136,
            "tagline": "Welcome to the Real World.",
            "genres": [{ "id": 28, "name": "Action" }, { "id": 878, "name": "Science Fiction" }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let detail = client.movie_detail(603).await.expect("should parse detail");

    assert_eq!(detail.display_title(), "The Matrix");
    assert_eq!(detail.runtime_label(), "2h 16m");
    assert_eq!(detail.genres, vec!["Action", "Science Fiction"]);
}

#[tokio::test]
async fn movie_detail_without_title_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": 7 })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.movie_detail(7).await.expect_err("detail without title should fail");

    assert!(matches!(err, SourceError::Decode { .. }));
}

#[tokio::test]
async fn non_success_status_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"status_message\":\"Invalid API key\"}"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.movie_detail(1).await.expect_err("401 should fail");

    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
    assert!(err.to_string().contains("Invalid API key"));
}

#[tokio::test]
async fn watch_providers_are_grouped_by_region() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/603/watch/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 603,
            "results": {
                "US": {
                    "link": "https://www.themoviedb.org/movie/603/watch",
                    "flatrate": [{ "provider_name": "Max", "logo_path": "/max.jpg" }],
                    "rent": [{ "logo_path": "/apple.jpg" }]
                }
            }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let source = client.availability(603).await.expect("should parse providers");

    let Some(ProviderSource::Grouped(grouped)) = source else {
        panic!("expected grouped availability, got {:?}", source);
    };
    let us = grouped.region("us").expect("US region present");
    assert_eq!(us.bucket(OfferType::Flatrate)[0].provider_name, "Max");
    assert_eq!(us.bucket(OfferType::Rent)[0].provider_name, "Unknown");
    assert!(us.bucket(OfferType::Buy).is_empty());
}

#[tokio::test]
async fn watch_providers_without_results_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/9/watch/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": 9 })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let source = client.availability(9).await.expect("request should succeed");

    assert!(source.is_none());
}
