//! Provider adapters against a local fake of both upstream APIs.

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use marquee::clients::{OmdbClient, ProviderError, TmdbClient, build_http_client};
use marquee::config::{Config, HttpConfig, OmdbConfig, TmdbConfig};
use marquee::db::Store;
use marquee::models::movie::ImageType;
use marquee::services::CatalogError;
use marquee::state::SharedState;
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

const OMDB_KEY: &str = "omdb-test-key";
const TMDB_KEY: &str = "tmdb-test-key";

type Params = Query<HashMap<String, String>>;

fn param<'a>(params: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    params.get(name).map(String::as_str)
}

async fn omdb(Query(params): Params) -> Response {
    if param(&params, "apikey") != Some(OMDB_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"Response": "False", "Error": "Invalid API key!"})),
        )
            .into_response();
    }
    assert_eq!(param(&params, "type"), Some("movie"));

    match param(&params, "t") {
        Some("Flash") => Json(json!({
            "Title": "Flash",
            "Year": "2023",
            "Released": "16 Jun 2023",
            "Plot": "Barry uses his super speed to change the past.",
            "Director": "N/A",
            "imdbID": "tt1234567",
            "Response": "True"
        }))
        .into_response(),
        Some("Broken") => Json(json!({
            "Title": "Broken",
            "Year": "2020",
            "Director": "Someone",
            "imdbID": "flash-2023",
            "Response": "True"
        }))
        .into_response(),
        Some("Outage") => (StatusCode::SERVICE_UNAVAILABLE, "try later").into_response(),
        _ => Json(json!({"Response": "False", "Error": "Movie not found!"})).into_response(),
    }
}

fn tmdb_unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"status_code": 7, "status_message": "Invalid API key"})),
    )
        .into_response()
}

async fn tmdb_search(Query(params): Params) -> Response {
    if param(&params, "api_key") != Some(TMDB_KEY) {
        return tmdb_unauthorized();
    }

    let results = match param(&params, "query") {
        Some("Flash") => json!([
            {"id": 42, "title": "The Flash", "genre_ids": [28, 12]},
            {"id": 99, "title": "Flash Gordon", "genre_ids": [878]}
        ]),
        Some("Sparse") => json!([{"id": 7, "title": "Sparse", "genre_ids": [424_242]}]),
        Some("Loner") => json!([{"id": 8, "title": "Loner", "genre_ids": [18]}]),
        Some("Faded") => json!([{"id": 9, "title": "Faded", "genre_ids": [18]}]),
        Some("Broken") => json!([{"id": 43, "title": "Broken"}]),
        _ => json!([]),
    };
    Json(json!({"page": 1, "results": results})).into_response()
}

async fn tmdb_detail(Path(id): Path<i64>, Query(params): Params) -> Response {
    if param(&params, "api_key") != Some(TMDB_KEY) {
        return tmdb_unauthorized();
    }
    assert_eq!(param(&params, "append_to_response"), Some("credits"));

    match id {
        42 => Json(json!({
            "title": "The Flash",
            "release_date": "2023-06-13",
            "poster_path": "/poster.jpg",
            "backdrop_path": "/backdrop.png",
            "credits": {"crew": [
                {"name": "Barbara Muschietti", "job": "Producer"},
                {"name": "Andy Muschietti", "job": "Director"}
            ]}
        }))
        .into_response(),
        7 => Json(json!({
            "title": "Sparse",
            "release_date": "",
            "poster_path": "/empty.jpg",
            "backdrop_path": "/missing.png",
            "credits": {"crew": []}
        }))
        .into_response(),
        8 => Json(json!({
            "title": "Loner",
            "release_date": "2019-03-01",
            "poster_path": "/poster.jpg",
            "backdrop_path": "/backdrop.png",
            "credits": {"crew": []}
        }))
        .into_response(),
        9 => Json(json!({
            "title": "Faded",
            "release_date": "2018-05-05",
            "poster_path": "/faded.jpg",
            "backdrop_path": "/backdrop.png",
            "credits": {"crew": []}
        }))
        .into_response(),
        43 => Json(json!({"title": "Broken", "release_date": "2020-01-01"})).into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"status_code": 34, "status_message": "The resource could not be found."})),
        )
            .into_response(),
    }
}

async fn tmdb_similar(Path(id): Path<i64>) -> Response {
    if id == 42 {
        Json(json!({"results": [{"title": ""}, {"title": "Justice League"}]})).into_response()
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "similar is down").into_response()
    }
}

async fn image(Path((size, file)): Path<(String, String)>) -> Response {
    match (size.as_str(), file.as_str()) {
        ("w500", "poster.jpg") => b"poster-bytes".to_vec().into_response(),
        ("w1280", "backdrop.png") => b"backdrop-bytes".to_vec().into_response(),
        (_, "empty.jpg") => Vec::<u8>::new().into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_providers() -> SocketAddr {
    let app = Router::new()
        .route("/omdb", get(omdb))
        .route("/3/search/movie", get(tmdb_search))
        .route("/3/movie/{id}", get(tmdb_detail))
        .route("/3/movie/{id}/similar", get(tmdb_similar))
        .route("/t/p/{size}/{file}", get(image));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config_for(addr: SocketAddr) -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.omdb = OmdbConfig {
        api_key: OMDB_KEY.to_string(),
        base_url: format!("http://{addr}/omdb"),
    };
    config.tmdb = TmdbConfig {
        api_key: TMDB_KEY.to_string(),
        base_url: format!("http://{addr}/3"),
        image_base_url: format!("http://{addr}/t/p/"),
        ..TmdbConfig::default()
    };
    config.http = HttpConfig {
        request_timeout_seconds: 5,
        ..HttpConfig::default()
    };
    config
}

fn clients(config: &Config) -> (OmdbClient, TmdbClient) {
    let http = build_http_client(&config.http).unwrap();
    (
        OmdbClient::new(http.clone(), &config.omdb),
        TmdbClient::new(http, &config.tmdb),
    )
}

#[tokio::test]
async fn omdb_maps_a_match() {
    let addr = spawn_providers().await;
    let (omdb, _) = clients(&config_for(addr));

    let record = omdb.fetch_movie("Flash").await.unwrap();

    assert_eq!(record.title, "Flash");
    assert_eq!(record.year.as_deref(), Some("2023"));
    assert_eq!(record.director, None);
    assert_eq!(record.external_id, 1_234_567);
}

#[tokio::test]
async fn omdb_failure_taxonomy() {
    let addr = spawn_providers().await;
    let mut config = config_for(addr);
    let (omdb, _) = clients(&config);

    assert!(matches!(
        omdb.fetch_movie("Nothing").await,
        Err(ProviderError::NotFound { .. })
    ));
    assert!(matches!(
        omdb.fetch_movie("Broken").await,
        Err(ProviderError::InvalidData { .. })
    ));
    assert!(matches!(
        omdb.fetch_movie("Outage").await,
        Err(ProviderError::Upstream { .. })
    ));

    config.omdb.api_key = "wrong".to_string();
    let (omdb, _) = clients(&config);
    assert!(matches!(
        omdb.fetch_movie("Flash").await,
        Err(ProviderError::Auth { .. })
    ));
}

#[tokio::test]
async fn tmdb_full_record() {
    let addr = spawn_providers().await;
    let (_, tmdb) = clients(&config_for(addr));

    let record = tmdb.fetch_movie("Flash").await.unwrap();

    assert_eq!(record.title.as_deref(), Some("The Flash"));
    assert_eq!(record.year.as_deref(), Some("2023"));
    assert_eq!(record.director.as_deref(), Some("Andy Muschietti"));
    assert_eq!(record.genre.as_deref(), Some("Action"));
    assert_eq!(record.similar_title.as_deref(), Some("Justice League"));

    assert_eq!(record.images.len(), 2);
    assert_eq!(record.images[0].image_type, ImageType::Poster);
    assert_eq!(record.images[0].content_type, "image/jpeg");
    assert_eq!(record.images[0].payload, b"poster-bytes");
    assert_eq!(record.images[1].image_type, ImageType::Backdrop);
    assert_eq!(record.images[1].content_type, "image/png");
}

#[tokio::test]
async fn tmdb_sub_fetch_failures_are_downgraded() {
    let addr = spawn_providers().await;
    let (_, tmdb) = clients(&config_for(addr));

    let record = tmdb.fetch_movie("Sparse").await.unwrap();

    assert_eq!(record.title.as_deref(), Some("Sparse"));
    assert_eq!(record.year, None);
    assert_eq!(record.director, None);
    assert_eq!(record.genre.as_deref(), Some("Unknown"));
    assert_eq!(record.similar_title, None);
    assert!(record.images.is_empty());
}

#[tokio::test]
async fn tmdb_similar_failure_still_downloads_images() {
    let addr = spawn_providers().await;
    let (_, tmdb) = clients(&config_for(addr));

    let record = tmdb.fetch_movie("Loner").await.unwrap();

    assert_eq!(record.similar_title, None);
    assert_eq!(record.images.len(), 2);
    assert_eq!(record.images[0].image_type, ImageType::Poster);
    assert_eq!(record.images[1].image_type, ImageType::Backdrop);
}

#[tokio::test]
async fn tmdb_poster_failure_still_downloads_backdrop() {
    let addr = spawn_providers().await;
    let (_, tmdb) = clients(&config_for(addr));

    let record = tmdb.fetch_movie("Faded").await.unwrap();

    assert_eq!(record.images.len(), 1);
    assert_eq!(record.images[0].image_type, ImageType::Backdrop);
    assert_eq!(record.images[0].payload, b"backdrop-bytes");
}

#[tokio::test]
async fn tmdb_optional_steps_can_be_disabled() {
    let addr = spawn_providers().await;
    let mut config = config_for(addr);
    config.tmdb.fetch_similar = false;
    config.tmdb.fetch_images = false;
    let (_, tmdb) = clients(&config);

    let record = tmdb.fetch_movie("Flash").await.unwrap();

    assert_eq!(record.genre.as_deref(), Some("Action"));
    assert_eq!(record.similar_title, None);
    assert!(record.images.is_empty());
}

#[tokio::test]
async fn tmdb_top_level_failures_propagate() {
    let addr = spawn_providers().await;
    let mut config = config_for(addr);
    let (_, tmdb) = clients(&config);

    assert!(matches!(
        tmdb.fetch_movie("Nothing").await,
        Err(ProviderError::NotFound { .. })
    ));

    config.tmdb.api_key = "wrong".to_string();
    let (_, tmdb) = clients(&config);
    assert!(matches!(
        tmdb.fetch_movie("Flash").await,
        Err(ProviderError::Auth { .. })
    ));
}

#[tokio::test]
async fn tmdb_download_rejects_missing_and_empty_images() {
    let addr = spawn_providers().await;
    let (_, tmdb) = clients(&config_for(addr));

    assert!(matches!(
        tmdb.download_image(ImageType::Backdrop, "w1280", "/missing.png")
            .await,
        Err(ProviderError::Upstream { .. })
    ));
    assert!(matches!(
        tmdb.download_image(ImageType::Poster, "w500", "/empty.jpg")
            .await,
        Err(ProviderError::InvalidData { .. })
    ));
}

async fn pipeline(addr: SocketAddr) -> SharedState {
    let config = config_for(addr);
    let store = Store::new(&config.general.database_path).await.unwrap();
    let (omdb, tmdb) = clients(&config);
    SharedState::from_parts(config, store, Arc::new(omdb), Arc::new(tmdb))
}

#[tokio::test]
async fn flash_through_real_adapters() {
    let addr = spawn_providers().await;
    let state = pipeline(addr).await;

    let movie = state.movie_service.add_movie("Flash").await.unwrap();

    assert_eq!(movie.title, "Flash");
    assert_eq!(movie.year.as_deref(), Some("2023"));
    assert_eq!(movie.director.as_deref(), Some("Andy Muschietti"));
    assert_eq!(movie.external_id, 1_234_567);
    assert_eq!(movie.genre.as_deref(), Some("Action"));
    assert_eq!(movie.similar_title.as_deref(), Some("Justice League"));
    assert!(!movie.watched);
    assert_eq!(movie.images().len(), 2);

    let backdrop = movie.image(ImageType::Backdrop).unwrap();
    assert_eq!(backdrop.payload, b"backdrop-bytes");
}

#[tokio::test]
async fn bad_reference_id_writes_nothing() {
    let addr = spawn_providers().await;
    let state = pipeline(addr).await;

    let err = state.movie_service.add_movie("Broken").await.unwrap_err();

    assert!(matches!(err, CatalogError::Validation(_)), "got {err:?}");
    assert_eq!(state.store.count_by_title("Broken").await.unwrap(), 0);
}

#[tokio::test]
async fn secondary_miss_still_adds_primary_data() {
    let addr = spawn_providers().await;
    let mut config = config_for(addr);
    config.tmdb.api_key = "wrong".to_string();
    let store = Store::new(&config.general.database_path).await.unwrap();
    let (omdb, tmdb) = clients(&config);
    let state = SharedState::from_parts(config, store, Arc::new(omdb), Arc::new(tmdb));

    let movie = state.movie_service.add_movie("Flash").await.unwrap();

    assert_eq!(movie.external_id, 1_234_567);
    assert_eq!(movie.director, None);
    assert_eq!(movie.genre, None);
    assert!(movie.images().is_empty());
}
