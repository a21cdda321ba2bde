use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use marquee::clients::{PrimarySource, ProviderError, SecondarySource};
use marquee::config::Config;
use marquee::db::Store;
use marquee::models::movie::{ImageType, NewImage, PrimaryRecord, SecondaryRecord};
use marquee::state::SharedState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

struct KnownTitles;

#[async_trait]
impl PrimarySource for KnownTitles {
    async fn fetch(&self, title: &str) -> Result<PrimaryRecord, ProviderError> {
        match title {
            "Flash" => Ok(PrimaryRecord {
                title: "Flash".to_string(),
                year: Some("2023".to_string()),
                director: None,
                external_id: 1_234_567,
            }),
            "Heat" => Ok(PrimaryRecord {
                title: "Heat".to_string(),
                year: Some("1995".to_string()),
                director: Some("Michael Mann".to_string()),
                external_id: 113_277,
            }),
            "Locked" => Err(ProviderError::Auth { provider: "OMDb" }),
            _ => Err(ProviderError::NotFound {
                provider: "OMDb",
                title: title.to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "OMDb"
    }
}

struct Enrichment;

#[async_trait]
impl SecondarySource for Enrichment {
    async fn fetch(&self, title: &str) -> Result<SecondaryRecord, ProviderError> {
        if title != "Flash" {
            return Err(ProviderError::upstream("TMDB", "unavailable"));
        }
        Ok(SecondaryRecord {
            director: Some("Andy Muschietti".to_string()),
            genre: Some("Action".to_string()),
            similar_title: Some("Justice League".to_string()),
            images: vec![NewImage {
                image_type: ImageType::Poster,
                content_type: "image/jpeg".to_string(),
                payload: b"poster-bytes".to_vec(),
            }],
            ..SecondaryRecord::default()
        })
    }

    fn name(&self) -> &'static str {
        "TMDB"
    }
}

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.server.cors_allowed_origins = vec!["*".to_string()];

    let store = Store::new(&config.general.database_path)
        .await
        .expect("Failed to open store");
    let shared = SharedState::from_parts(
        config,
        store,
        Arc::new(KnownTitles),
        Arc::new(Enrichment),
    );
    let state = marquee::api::create_app_state(Arc::new(shared), None);
    marquee::api::router(state).await
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn test_add_and_fetch_movie() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "POST", "/api/movies?title=Flash", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let movie = &body["data"];
    assert_eq!(movie["title"], "Flash");
    assert_eq!(movie["director"], "Andy Muschietti");
    assert_eq!(movie["external_id"], 1_234_567);
    assert_eq!(movie["genre"], "Action");
    assert_eq!(movie["similar_title"], "Justice League");
    assert_eq!(movie["watched"], false);
    assert_eq!(movie["images"][0]["image_type"], "POSTER");
    assert_eq!(movie["images"][0]["size_bytes"], 12);
    assert!(movie["images"][0].get("payload").is_none());

    let id = movie["id"].as_i64().unwrap();
    let (status, body) = send(&app, "GET", &format!("/api/movies/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Flash");
}

#[tokio::test]
async fn test_error_statuses() {
    let app = spawn_app().await;

    let (status, _) = send(&app, "POST", "/api/movies?title=Flash", None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/api/movies?title=flash", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some());

    let (status, _) = send(&app, "POST", "/api/movies?title=%20%20", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/movies?title=Nothing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/api/movies?title=Locked", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (status, _) = send(&app, "GET", "/api/movies/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/movies/0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_and_filters() {
    let app = spawn_app().await;
    send(&app, "POST", "/api/movies?title=Flash", None).await;
    let (_, heat) = send(&app, "POST", "/api/movies?title=Heat", None).await;
    let heat_id = heat["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", "/api/movies", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_items"], 2);
    assert_eq!(body["data"]["size"], 20);

    let (_, body) = send(&app, "GET", "/api/movies?page=1&size=1", None).await;
    assert_eq!(body["data"]["items"][0]["title"], "Heat");
    assert_eq!(body["data"]["total_pages"], 2);

    let (_, body) = send(&app, "GET", "/api/movies?director=michael%20mann", None).await;
    assert_eq!(body["data"]["total_items"], 1);
    assert_eq!(body["data"]["items"][0]["id"], heat_id);

    let (_, body) = send(&app, "GET", "/api/movies?year=2023", None).await;
    assert_eq!(body["data"]["items"][0]["title"], "Flash");

    let (_, body) = send(&app, "GET", "/api/movies/titles", None).await;
    assert_eq!(body["data"]["items"], serde_json::json!(["Flash", "Heat"]));
}

#[tokio::test]
async fn test_watched_and_delete() {
    let app = spawn_app().await;
    let (_, body) = send(&app, "POST", "/api/movies?title=Heat", None).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/movies/{id}/watched"),
        Some(serde_json::json!({"watched": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["watched"], true);

    let (_, body) = send(&app, "GET", "/api/movies?watched=true", None).await;
    assert_eq!(body["data"]["total_items"], 1);
    let (_, body) = send(&app, "GET", "/api/movies?watched=false", None).await;
    assert_eq!(body["data"]["total_items"], 0);

    let (status, _) = send(&app, "DELETE", &format!("/api/movies/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &format!("/api/movies/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/movies/{id}/watched"),
        Some(serde_json::json!({"watched": false})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_image_endpoint_serves_bytes() {
    let app = spawn_app().await;
    let (_, body) = send(&app, "POST", "/api/movies?title=Flash", None).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/movies/{id}/images/poster"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/jpeg"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"poster-bytes");

    let (status, _) = send(&app, "GET", &format!("/api/movies/{id}/images/backdrop"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", &format!("/api/movies/{id}/images/thumb"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_and_metrics() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("Metrics not enabled"));
}
