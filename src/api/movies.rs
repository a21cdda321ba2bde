use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_image_type, validate_movie_id, validate_title};
use super::{ApiError, ApiResponse, AppState, MovieDto, WatchedRequest};
use crate::domain::{Page, PageRequest};
use crate::models::movie::MovieFilter;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page: u64,
    pub size: Option<u64>,
    pub watched: Option<bool>,
    pub director: Option<String>,
    pub year: Option<String>,
}

impl ListQuery {
    fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.size.unwrap_or(PageRequest::DEFAULT_SIZE))
    }

    fn filter(&self) -> MovieFilter {
        MovieFilter {
            watched: self.watched,
            director: self.director.clone().filter(|d| !d.trim().is_empty()),
            year: self.year.clone().filter(|y| !y.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddQuery {
    pub title: String,
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Page<MovieDto>>>, ApiError> {
    let page = state
        .movies()
        .list_movies(query.page_request(), &query.filter())
        .await?;

    Ok(Json(ApiResponse::success(page.map(MovieDto::from))))
}

pub async fn list_titles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Page<String>>>, ApiError> {
    let page = state.movies().list_titles(query.page_request()).await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MovieDto>>, ApiError> {
    let id = validate_movie_id(id)?;
    let movie = state.movies().get_movie(id).await?;
    Ok(Json(ApiResponse::success(movie.into())))
}

pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AddQuery>,
) -> Result<(StatusCode, Json<ApiResponse<MovieDto>>), ApiError> {
    let title = validate_title(&query.title)?;
    let movie = state.movies().add_movie(title).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(movie.into()))))
}

pub async fn set_watched(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(request): Json<WatchedRequest>,
) -> Result<Json<ApiResponse<MovieDto>>, ApiError> {
    let id = validate_movie_id(id)?;
    let movie = state.movies().set_watched(id, request.watched).await?;
    Ok(Json(ApiResponse::success(movie.into())))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_movie_id(id)?;
    state.movies().delete_movie(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path((id, kind)): Path<(i32, String)>,
) -> Result<Response, ApiError> {
    let id = validate_movie_id(id)?;
    let image_type = validate_image_type(&kind)?;
    let image = state.movies().get_image(id, image_type).await?;

    let content_type = HeaderValue::from_str(&image.content_type)
        .map_err(|e| ApiError::internal(format!("stored content type is not a header: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=86400"),
            ),
        ],
        image.payload,
    )
        .into_response())
}
