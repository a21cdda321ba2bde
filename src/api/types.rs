use serde::{Deserialize, Serialize};

use crate::domain::MovieId;
use crate::models::movie::{ImageAsset, ImageType, Movie};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Image metadata only; the bytes are served by the image endpoint.
#[derive(Debug, Serialize)]
pub struct ImageDto {
    pub id: i32,
    pub image_type: ImageType,
    pub content_type: String,
    pub size_bytes: usize,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct MovieDto {
    pub id: MovieId,
    pub external_id: i64,
    pub title: String,
    pub year: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub similar_title: Option<String>,
    pub watched: bool,
    pub created_at: String,
    pub images: Vec<ImageDto>,
}

impl From<Movie> for MovieDto {
    fn from(movie: Movie) -> Self {
        let images = movie
            .images()
            .iter()
            .map(|image| image_dto(movie.id, image))
            .collect();

        Self {
            id: movie.id,
            external_id: movie.external_id,
            title: movie.title,
            year: movie.year,
            director: movie.director,
            genre: movie.genre,
            similar_title: movie.similar_title,
            watched: movie.watched,
            created_at: movie.created_at,
            images,
        }
    }
}

fn image_dto(movie_id: MovieId, image: &ImageAsset) -> ImageDto {
    ImageDto {
        id: image.id,
        image_type: image.image_type,
        content_type: image.content_type.clone(),
        size_bytes: image.payload.len(),
        url: format!(
            "/api/movies/{movie_id}/images/{}",
            image.image_type.as_str().to_ascii_lowercase()
        ),
    }
}

#[derive(Debug, Deserialize)]
pub struct WatchedRequest {
    pub watched: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}
