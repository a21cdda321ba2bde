//! Domain service for the movie catalog.
//!
//! Callers (REST handlers, CLI commands) talk to [`MovieService`] only; the
//! provider adapters and the store stay behind it.

use crate::clients::ProviderError;
use crate::db::StoreError;
use crate::domain::{MovieId, Page, PageRequest};
use crate::models::movie::{ImageAsset, ImageType, Movie, MovieFilter};
use thiserror::Error;

/// Failures surfaced by catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The provider explicitly reported no match for the title.
    #[error("{provider} has no match for '{title}'")]
    TitleNotFound {
        provider: &'static str,
        title: String,
    },

    #[error("Movie not found: {0}")]
    MovieNotFound(MovieId),

    #[error("{provider} rejected the configured API key")]
    Auth { provider: &'static str },

    #[error("{provider} error: {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },

    #[error("Movie already catalogued: {0}")]
    Duplicate(String),

    #[error("Invalid movie data: {0}")]
    Validation(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl CatalogError {
    /// Short label used as the `kind` metrics label.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TitleNotFound { .. } | Self::MovieNotFound(_) => "not_found",
            Self::Auth { .. } => "auth",
            Self::Provider { .. } => "provider",
            Self::Duplicate(_) => "duplicate",
            Self::Validation(_) => "validation",
            Self::Persistence(_) => "persistence",
        }
    }
}

impl From<ProviderError> for CatalogError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound { provider, title } => Self::TitleNotFound { provider, title },
            ProviderError::Auth { provider } => Self::Auth { provider },
            ProviderError::Upstream { provider, message } => Self::Provider { provider, message },
            ProviderError::InvalidData { provider, message } => {
                Self::Validation(format!("{provider}: {message}"))
            }
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(detail) => Self::Duplicate(detail),
            StoreError::Invalid(detail) => Self::Validation(detail),
            StoreError::Database(e) => Self::Persistence(e.to_string()),
        }
    }
}

/// Catalog operations exposed to the outer layers.
///
/// # Examples
///
/// ```rust,ignore
/// use marquee::services::{CatalogError, MovieService};
/// use std::sync::Arc;
///
/// async fn example(service: Arc<dyn MovieService>) -> Result<(), CatalogError> {
///     let movie = service.add_movie("Flash").await?;
///     service.set_watched(movie.id, true).await?;
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait MovieService: Send + Sync {
    /// Looks the title up at both providers, merges the answers and stores
    /// the result together with its artwork.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Duplicate`] if a movie with that title (any case) exists
    /// - [`CatalogError::TitleNotFound`], [`CatalogError::Auth`] or
    ///   [`CatalogError::Provider`] when the primary provider fails
    /// - [`CatalogError::Validation`] when the merged record is incomplete
    /// - [`CatalogError::Persistence`] when the write cannot be verified
    async fn add_movie(&self, title: &str) -> Result<Movie, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::MovieNotFound`] if the id is unknown.
    async fn set_watched(&self, id: MovieId, watched: bool) -> Result<Movie, CatalogError>;

    /// Removes a movie and every image it owns.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MovieNotFound`] if the id is unknown.
    async fn delete_movie(&self, id: MovieId) -> Result<(), CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::MovieNotFound`] if the id is unknown.
    async fn get_movie(&self, id: MovieId) -> Result<Movie, CatalogError>;

    async fn list_movies(
        &self,
        page: PageRequest,
        filter: &MovieFilter,
    ) -> Result<Page<Movie>, CatalogError>;

    async fn list_titles(&self, page: PageRequest) -> Result<Page<String>, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::MovieNotFound`] if the movie does not exist or
    /// has no image of that type.
    async fn get_image(&self, id: MovieId, image_type: ImageType)
    -> Result<ImageAsset, CatalogError>;
}
