//! Provider-backed implementation of [`MovieService`].
//!
//! `add_movie` runs the aggregation pipeline:
//! dedupe, fetch (primary and secondary concurrently), merge, validate,
//! persist, verify. A failed verification after a successful write triggers a
//! compensating delete of the new row.

use crate::clients::{PrimarySource, ProviderError, SecondarySource};
use crate::db::CatalogStore;
use crate::domain::{MovieId, Page, PageRequest};
use crate::models::movie::{ImageAsset, ImageType, Movie, MovieFilter, SecondaryRecord};
use crate::services::merge;
use crate::services::movie_service::{CatalogError, MovieService};
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct CatalogMovieService {
    primary: Arc<dyn PrimarySource>,
    secondary: Arc<dyn SecondarySource>,
    store: Arc<dyn CatalogStore>,
}

impl CatalogMovieService {
    #[must_use]
    pub fn new(
        primary: Arc<dyn PrimarySource>,
        secondary: Arc<dyn SecondarySource>,
        store: Arc<dyn CatalogStore>,
    ) -> Self {
        Self {
            primary,
            secondary,
            store,
        }
    }

    async fn run_add(&self, title: &str) -> Result<Movie, CatalogError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CatalogError::Validation("title must not be blank".to_string()));
        }

        if self.store.find_by_title(title).await?.is_some() {
            info!(title, "Movie already catalogued");
            return Err(CatalogError::Duplicate(title.to_string()));
        }

        let (primary, secondary) =
            tokio::join!(self.primary.fetch(title), self.secondary.fetch(title));

        let primary = primary.map_err(|e| {
            warn!(title, provider = self.primary.name(), error = %e, "Primary lookup failed");
            CatalogError::from(e)
        })?;
        info!(title, external_id = primary.external_id, "Primary record fetched");

        let secondary = self.downgrade_secondary(title, secondary);

        let movie = merge::merge(Some(&primary), secondary)?;
        merge::validate(&movie)?;

        let id = self.store.insert_movie(&movie).await?;
        info!(title = %movie.title, movie_id = %id, "Movie persisted");

        match self.store.get_movie(id).await {
            Ok(Some(stored)) => Ok(stored),
            Ok(None) => {
                self.compensate(id).await;
                Err(CatalogError::Persistence(format!(
                    "movie {id} was not readable after insert"
                )))
            }
            Err(e) => {
                self.compensate(id).await;
                Err(CatalogError::Persistence(format!(
                    "verifying movie {id} failed: {e}"
                )))
            }
        }
    }

    fn downgrade_secondary(
        &self,
        title: &str,
        result: Result<SecondaryRecord, ProviderError>,
    ) -> Option<SecondaryRecord> {
        match result {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(
                    title,
                    provider = self.secondary.name(),
                    error = %e,
                    "Secondary lookup failed, continuing without it"
                );
                metrics::counter!(
                    "secondary_fetch_failures_total",
                    "step" => "lookup",
                    "kind" => e.kind()
                )
                .increment(1);
                None
            }
        }
    }

    /// Best-effort removal of a row whose write could not be verified.
    async fn compensate(&self, id: MovieId) {
        match self.store.delete_movie(id).await {
            Ok(_) => {
                warn!(movie_id = %id, "Rolled back unverified movie");
                metrics::counter!("movie_compensations_total", "outcome" => "deleted")
                    .increment(1);
            }
            Err(e) => {
                error!(movie_id = %id, error = %e, "Compensating delete failed");
                metrics::counter!("movie_compensations_total", "outcome" => "failed")
                    .increment(1);
            }
        }
    }
}

#[async_trait::async_trait]
impl MovieService for CatalogMovieService {
    async fn add_movie(&self, title: &str) -> Result<Movie, CatalogError> {
        match self.run_add(title).await {
            Ok(movie) => {
                metrics::counter!("movies_added_total").increment(1);
                info!(movie_id = %movie.id, title = %movie.title, "Movie added");
                Ok(movie)
            }
            Err(e) => {
                metrics::counter!("movie_add_failures_total", "kind" => e.kind()).increment(1);
                Err(e)
            }
        }
    }

    async fn set_watched(&self, id: MovieId, watched: bool) -> Result<Movie, CatalogError> {
        if !self.store.set_watched(id, watched).await? {
            return Err(CatalogError::MovieNotFound(id));
        }
        info!(movie_id = %id, watched, "Updated watched flag");
        self.get_movie(id).await
    }

    async fn delete_movie(&self, id: MovieId) -> Result<(), CatalogError> {
        if self.store.delete_movie(id).await? {
            Ok(())
        } else {
            Err(CatalogError::MovieNotFound(id))
        }
    }

    async fn get_movie(&self, id: MovieId) -> Result<Movie, CatalogError> {
        self.store
            .get_movie(id)
            .await?
            .ok_or(CatalogError::MovieNotFound(id))
    }

    async fn list_movies(
        &self,
        page: PageRequest,
        filter: &MovieFilter,
    ) -> Result<Page<Movie>, CatalogError> {
        Ok(self.store.list_movies(page, filter).await?)
    }

    async fn list_titles(&self, page: PageRequest) -> Result<Page<String>, CatalogError> {
        Ok(self.store.list_titles(page).await?)
    }

    async fn get_image(
        &self,
        id: MovieId,
        image_type: ImageType,
    ) -> Result<ImageAsset, CatalogError> {
        self.store
            .get_image(id, image_type)
            .await?
            .ok_or(CatalogError::MovieNotFound(id))
    }
}
