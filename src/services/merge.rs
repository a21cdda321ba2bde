//! Reconciles provider answers into one canonical record.
//!
//! Precedence is fixed: the primary provider owns identity (`title`, `year`,
//! `external_id`), the secondary provider owns enrichment (`genre`,
//! `similar_title`, artwork) and `director` falls back from primary to
//! secondary when the primary value is blank.

use crate::models::movie::{NewMovie, PrimaryRecord, SecondaryRecord};
use crate::services::movie_service::CatalogError;

/// Merges a primary record with an optional secondary one. No I/O.
///
/// # Errors
///
/// Returns [`CatalogError::Validation`] when `primary` is absent.
pub fn merge(
    primary: Option<&PrimaryRecord>,
    secondary: Option<SecondaryRecord>,
) -> Result<NewMovie, CatalogError> {
    let primary = primary.ok_or_else(|| {
        CatalogError::Validation("a primary record is required to merge".to_string())
    })?;

    let mut movie = NewMovie::new(primary.title.clone());
    movie.year.clone_from(&primary.year);
    movie.external_id = Some(primary.external_id);
    movie.watched = false;
    movie.director = non_blank(primary.director.as_deref())
        .or_else(|| {
            secondary
                .as_ref()
                .and_then(|s| non_blank(s.director.as_deref()))
        })
        .map(str::to_string);

    if let Some(secondary) = secondary {
        movie.genre = secondary.genre;
        movie.similar_title = secondary.similar_title;
        for image in secondary.images {
            movie.attach_image(image);
        }
    }

    Ok(movie)
}

/// Gate applied between merge and persist.
///
/// # Errors
///
/// Returns [`CatalogError::Validation`] when the external id is missing or the
/// title is blank.
pub fn validate(movie: &NewMovie) -> Result<(), CatalogError> {
    if movie.external_id.is_none() {
        return Err(CatalogError::Validation(format!(
            "'{}' has no external id",
            movie.title
        )));
    }
    if movie.title.trim().is_empty() {
        return Err(CatalogError::Validation("title must not be blank".to_string()));
    }
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
