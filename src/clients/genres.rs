//! TMDB movie genre ids.
//!
//! Search hits only carry genre ids, so names are resolved locally from the
//! provider's published list instead of spending a request on `/genre/movie/list`.

pub const UNKNOWN_GENRE: &str = "Unknown";

/// Sorted by id so lookups can binary search.
static MOVIE_GENRES: &[(i64, &str)] = &[
    (12, "Adventure"),
    (14, "Fantasy"),
    (16, "Animation"),
    (18, "Drama"),
    (27, "Horror"),
    (28, "Action"),
    (35, "Comedy"),
    (36, "History"),
    (37, "Western"),
    (53, "Thriller"),
    (80, "Crime"),
    (99, "Documentary"),
    (878, "Science Fiction"),
    (9648, "Mystery"),
    (10402, "Music"),
    (10749, "Romance"),
    (10751, "Family"),
    (10752, "War"),
    (10770, "TV Movie"),
];

/// Resolves a genre id, falling back to [`UNKNOWN_GENRE`] for ids not in the table.
#[must_use]
pub fn genre_name(id: i64) -> &'static str {
    MOVIE_GENRES
        .binary_search_by_key(&id, |(genre_id, _)| *genre_id)
        .map_or(UNKNOWN_GENRE, |index| MOVIE_GENRES[index].1)
}
