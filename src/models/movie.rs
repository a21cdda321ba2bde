use crate::domain::MovieId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of artwork attached to a movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageType {
    Poster,
    Backdrop,
}

impl ImageType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Poster => "POSTER",
            Self::Backdrop => "BACKDROP",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("poster") {
            Ok(Self::Poster)
        } else if s.eq_ignore_ascii_case("backdrop") {
            Ok(Self::Backdrop)
        } else {
            Err(format!("unknown image type: {s}"))
        }
    }
}

/// Artwork downloaded from a provider that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub image_type: ImageType,
    pub content_type: String,
    pub payload: Vec<u8>,
}

/// Persisted artwork, owned by exactly one [`Movie`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub id: i32,
    pub image_type: ImageType,
    pub content_type: String,
    pub payload: Vec<u8>,
    pub position: i32,
    movie_id: MovieId,
}

impl ImageAsset {
    #[must_use]
    pub const fn new(
        id: i32,
        image_type: ImageType,
        content_type: String,
        payload: Vec<u8>,
        position: i32,
    ) -> Self {
        Self {
            id,
            image_type,
            content_type,
            payload,
            position,
            movie_id: MovieId::new(0),
        }
    }

    /// Back-reference to the owning movie. Lookup only.
    #[must_use]
    pub const fn movie_id(&self) -> MovieId {
        self.movie_id
    }

    #[must_use]
    pub(crate) const fn owned_by(mut self, movie_id: MovieId) -> Self {
        self.movie_id = movie_id;
        self
    }
}

/// Canonical fields reported by the authoritative provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryRecord {
    pub title: String,
    pub year: Option<String>,
    pub director: Option<String>,
    pub external_id: i64,
}

/// Supplementary fields reported by the secondary provider.
///
/// Every field is optional: the sub-fetches that fill `similar_title` and
/// `images` are best-effort and leave them empty on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecondaryRecord {
    pub title: Option<String>,
    pub year: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub similar_title: Option<String>,
    pub images: Vec<NewImage>,
}

/// A merged record that has not been written to the catalog yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub year: Option<String>,
    pub director: Option<String>,
    pub external_id: Option<i64>,
    pub genre: Option<String>,
    pub similar_title: Option<String>,
    pub watched: bool,
    images: Vec<NewImage>,
}

impl NewMovie {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
            director: None,
            external_id: None,
            genre: None,
            similar_title: None,
            watched: false,
            images: Vec::new(),
        }
    }

    /// Appends an image; order of attachment is the stored order.
    pub fn attach_image(&mut self, image: NewImage) {
        self.images.push(image);
    }

    #[must_use]
    pub fn images(&self) -> &[NewImage] {
        &self.images
    }
}

/// A catalogued movie together with the artwork it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub id: MovieId,
    pub external_id: i64,
    pub title: String,
    pub year: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub similar_title: Option<String>,
    pub watched: bool,
    pub created_at: String,
    images: Vec<ImageAsset>,
}

impl Movie {
    #[must_use]
    pub fn new(id: MovieId, external_id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            external_id,
            title: title.into(),
            year: None,
            director: None,
            genre: None,
            similar_title: None,
            watched: false,
            created_at: String::new(),
            images: Vec::new(),
        }
    }

    /// Attaches a stored image, pointing its back-reference at this movie.
    pub fn attach_image(&mut self, image: ImageAsset) {
        self.images.push(image.owned_by(self.id));
    }

    #[must_use]
    pub fn images(&self) -> &[ImageAsset] {
        &self.images
    }

    /// First image of the given type, if any.
    #[must_use]
    pub fn image(&self, image_type: ImageType) -> Option<&ImageAsset> {
        self.images.iter().find(|i| i.image_type == image_type)
    }
}

/// Filters applied to catalog listings before paging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieFilter {
    pub watched: Option<bool>,
    pub director: Option<String>,
    pub year: Option<String>,
}
