//! Domain primitives for the movie catalog.
//!
//! Newtype identifiers keep catalog row ids from being mixed up with the
//! numeric ids handed out by the metadata providers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage-assigned identity of a catalogued movie.
///
/// # Examples
///
/// ```rust
/// use marquee::domain::MovieId;
///
/// let id = MovieId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MovieId(i32);

impl MovieId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MovieId> for i32 {
    fn from(id: MovieId) -> Self {
        id.0
    }
}

impl From<i32> for MovieId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for MovieId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// Normalizes a title into the key used for the case-insensitive uniqueness check.
///
/// Both the application-level lookup and the storage unique index use this
/// key, so they always agree on what counts as "the same title".
#[must_use]
pub fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Zero-based page request for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u64 = 20;
    pub const MAX_SIZE: u64 = 100;

    /// Builds a page request, clamping `size` into `1..=MAX_SIZE`.
    #[must_use]
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page,
            size: size.clamp(1, Self::MAX_SIZE),
        }
    }

    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_SIZE)
    }
}

/// One page of results plus the totals needed to navigate the rest.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Maps the items while keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}
