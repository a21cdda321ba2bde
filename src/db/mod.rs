use crate::domain::{MovieId, Page, PageRequest};
use crate::models::movie::{ImageAsset, ImageType, Movie, MovieFilter, NewMovie};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, SqlErr, Statement,
};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub mod migrator;
pub mod repositories;

/// Errors surfaced by the catalog storage boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Invalid record: {0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Database(#[source] DbErr),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::Duplicate(detail),
            _ => Self::Database(err),
        }
    }
}

/// Durable catalog storage used by the movie service.
///
/// Implementations must make [`CatalogStore::insert_movie`] and
/// [`CatalogStore::delete_movie`] atomic over the movie row and its images,
/// and must reject a second movie with the same case-insensitive title with
/// [`StoreError::Duplicate`].
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, StoreError>;

    async fn insert_movie(&self, movie: &NewMovie) -> Result<MovieId, StoreError>;

    async fn get_movie(&self, id: MovieId) -> Result<Option<Movie>, StoreError>;

    /// Returns `false` when no movie had that id.
    async fn delete_movie(&self, id: MovieId) -> Result<bool, StoreError>;

    /// Returns `false` when no movie had that id.
    async fn set_watched(&self, id: MovieId, watched: bool) -> Result<bool, StoreError>;

    async fn list_movies(
        &self,
        page: PageRequest,
        filter: &MovieFilter,
    ) -> Result<Page<Movie>, StoreError>;

    async fn list_titles(&self, page: PageRequest) -> Result<Page<String>, StoreError>;

    async fn get_image(
        &self,
        id: MovieId,
        image_type: ImageType,
    ) -> Result<Option<ImageAsset>, StoreError>;
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    /// Number of movies stored under the case-insensitive form of `title`.
    pub async fn count_by_title(&self, title: &str) -> Result<u64, StoreError> {
        self.movie_repo().count_by_title(title).await
    }
}

#[async_trait]
impl CatalogStore for Store {
    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, StoreError> {
        self.movie_repo().find_by_title(title).await
    }

    async fn insert_movie(&self, movie: &NewMovie) -> Result<MovieId, StoreError> {
        self.movie_repo().insert(movie).await
    }

    async fn get_movie(&self, id: MovieId) -> Result<Option<Movie>, StoreError> {
        self.movie_repo().get(id).await
    }

    async fn delete_movie(&self, id: MovieId) -> Result<bool, StoreError> {
        self.movie_repo().remove(id).await
    }

    async fn set_watched(&self, id: MovieId, watched: bool) -> Result<bool, StoreError> {
        self.movie_repo().set_watched(id, watched).await
    }

    async fn list_movies(
        &self,
        page: PageRequest,
        filter: &MovieFilter,
    ) -> Result<Page<Movie>, StoreError> {
        self.movie_repo().list(page, filter).await
    }

    async fn list_titles(&self, page: PageRequest) -> Result<Page<String>, StoreError> {
        self.movie_repo().list_titles(page).await
    }

    async fn get_image(
        &self,
        id: MovieId,
        image_type: ImageType,
    ) -> Result<Option<ImageAsset>, StoreError> {
        self.movie_repo().get_image(id, image_type).await
    }
}
