use crate::db::StoreError;
use crate::domain::{MovieId, Page, PageRequest, title_key};
use crate::entities::{movie_images, movies, prelude::*};
use crate::models::movie::{ImageAsset, ImageType, Movie, MovieFilter, NewMovie};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;
use tracing::{info, warn};

pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model_to_movie(model: movies::Model, images: Vec<movie_images::Model>) -> Movie {
        let mut movie = Movie::new(MovieId::new(model.id), model.external_id, model.title);
        movie.year = model.year;
        movie.director = model.director;
        movie.genre = model.genre;
        movie.similar_title = model.similar_title;
        movie.watched = model.watched;
        movie.created_at = model.created_at;

        for image in images {
            if let Some(asset) = Self::map_image(image) {
                movie.attach_image(asset);
            }
        }
        movie
    }

    fn map_image(model: movie_images::Model) -> Option<ImageAsset> {
        let Ok(image_type) = model.image_type.parse::<ImageType>() else {
            warn!(
                image_id = model.id,
                image_type = %model.image_type,
                "Skipping image with unknown type"
            );
            return None;
        };

        Some(
            ImageAsset::new(
                model.id,
                image_type,
                model.content_type,
                model.image_data,
                model.position,
            )
            .owned_by(MovieId::new(model.movie_id)),
        )
    }

    async fn images_for(&self, movie_id: i32) -> Result<Vec<movie_images::Model>, StoreError> {
        Ok(MovieImages::find()
            .filter(movie_images::Column::MovieId.eq(movie_id))
            .order_by_asc(movie_images::Column::Position)
            .all(&self.conn)
            .await?)
    }

    pub async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, StoreError> {
        let Some(model) = Movies::find()
            .filter(movies::Column::TitleKey.eq(title_key(title)))
            .one(&self.conn)
            .await?
        else {
            return Ok(None);
        };

        let images = self.images_for(model.id).await?;
        Ok(Some(Self::map_model_to_movie(model, images)))
    }

    pub async fn count_by_title(&self, title: &str) -> Result<u64, StoreError> {
        Ok(Movies::find()
            .filter(movies::Column::TitleKey.eq(title_key(title)))
            .count(&self.conn)
            .await?)
    }

    /// Writes the movie and every attached image in a single transaction.
    ///
    /// The transaction is opened on the pool, never nested in a caller's, so
    /// it commits or rolls back on its own.
    pub async fn insert(&self, movie: &NewMovie) -> Result<MovieId, StoreError> {
        let external_id = movie
            .external_id
            .ok_or_else(|| StoreError::Invalid("external id is required".to_string()))?;

        let txn = self.conn.begin().await?;

        let inserted = movies::ActiveModel {
            external_id: Set(external_id),
            title: Set(movie.title.clone()),
            title_key: Set(title_key(&movie.title)),
            year: Set(movie.year.clone()),
            director: Set(movie.director.clone()),
            genre: Set(movie.genre.clone()),
            similar_title: Set(movie.similar_title.clone()),
            watched: Set(movie.watched),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let images: Vec<movie_images::ActiveModel> = movie
            .images()
            .iter()
            .zip(0..)
            .map(|(image, position)| movie_images::ActiveModel {
                movie_id: Set(inserted.id),
                position: Set(position),
                image_type: Set(image.image_type.as_str().to_string()),
                content_type: Set(image.content_type.clone()),
                image_data: Set(image.payload.clone()),
                ..Default::default()
            })
            .collect();

        let image_count = images.len();
        if !images.is_empty() {
            MovieImages::insert_many(images).exec(&txn).await?;
        }

        txn.commit().await?;

        info!(
            movie_id = inserted.id,
            title = %inserted.title,
            images = image_count,
            "Inserted movie"
        );
        Ok(MovieId::new(inserted.id))
    }

    pub async fn get(&self, id: MovieId) -> Result<Option<Movie>, StoreError> {
        let Some(model) = Movies::find_by_id(id.value()).one(&self.conn).await? else {
            return Ok(None);
        };

        let images = self.images_for(model.id).await?;
        Ok(Some(Self::map_model_to_movie(model, images)))
    }

    /// Removes the movie and all of its images atomically.
    pub async fn remove(&self, id: MovieId) -> Result<bool, StoreError> {
        let txn = self.conn.begin().await?;

        MovieImages::delete_many()
            .filter(movie_images::Column::MovieId.eq(id.value()))
            .exec(&txn)
            .await?;

        let result = Movies::delete_by_id(id.value()).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!(movie_id = %id, "Removed movie");
        }
        Ok(removed)
    }

    pub async fn set_watched(&self, id: MovieId, watched: bool) -> Result<bool, StoreError> {
        let result = Movies::update_many()
            .col_expr(movies::Column::Watched, Expr::value(watched))
            .filter(movies::Column::Id.eq(id.value()))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list(
        &self,
        page: PageRequest,
        filter: &MovieFilter,
    ) -> Result<Page<Movie>, StoreError> {
        let mut query = Movies::find().order_by_asc(movies::Column::Id);

        if let Some(watched) = filter.watched {
            query = query.filter(movies::Column::Watched.eq(watched));
        }
        if let Some(director) = &filter.director {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(movies::Column::Director)))
                    .eq(director.trim().to_lowercase()),
            );
        }
        if let Some(year) = &filter.year {
            query = query.filter(movies::Column::Year.eq(year.trim()));
        }

        let paginator = query.paginate(&self.conn, page.size());
        let totals = paginator.num_items_and_pages().await?;
        let models = paginator.fetch_page(page.page()).await?;

        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let mut images_by_movie: HashMap<i32, Vec<movie_images::Model>> = HashMap::new();
        if !ids.is_empty() {
            let images = MovieImages::find()
                .filter(movie_images::Column::MovieId.is_in(ids))
                .order_by_asc(movie_images::Column::MovieId)
                .order_by_asc(movie_images::Column::Position)
                .all(&self.conn)
                .await?;
            for image in images {
                images_by_movie.entry(image.movie_id).or_default().push(image);
            }
        }

        let items = models
            .into_iter()
            .map(|model| {
                let images = images_by_movie.remove(&model.id).unwrap_or_default();
                Self::map_model_to_movie(model, images)
            })
            .collect();

        Ok(Page {
            items,
            page: page.page(),
            size: page.size(),
            total_items: totals.number_of_items,
            total_pages: totals.number_of_pages,
        })
    }

    /// Pages over titles alone, without touching the image table.
    pub async fn list_titles(&self, page: PageRequest) -> Result<Page<String>, StoreError> {
        let paginator = Movies::find()
            .select_only()
            .column(movies::Column::Title)
            .order_by_asc(movies::Column::Id)
            .into_tuple::<String>()
            .paginate(&self.conn, page.size());
        let totals = paginator.num_items_and_pages().await?;
        let items = paginator.fetch_page(page.page()).await?;

        Ok(Page {
            items,
            page: page.page(),
            size: page.size(),
            total_items: totals.number_of_items,
            total_pages: totals.number_of_pages,
        })
    }

    pub async fn get_image(
        &self,
        id: MovieId,
        image_type: ImageType,
    ) -> Result<Option<ImageAsset>, StoreError> {
        let model = MovieImages::find()
            .filter(movie_images::Column::MovieId.eq(id.value()))
            .filter(movie_images::Column::ImageType.eq(image_type.as_str()))
            .order_by_asc(movie_images::Column::Position)
            .one(&self.conn)
            .await?;

        Ok(model.and_then(Self::map_image))
    }
}
