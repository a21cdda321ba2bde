use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::{OmdbClient, PrimarySource, SecondarySource, TmdbClient, build_http_client};
use crate::config::Config;
use crate::db::{CatalogStore, Store};
use crate::services::{CatalogMovieService, MovieService};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub movie_service: Arc<dyn MovieService>,
}

impl SharedState {
    /// Connects the store and wires the real provider adapters.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        // One client for every provider call and image download so they share
        // the connection pool and the configured timeout.
        let http_client = build_http_client(&config.http)?;

        let omdb = Arc::new(OmdbClient::new(http_client.clone(), &config.omdb));
        let tmdb = Arc::new(TmdbClient::new(http_client, &config.tmdb));

        Ok(Self::from_parts(config, store, omdb, tmdb))
    }

    /// Builds the state around an already connected store and arbitrary
    /// provider implementations.
    #[must_use]
    pub fn from_parts(
        config: Config,
        store: Store,
        primary: Arc<dyn PrimarySource>,
        secondary: Arc<dyn SecondarySource>,
    ) -> Self {
        let catalog: Arc<dyn CatalogStore> = Arc::new(store.clone());
        let movie_service: Arc<dyn MovieService> =
            Arc::new(CatalogMovieService::new(primary, secondary, catalog));

        Self {
            config: Arc::new(RwLock::new(config)),
            store,
            movie_service,
        }
    }
}
