pub mod merge;

pub mod movie_service;
pub use movie_service::{CatalogError, MovieService};

pub mod movie_service_impl;
pub use movie_service_impl::CatalogMovieService;
