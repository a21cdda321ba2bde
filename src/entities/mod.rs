pub mod prelude;

pub mod movie_images;
pub mod movies;
