pub use super::movie_images::Entity as MovieImages;
pub use super::movies::Entity as Movies;
