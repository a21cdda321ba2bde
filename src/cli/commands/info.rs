use super::parse_movie_id;
use crate::config::Config;
use crate::services::CatalogError;
use crate::state::SharedState;

pub async fn cmd_movie_info(config: &Config, id_str: &str) -> anyhow::Result<()> {
    let Some(id) = parse_movie_id(id_str) else {
        println!("Invalid movie ID: {id_str}");
        return Ok(());
    };

    let state = SharedState::new(config.clone()).await?;

    let movie = match state.movie_service.get_movie(id).await {
        Ok(movie) => movie,
        Err(CatalogError::MovieNotFound(_)) => {
            println!("Movie with ID {id} not found in the catalog.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Movie Info");
    println!("{:-<60}", "");
    println!("Title:    {}", movie.title);
    println!("ID:       {}", movie.id);
    println!("IMDb:     tt{:07}", movie.external_id);
    println!("Year:     {}", movie.year.as_deref().unwrap_or("?"));
    println!("Director: {}", movie.director.as_deref().unwrap_or("?"));
    println!("Genre:    {}", movie.genre.as_deref().unwrap_or("-"));
    println!("Similar:  {}", movie.similar_title.as_deref().unwrap_or("-"));
    println!("Watched:  {}", if movie.watched { "yes" } else { "no" });
    println!("Added:    {}", movie.created_at);

    if !movie.images().is_empty() {
        println!();
        println!("Artwork:");
        for image in movie.images() {
            println!(
                "  [{}] {} {} ({} bytes)",
                image.position,
                image.image_type,
                image.content_type,
                image.payload.len()
            );
        }
    }

    Ok(())
}
