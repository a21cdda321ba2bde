use crate::config::Config;
use crate::services::CatalogError;
use crate::state::SharedState;

pub async fn cmd_add_movie(config: &Config, title: &str) -> anyhow::Result<()> {
    println!("Looking up: {title}");

    let state = SharedState::new(config.clone()).await?;

    let movie = match state.movie_service.add_movie(title).await {
        Ok(movie) => movie,
        Err(CatalogError::Duplicate(_)) => {
            println!("'{title}' is already in the catalog.");
            println!("Use 'marquee list' to see catalogued movies.");
            return Ok(());
        }
        Err(CatalogError::TitleNotFound { provider, .. }) => {
            println!("{provider} has no movie matching '{title}'.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!();
    println!("✓ Added: {} (ID: {})", movie.title, movie.id);
    println!("  Year:     {}", movie.year.as_deref().unwrap_or("?"));
    println!("  Director: {}", movie.director.as_deref().unwrap_or("?"));
    println!("  Genre:    {}", movie.genre.as_deref().unwrap_or("-"));
    if let Some(similar) = &movie.similar_title {
        println!("  Similar:  {similar}");
    }
    println!("  Images:   {}", movie.images().len());

    Ok(())
}
