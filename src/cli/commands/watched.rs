use super::parse_movie_id;
use crate::config::Config;
use crate::services::CatalogError;
use crate::state::SharedState;

pub async fn cmd_set_watched(config: &Config, id_str: &str, watched: bool) -> anyhow::Result<()> {
    let Some(id) = parse_movie_id(id_str) else {
        println!("Invalid movie ID: {id_str}");
        return Ok(());
    };

    let state = SharedState::new(config.clone()).await?;

    match state.movie_service.set_watched(id, watched).await {
        Ok(movie) => {
            let label = if movie.watched { "watched" } else { "unwatched" };
            println!("✓ Marked '{}' as {label}", movie.title);
            Ok(())
        }
        Err(CatalogError::MovieNotFound(_)) => {
            println!("Movie with ID {id} not found in the catalog.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
