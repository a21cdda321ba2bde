use super::parse_movie_id;
use crate::config::Config;
use crate::services::CatalogError;
use crate::state::SharedState;

pub async fn cmd_remove_movie(
    config: &Config,
    id_str: &str,
    skip_confirm: bool,
) -> anyhow::Result<()> {
    let Some(id) = parse_movie_id(id_str) else {
        println!("Invalid movie ID: {id_str}");
        println!("Use 'marquee list' to see movie IDs.");
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

    if !skip_confirm {
        println!("Remove '{}' (ID: {}) and its artwork?", movie.title, movie.id);
        println!("Enter 'y' to confirm, anything else to cancel:");

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    state.movie_service.delete_movie(id).await?;
    println!("✓ Removed: {}", movie.title);

    Ok(())
}
