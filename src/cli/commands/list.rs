//! List movies command handlers

use crate::config::Config;
use crate::domain::PageRequest;
use crate::models::movie::MovieFilter;
use crate::state::SharedState;

pub async fn cmd_list_movies(
    config: &Config,
    page: PageRequest,
    filter: &MovieFilter,
) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let movies = state.movie_service.list_movies(page, filter).await?;

    if movies.items.is_empty() {
        if movies.total_items == 0 {
            println!("No movies in the catalog.");
            println!();
            println!("Add movies with: marquee add \"movie title\"");
        } else {
            println!("Page {} is empty ({} pages).", page.page(), movies.total_pages);
        }
        return Ok(());
    }

    println!(
        "Movies ({} total, page {}/{})",
        movies.total_items,
        movies.page + 1,
        movies.total_pages
    );
    println!("{:-<70}", "");

    for movie in &movies.items {
        let indicator = if movie.watched { "✓" } else { "•" };
        println!(
            "{} {} ({})",
            indicator,
            movie.title,
            movie.year.as_deref().unwrap_or("?")
        );
        println!(
            "  ID: {} | Director: {} | Genre: {}",
            movie.id,
            movie.director.as_deref().unwrap_or("?"),
            movie.genre.as_deref().unwrap_or("-")
        );
    }

    println!();
    println!("Legend: ✓ Watched | • Unwatched");

    Ok(())
}

pub async fn cmd_list_titles(config: &Config, page: PageRequest) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let titles = state.movie_service.list_titles(page).await?;

    for title in &titles.items {
        println!("{title}");
    }

    Ok(())
}
