mod add;
mod info;
mod list;
mod remove;
mod watched;

pub use add::cmd_add_movie;
pub use info::cmd_movie_info;
pub use list::{cmd_list_movies, cmd_list_titles};
pub use remove::cmd_remove_movie;
pub use watched::cmd_set_watched;

use crate::domain::MovieId;

fn parse_movie_id(id_str: &str) -> Option<MovieId> {
    id_str
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .map(MovieId::new)
}
