use super::spinner::Spinner;
use super::{load_genres, tmdb_or_report, AppContext};
use crate::output::Output;
use color_eyre::Result;
use tracing::{error, info};
use wtw_core::session::filter_by_query;
use wtw_core::Session;

pub async fn run_search(query: String, genre: Option<i64>, filter: Option<String>, output: &Output) -> Result<()> {
    let query = query.trim().to_string();
    if query.is_empty() {
        output.info("Start typing to search for movies.");
        return Ok(());
    }

    let ctx = AppContext::load()?;
    let Some(client) = tmdb_or_report(&ctx, output)? else {
        return Ok(());
    };

    let spinner = Spinner::start(format!("Searching for \"{}\"...", query));
    let (results, genres) = tokio::join!(client.search(&query), load_genres(&client));
    spinner.finish();

    let movies = match results {
        Ok(movies) => movies,
        Err(e) => {
            error!("Search failed: {}", e);
            output.error("Failed to load results.");
            return Ok(());
        }
    };
    info!("Search for {:?} returned {} movies", query, movies.len());

    let mut session = Session::new(genres);
    session.record_search(&query, movies);
    if let Some(genre_id) = genre {
        session.toggle_genre(genre_id);
    }

    let visible = match filter.as_deref() {
        Some(text) => filter_by_query(session.visible_results(), text),
        None => session.visible_results(),
    };

    let heading = match visible.len() {
        0 => format!("Results for \"{}\"", query),
        n => format!("Results for \"{}\" ({})", query, wtw_core::session::results_label(n)),
    };
    let favorites = ctx.library()?.favorites();
    output.movies(&heading, &visible, &session.genres, &favorites, "No results found.");
    Ok(())
}

pub async fn run_genres(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let Some(client) = tmdb_or_report(&ctx, output)? else {
        return Ok(());
    };

    let spinner = Spinner::start("Loading genres...");
    let genres = load_genres(&client).await;
    spinner.finish();

    if genres.is_empty() {
        output.warn("No genres available.");
        return Ok(());
    }
    output.genres(&genres);
    Ok(())
}

pub async fn run_discover(genre_id: i64, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let Some(client) = tmdb_or_report(&ctx, output)? else {
        return Ok(());
    };

    let spinner = Spinner::start("Loading recommendations...");
    let (results, genres) = tokio::join!(client.discover_by_genre(genre_id), load_genres(&client));
    spinner.finish();

    let movies = match results {
        Ok(movies) => movies,
        Err(e) => {
            error!("Failed to load recommendations: {}", e);
            output.error("Failed to load recommendations.");
            return Ok(());
        }
    };

    let heading = match genres.name(genre_id) {
        Some(name) => format!("Popular in {}", name),
        None => format!("Popular in genre {}", genre_id),
    };
    let favorites = ctx.library()?.favorites();
    let refs: Vec<_> = movies.iter().collect();
    output.movies(&heading, &refs, &genres, &favorites, "No recommendations found.");
    Ok(())
}
