use super::spinner::Spinner;
use super::{tmdb_or_report, AppContext};
use crate::output::Output;
use color_eyre::Result;
use serde_json::json;
use tracing::{error, info};
use wtw_core::{load_movie_page, CardInfo, CardTarget, RenderInstruction};
use wtw_models::LibraryItem;
use wtw_sources::{AvailabilitySource, MovieCatalog};

pub const INVALID_MOVIE_ID: &str = "Invalid or missing movie ID.";

/// Positive integer ids only
pub fn parse_movie_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

pub async fn run_movie(raw_id: String, region: Option<String>, output: &Output) -> Result<()> {
    let Some(movie_id) = parse_movie_id(&raw_id) else {
        output.error(INVALID_MOVIE_ID);
        return Ok(());
    };

    let ctx = AppContext::load()?;
    let Some(catalog) = tmdb_or_report(&ctx, output)? else {
        return Ok(());
    };
    let watchmode = ctx.watchmode();
    if let Err(reason) = &watchmode {
        info!("Watchmode unavailable ({:?}); using catalog providers only", reason);
        if output.is_human() {
            output.warn(reason.message());
        }
    }
    let region = ctx.region(region.as_deref());

    let spinner = Spinner::start(format!("Loading movie {}...", movie_id));
    let page = load_movie_page(
        &catalog,
        watchmode.as_ref().ok().map(|w| w as &dyn AvailabilitySource),
        Some(&catalog),
        movie_id,
        &region,
        ctx.config.provider_policy,
    )
    .await;
    spinner.finish();

    let page = match page {
        Ok(page) => page,
        Err(e) => {
            error!("Failed to load movie {}: {}", movie_id, e);
            output.error("Failed to load movie details.");
            return Ok(());
        }
    };

    let library = ctx.library()?;
    let mut item = LibraryItem::from_movie(&page.detail.movie);
    item.title = page.detail.display_title().to_string();
    library.upsert_recent(item);

    output.movie_page(
        &page.detail,
        &page.availability,
        &page.region,
        library.is_favorite(movie_id),
        watchmode.is_ok(),
    );
    Ok(())
}

/// Toggle a movie in favorites, fetching its title and poster for the card
pub async fn run_favorite(raw_id: String, output: &Output) -> Result<()> {
    let Some(movie_id) = parse_movie_id(&raw_id) else {
        output.error(INVALID_MOVIE_ID);
        return Ok(());
    };

    let ctx = AppContext::load()?;
    let library = ctx.library()?;

    // Removing needs no network; the stored card is enough
    let card = match library.favorites().into_iter().find(|item| item.id == movie_id) {
        Some(item) => CardInfo::new(item.id, item.title, item.poster_url, item.year),
        None => {
            let Some(catalog) = tmdb_or_report(&ctx, output)? else {
                return Ok(());
            };
            let spinner = Spinner::start(format!("Loading movie {}...", movie_id));
            let detail = catalog.movie_detail(movie_id).await;
            spinner.finish();

            match detail {
                Ok(detail) => {
                    let mut card = CardInfo::from_movie(&detail.movie);
                    card.title = detail.display_title().to_string();
                    card
                }
                Err(e) => {
                    error!("Failed to load movie {}: {}", movie_id, e);
                    output.error("Failed to load movie details.");
                    return Ok(());
                }
            }
        }
    };

    let title = card.title.clone();
    match library.dispatch(CardTarget::FavoriteButton(card)) {
        RenderInstruction::RefreshLibrary { favorite_active: true } => {
            output.success(format!("Added \"{}\" to favorites", title));
        }
        RenderInstruction::RefreshLibrary { favorite_active: false } => {
            output.success(format!("Removed \"{}\" from favorites", title));
        }
        _ => {}
    }
    output.json(&json!({"type": "favorite", "id": movie_id, "favorite": library.is_favorite(movie_id)}));
    Ok(())
}
