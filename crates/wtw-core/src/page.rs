//! Everything the movie page needs, fetched concurrently.

use futures::future::OptionFuture;
use serde::Serialize;
use tracing::{debug, warn};
use wtw_config::ProviderPolicy;
use wtw_models::{MovieDetail, ProviderGroup};
use wtw_sources::{AvailabilitySource, MovieCatalog, SourceError};

use crate::aggregate::aggregate;
use crate::availability::{select_availability, Availability};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoviePage {
    pub detail: MovieDetail,
    pub availability: Availability,
    pub region: String,
}

/// Fetch the detail and both availability sources at once.
///
/// Only a detail failure fails the page. An availability source that is
/// missing, errors, or answers without structure counts as "no data".
pub async fn load_movie_page(
    catalog: &dyn MovieCatalog,
    flat_source: Option<&dyn AvailabilitySource>,
    grouped_source: Option<&dyn AvailabilitySource>,
    movie_id: i64,
    region: &str,
    policy: ProviderPolicy,
) -> Result<MoviePage, SourceError> {
    let flat_fetch: OptionFuture<_> = flat_source.map(|source| fetch_groups(source, movie_id, region)).into();
    let grouped_fetch: OptionFuture<_> = grouped_source.map(|source| fetch_groups(source, movie_id, region)).into();

    let (detail, flat, grouped) = tokio::join!(catalog.movie_detail(movie_id), flat_fetch, grouped_fetch);
    let detail = detail?;

    let availability = select_availability(flat.flatten(), grouped.flatten(), policy);
    debug!("Movie {} availability: {} groups", movie_id, availability.groups().len());

    Ok(MoviePage {
        detail,
        availability,
        region: region.to_string(),
    })
}

async fn fetch_groups(source: &dyn AvailabilitySource, movie_id: i64, region: &str) -> Option<Vec<ProviderGroup>> {
    match source.availability(movie_id).await {
        Ok(Some(raw)) => Some(aggregate(&raw, region)),
        Ok(None) => {
            debug!("{} has no availability structure for movie {}", source.source_name(), movie_id);
            None
        }
        Err(e) => {
            warn!("{} availability failed for movie {}: {}", source.source_name(), movie_id, e);
            None
        }
    }
}
