use async_trait::async_trait;
use wtw_models::{MovieDetail, ProviderSource};

use crate::error::SourceError;

/// Anything that can produce the detail record for a movie id
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    async fn movie_detail(&self, movie_id: i64) -> Result<MovieDetail, SourceError>;
}

/// A source of streaming availability for a movie id.
///
/// `Ok(None)` means the source answered but without a usable structure;
/// callers treat it the same as "no data from this source".
#[async_trait]
pub trait AvailabilitySource: Send + Sync {
    fn source_name(&self) -> &str;

    async fn availability(&self, movie_id: i64) -> Result<Option<ProviderSource>, SourceError>;
}
