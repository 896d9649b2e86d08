pub mod error;
pub mod http;
pub mod tmdb;
pub mod traits;
pub mod watchmode;

pub use error::SourceError;
pub use tmdb::TmdbClient;
pub use traits::{AvailabilitySource, MovieCatalog};
pub use watchmode::WatchmodeClient;
