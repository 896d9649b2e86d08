pub mod coerce;
pub mod detail;
pub mod genre;
pub mod library;
pub mod movie;
pub mod provider;

pub use detail::MovieDetail;
pub use genre::GenreMap;
pub use library::LibraryItem;
pub use movie::{InvalidMovie, Movie, IMAGE_BASE_URL};
pub use provider::{
    FlatSource, GroupedAvailability, GroupedOffer, OfferType, ProviderGroup, ProviderOffer, ProviderSource,
    RegionOffers, SourceKind,
};
