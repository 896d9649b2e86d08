pub mod actions;
pub mod aggregate;
pub mod availability;
pub mod library;
pub mod page;
pub mod session;

pub use actions::{reduce, CardInfo, CardTarget, LibraryState, RenderInstruction};
pub use aggregate::aggregate;
pub use availability::{select_availability, Availability};
pub use library::{FileStore, KeyValueStore, Library, MemoryStore};
pub use page::{load_movie_page, MoviePage};
pub use session::Session;
