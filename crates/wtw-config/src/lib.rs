pub mod config;
pub mod credentials;
pub mod locale;
pub mod paths;

pub use config::{Config, ProviderPolicy, TmdbConfig, WatchmodeConfig, DEFAULT_RECENTS_MAX};
pub use credentials::CredentialStore;
pub use paths::{container_base_path, PathManager};
