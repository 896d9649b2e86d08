pub mod catalog;
pub mod clear;
pub mod config;
pub mod library;
pub mod movie;
pub mod prompts;
pub mod spinner;

use color_eyre::Result;
use tracing::{debug, warn};
use wtw_config::{Config, CredentialStore, PathManager};
use wtw_core::{FileStore, Library};
use wtw_models::GenreMap;
use wtw_sources::{SourceError, TmdbClient, WatchmodeClient};

use crate::output::Output;

pub const MISSING_TOKEN: &str = "Missing API token.";

/// Why the flat availability source is not queried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchmodeUnavailable {
    Disabled,
    MissingKey,
}

impl WatchmodeUnavailable {
    pub fn message(&self) -> &'static str {
        match self {
            WatchmodeUnavailable::Disabled => "Watchmode is disabled; showing catalog providers only.",
            WatchmodeUnavailable::MissingKey => {
                "Watchmode API key is missing. Set WATCHMODE_API_KEY or run 'wtw config watchmode'."
            }
        }
    }
}

/// Paths, config and credentials every command starts from
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub credentials: CredentialStore,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();

        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

        let credentials_file = paths.credentials_file();
        let mut credentials = CredentialStore::new(credentials_file.clone());
        credentials
            .load()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;

        Ok(Self {
            paths,
            config,
            credentials,
        })
    }

    pub fn tmdb(&self) -> Result<TmdbClient, SourceError> {
        let token = self.credentials.tmdb_access_token().unwrap_or_default();
        Ok(TmdbClient::new(token)?
            .with_base_url(&self.config.tmdb.base_url)
            .with_language(&self.config.language))
    }

    /// Flat source client, or why it is skipped
    pub fn watchmode(&self) -> std::result::Result<WatchmodeClient, WatchmodeUnavailable> {
        if !self.config.watchmode.enabled {
            debug!("Watchmode disabled in config");
            return Err(WatchmodeUnavailable::Disabled);
        }
        let key = self
            .credentials
            .watchmode_api_key()
            .ok_or(WatchmodeUnavailable::MissingKey)?;
        match WatchmodeClient::new(key) {
            Ok(client) => Ok(client.with_base_url(&self.config.watchmode.base_url)),
            Err(e) => {
                warn!("Watchmode client unavailable: {}", e);
                Err(WatchmodeUnavailable::MissingKey)
            }
        }
    }

    pub fn library(&self) -> Result<Library<FileStore>> {
        let dir = self.paths.library_dir();
        let store = FileStore::new(&dir)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to open library at {}: {}", dir.display(), e))?;
        Ok(Library::new(store).with_recents_max(self.config.recents_max))
    }

    pub fn region(&self, requested: Option<&str>) -> String {
        requested
            .filter(|r| wtw_config::locale::is_region_code(r))
            .map(str::to_uppercase)
            .unwrap_or_else(|| self.config.effective_region())
    }
}

/// Catalog client, or the missing-token message and `None`
pub fn tmdb_or_report(ctx: &AppContext, output: &Output) -> Result<Option<TmdbClient>> {
    match ctx.tmdb() {
        Ok(client) => Ok(Some(client)),
        Err(e) if e.is_missing_credential() => {
            warn!("TMDB access token is missing. Set TMDB_API_ACCESS_TOKEN or run 'wtw config tmdb'.");
            output.error(MISSING_TOKEN);
            Ok(None)
        }
        Err(e) => Err(color_eyre::eyre::eyre!(e)),
    }
}

/// Genre names for labelling; a failed load is an empty map
pub async fn load_genres(client: &TmdbClient) -> GenreMap {
    match client.genres().await {
        Ok(genres) => genres,
        Err(e) => {
            warn!("Failed to load genres: {}", e);
            GenreMap::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn context(watchmode_enabled: bool) -> AppContext {
        let paths = PathManager::from_base(PathBuf::from("/nonexistent/wtw"));
        let credentials = CredentialStore::new(paths.credentials_file());
        let mut config = Config::default();
        config.watchmode.enabled = watchmode_enabled;
        AppContext {
            paths,
            config,
            credentials,
        }
    }

    #[test]
    fn test_watchmode_disabled_is_reported() {
        assert_eq!(context(false).watchmode().err(), Some(WatchmodeUnavailable::Disabled));
    }

    #[test]
    fn test_watchmode_without_key_is_reported() {
        if std::env::var("WATCHMODE_API_KEY").is_ok() {
            return;
        }
        assert_eq!(context(true).watchmode().err(), Some(WatchmodeUnavailable::MissingKey));
    }

    #[test]
    fn test_watchmode_with_key_builds_client() {
        let mut ctx = context(true);
        ctx.credentials.set_watchmode_api_key("key".to_string());
        assert!(ctx.watchmode().is_ok());
    }
}
