use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

pub const TMDB_ACCESS_TOKEN_KEY: &str = "tmdb_access_token";
pub const WATCHMODE_API_KEY_KEY: &str = "watchmode_api_key";

/// Environment variables that take precedence over the credentials file
pub const TMDB_ACCESS_TOKEN_ENV: &str = "TMDB_API_ACCESS_TOKEN";
pub const WATCHMODE_API_KEY_ENV: &str = "WATCHMODE_API_KEY";

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    /// Catalog bearer token: environment first, then the credentials file. Blank counts as missing.
    pub fn tmdb_access_token(&self) -> Option<String> {
        self.resolve(TMDB_ACCESS_TOKEN_ENV, TMDB_ACCESS_TOKEN_KEY)
    }

    pub fn set_tmdb_access_token(&mut self, token: String) {
        self.set(TMDB_ACCESS_TOKEN_KEY.to_string(), token);
    }

    /// Provider-source API key: environment first, then the credentials file
    pub fn watchmode_api_key(&self) -> Option<String> {
        self.resolve(WATCHMODE_API_KEY_ENV, WATCHMODE_API_KEY_KEY)
    }

    pub fn set_watchmode_api_key(&mut self, key: String) {
        self.set(WATCHMODE_API_KEY_KEY.to_string(), key);
    }

    fn resolve(&self, env_var: &str, key: &str) -> Option<String> {
        std::env::var(env_var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.get(key).filter(|v| !v.trim().is_empty()).cloned())
    }
}
