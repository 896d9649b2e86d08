use super::prompts;
use super::AppContext;
use crate::output::{styled_table, Output};
use clap::ValueEnum;
use color_eyre::Result;
use comfy_table::Cell;
use owo_colors::OwoColorize;
use serde_json::json;
use wtw_config::{Config, ProviderPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    PreferFlat,
    PreferGrouped,
    FlatOnly,
    GroupedOnly,
}

impl From<PolicyArg> for ProviderPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::PreferFlat => ProviderPolicy::PreferFlat,
            PolicyArg::PreferGrouped => ProviderPolicy::PreferGrouped,
            PolicyArg::FlatOnly => ProviderPolicy::FlatOnly,
            PolicyArg::GroupedOnly => ProviderPolicy::GroupedOnly,
        }
    }
}

/// Values for `wtw config set`; unset fields keep their current value
#[derive(Debug, Default)]
pub struct ConfigUpdate {
    pub region: Option<String>,
    pub language: Option<String>,
    pub recents_max: Option<usize>,
    pub provider_policy: Option<PolicyArg>,
    pub watchmode_enabled: Option<bool>,
}

impl ConfigUpdate {
    fn is_empty(&self) -> bool {
        self.region.is_none()
            && self.language.is_none()
            && self.recents_max.is_none()
            && self.provider_policy.is_none()
            && self.watchmode_enabled.is_none()
    }

    fn apply(self, config: &mut Config) {
        if let Some(region) = self.region {
            let region = region.trim().to_uppercase();
            config.region = if region.is_empty() { None } else { Some(region) };
        }
        if let Some(language) = self.language {
            config.language = language;
        }
        if let Some(recents_max) = self.recents_max {
            config.recents_max = recents_max;
        }
        if let Some(policy) = self.provider_policy {
            config.provider_policy = policy.into();
        }
        if let Some(enabled) = self.watchmode_enabled {
            config.watchmode.enabled = enabled;
        }
    }
}

pub async fn run_config(cmd: crate::ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show { full } => show_config(full, output),
        crate::ConfigCommands::Tmdb { token } => configure_tmdb(token, output),
        crate::ConfigCommands::Watchmode { api_key } => configure_watchmode(api_key, output),
        crate::ConfigCommands::Set {
            region,
            language,
            recents_max,
            provider_policy,
            watchmode_enabled,
        } => set_config(
            ConfigUpdate {
                region,
                language,
                recents_max,
                provider_policy,
                watchmode_enabled,
            },
            output,
        ),
    }
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let config = &ctx.config;
    let token = ctx.credentials.tmdb_access_token();
    let api_key = ctx.credentials.watchmode_api_key();

    if !output.is_human() {
        output.json(&json!({
            "type": "config",
            "config_file": ctx.paths.config_file().display().to_string(),
            "config": config,
            "effective_region": config.effective_region(),
            "tmdb_access_token": token.as_deref().map(|t| display_secret(t, full)),
            "watchmode_api_key": api_key.as_deref().map(|k| display_secret(k, full)),
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    let mut table = styled_table(vec!["Setting", "Value"]);
    table.add_row(vec![Cell::new("Config File"), Cell::new(ctx.paths.config_file().display())]);
    table.add_row(vec![Cell::new("Library"), Cell::new(ctx.paths.library_dir().display())]);
    table.add_row(vec![
        Cell::new("Region"),
        Cell::new(match &config.region {
            Some(region) => region.clone(),
            None => format!("{} (detected)", config.effective_region()),
        }),
    ]);
    table.add_row(vec![Cell::new("Language"), Cell::new(&config.language)]);
    table.add_row(vec![Cell::new("Recents Kept"), Cell::new(config.recents_max)]);
    table.add_row(vec![Cell::new("Provider Policy"), Cell::new(format!("{:?}", config.provider_policy))]);
    table.add_row(vec![Cell::new("TMDB URL"), Cell::new(&config.tmdb.base_url)]);
    table.add_row(vec![
        Cell::new("TMDB Token"),
        Cell::new(token.as_deref().map(|t| display_secret(t, full)).unwrap_or_else(not_set)),
    ]);
    table.add_row(vec![
        Cell::new("Watchmode"),
        Cell::new(if config.watchmode.enabled { "✓".green().to_string() } else { "✗".red().to_string() }),
    ]);
    table.add_row(vec![Cell::new("Watchmode URL"), Cell::new(&config.watchmode.base_url)]);
    table.add_row(vec![
        Cell::new("Watchmode Key"),
        Cell::new(api_key.as_deref().map(|k| display_secret(k, full)).unwrap_or_else(not_set)),
    ]);
    println!("{}", table);
    Ok(())
}

fn configure_tmdb(token: Option<String>, output: &Output) -> Result<()> {
    let token = match token {
        Some(token) => token,
        None => prompts::prompt_secret("TMDB API read access token")?,
    };
    let token = token.trim().to_string();
    if token.is_empty() {
        output.error("Token cannot be empty");
        return Ok(());
    }

    let mut ctx = AppContext::load()?;
    ctx.credentials.set_tmdb_access_token(token);
    ctx.credentials
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;
    output.success(format!("TMDB token saved to {}", ctx.paths.credentials_file().display()));
    Ok(())
}

fn configure_watchmode(api_key: Option<String>, output: &Output) -> Result<()> {
    let api_key = match api_key {
        Some(key) => key,
        None => prompts::prompt_secret("Watchmode API key")?,
    };
    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        output.error("API key cannot be empty");
        return Ok(());
    }

    let mut ctx = AppContext::load()?;
    ctx.credentials.set_watchmode_api_key(api_key);
    ctx.credentials
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;
    output.success(format!("Watchmode key saved to {}", ctx.paths.credentials_file().display()));
    Ok(())
}

fn set_config(mut update: ConfigUpdate, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;

    if update.is_empty() {
        let current = ctx.config.region.clone().unwrap_or_default();
        let region = prompts::prompt_string("Region (two letters, empty to detect)", Some(&current))?;
        update.region = Some(region);
    }

    let mut config = ctx.config.clone();
    update.apply(&mut config);
    if let Err(e) = config.validate() {
        output.error(format!("Invalid configuration: {}", e));
        return Ok(());
    }

    let config_file = ctx.paths.config_file();
    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config to {}: {}", config_file.display(), e))?;
    output.success(format!("Configuration saved to {}", config_file.display()));
    Ok(())
}

fn not_set() -> String {
    "<not set>".to_string()
}

fn display_secret(secret: &str, full: bool) -> String {
    if full {
        secret.to_string()
    } else {
        mask_string(secret)
    }
}

fn mask_string(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.is_empty() {
        return not_set();
    }
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string("abc"), "***");
        assert_eq!(mask_string("eyJhbGciOi"), "ey***Oi");
    }

    #[test]
    fn test_config_update_apply() {
        let mut config = Config::default();
        ConfigUpdate {
            region: Some(" gb ".to_string()),
            recents_max: Some(10),
            provider_policy: Some(PolicyArg::GroupedOnly),
            ..ConfigUpdate::default()
        }
        .apply(&mut config);

        assert_eq!(config.region.as_deref(), Some("GB"));
        assert_eq!(config.recents_max, 10);
        assert_eq!(config.provider_policy, ProviderPolicy::GroupedOnly);
        assert_eq!(config.language, "en-US");

        ConfigUpdate {
            region: Some(String::new()),
            ..ConfigUpdate::default()
        }
        .apply(&mut config);
        assert_eq!(config.region, None);
    }
}
