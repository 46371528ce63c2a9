use anyhow::{Context, Result};
use atv_client::AppConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use std::path::Path;

/// Environment prefix; nested keys use `__` (`ATV__HTTP__USER_AGENT`).
pub const ENV_PREFIX: &str = "ATV__";

/// Command-line values that win over every other layer.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub storage_url: Option<String>,
    pub insecure: bool,
}

/// Layered config:
/// 1) defaults -> 2) YAML (if provided) -> 3) env (ATV__*) -> 4) CLI overrides
pub fn figment(path: Option<&Path>, overrides: &Overrides) -> Result<Figment> {
    let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

    if let Some(path) = path {
        if !path.is_file() {
            anyhow::bail!("config file does not exist: {}", path.display());
        }
        figment = figment.merge(Yaml::file(path));
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    if let Some(url) = &overrides.api_url {
        figment = figment.merge(Serialized::default("api_base_url", url));
    }
    if let Some(url) = &overrides.storage_url {
        figment = figment.merge(Serialized::default("storage_url", url));
    }
    if overrides.insecure {
        figment = figment.merge(Serialized::default("http.allow_insecure_http", true));
    }
    Ok(figment)
}

/// Load, extract and validate the effective configuration.
pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<AppConfig> {
    let config: AppConfig = figment(path, overrides)?
        .extract()
        .context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}

pub fn to_yaml(config: &AppConfig) -> Result<String> {
    serde_yaml::to_string(config).context("failed to serialize configuration to YAML")
}
