use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Config;

pub fn load_config(path: &Path) -> Result<Config> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

/// Load the config file, falling back to defaults when it is absent and
/// the base URL comes from the command line instead.
pub fn resolve_config(path: &Path, base_url: Option<&str>) -> Result<Config> {
    let mut config = if !path.exists() && base_url.is_some() {
        Config::default()
    } else {
        load_config(path)?
    };
    if let Some(url) = base_url {
        config.api.base_url = url.to_string();
    }
    Ok(config)
}
