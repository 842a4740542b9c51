//! bubbl configuration file handling
//!
//! Layout tunables are read from `bubbl.toml`. Every section is optional;
//! anything left out keeps its built-in default.

use anyhow::{Context, Result};
use bubbl_layout::LayoutConfig;
use std::fs;
use std::path::Path;

/// File looked up in the working directory when no `--config` is given
pub const CONFIG_FILE: &str = "bubbl.toml";

/// Load the layout configuration
///
/// An explicit path must exist. Without one, `bubbl.toml` in `dir` is used
/// when present and the defaults otherwise.
pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<LayoutConfig> {
    if let Some(path) = explicit {
        return load_file(path);
    }

    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        return load_file(&path);
    }

    tracing::debug!("No {} in {}, using defaults", CONFIG_FILE, dir.display());
    Ok(LayoutConfig::default())
}

fn load_file(path: &Path) -> Result<LayoutConfig> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config = parse(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Parse a configuration document
pub fn parse(content: &str) -> Result<LayoutConfig> {
    Ok(toml::from_str(content)?)
}

/// Serialize configuration to TOML
pub fn to_toml(config: &LayoutConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize configuration")
}
