//! protofold.toml loading and validation

use anyhow::{Context, Result};
use protofold_core::GeneratorConfig;
use protofold_logging::LogLevel;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `-c` is not given
pub const DEFAULT_CONFIG_FILE: &str = "protofold.toml";

/// Parse a protofold.toml document
pub fn from_toml_str(content: &str) -> Result<GeneratorConfig> {
    let config: GeneratorConfig = toml::from_str(content).context("Failed to parse config")?;
    config.validate()?;
    log_level(&config)?;
    Ok(config)
}

/// Load and validate a config file
pub fn from_file(path: impl AsRef<Path>) -> Result<GeneratorConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    from_toml_str(&content).with_context(|| format!("Invalid config: {}", path.display()))
}

/// Resolve which config to use.
///
/// An explicit path must exist. Without one, `protofold.toml` in `dir` is used
/// when present, otherwise the defaults.
pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<(GeneratorConfig, Option<PathBuf>)> {
    if let Some(path) = explicit {
        return Ok((from_file(path)?, Some(path.to_path_buf())));
    }

    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    if candidate.is_file() {
        return Ok((from_file(&candidate)?, Some(candidate)));
    }

    tracing::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
    Ok((GeneratorConfig::default(), None))
}

/// The config's `log_level`, parsed
pub fn log_level(config: &GeneratorConfig) -> Result<LogLevel> {
    config
        .log_level
        .parse()
        .context("Invalid log_level in config")
}
