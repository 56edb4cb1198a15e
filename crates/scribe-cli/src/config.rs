//! Exporter configuration
//!
//! Layered: built-in defaults, then an optional `scribe.toml`, then
//! `SCRIBE_*` environment variables.

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use scribe_render::DEFAULT_CDN_BASE;

/// Exporter settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Export directory holding `channels/`, `avatars/`, `attachments/`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// URL prefix for attachment links in text output
    #[serde(default = "default_cdn_base")]
    pub cdn_base: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cdn_base: default_cdn_base(),
        }
    }
}

impl ExportConfig {
    /// Load settings from file and environment.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("scribe").required(false))
            .add_source(Environment::with_prefix("SCRIBE"))
            .build()?
            .try_deserialize()
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_cdn_base() -> String {
    DEFAULT_CDN_BASE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ExportConfig::default();
        assert_eq!(cfg.data_dir, PathBuf::from("."));
        assert_eq!(cfg.cdn_base, "https://cdn.discordapp.com/");
    }
}
