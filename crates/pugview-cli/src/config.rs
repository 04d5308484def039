//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by reference.
//! It owns the layered configuration source handed to the core.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables (`PUGVIEW__APP__PUG__BASEDIR=...`)
//! 3. Config file (`--config`, or `config/app.toml` in the project root)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use serde::Deserialize;
use tracing::debug;

use pugview_adapters::LayeredConfig;
use pugview_core::{
    application::{ConfigSource, services::config_keys},
    domain::{DEFAULT_EXTENSION, normalise_extension},
};

/// Application configuration.
pub struct AppConfig {
    /// Project root; the working directory.
    pub root: PathBuf,
    /// Output settings (`[output]` table).
    pub output: OutputConfig,
    source: Arc<LayeredConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration for the current directory.
    ///
    /// `config_file` is the path the user passed via `--config`, or `None`
    /// for the default location.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let root = std::env::current_dir().context("Failed to determine the current directory")?;
        Self::load_from(root, config_file.map(PathBuf::as_path))
    }

    /// Load configuration for the project at `root`.
    pub fn load_from(root: PathBuf, config_file: Option<&Path>) -> anyhow::Result<Self> {
        let source = LayeredConfig::load(&root, config_file)?;

        let output = match source.get("output") {
            Some(value) => {
                serde_json::from_value(value).context("Invalid [output] configuration")?
            }
            None => OutputConfig::default(),
        };
        debug!(root = %root.display(), ?output, "Configuration loaded");

        Ok(Self {
            root,
            output,
            source: Arc::new(source),
        })
    }

    /// The configuration source handed to the core.
    pub fn source(&self) -> Arc<dyn ConfigSource> {
        self.source.clone()
    }

    /// Extension of view files, from `app.pug.extension`.
    pub fn view_extension(&self) -> String {
        self.source
            .get(config_keys::EXTENSION)
            .and_then(|v| v.as_str().and_then(|s| normalise_extension(s).ok()))
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(toml: Option<&str>) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        if let Some(toml) = toml {
            std::fs::create_dir_all(dir.path().join("config")).unwrap();
            std::fs::write(dir.path().join("config/app.toml"), toml).unwrap();
        }
        dir
    }

    #[test]
    fn defaults_without_a_file() {
        let dir = project(None);
        let cfg = AppConfig::load_from(dir.path().to_path_buf(), None).unwrap();
        assert!(!cfg.output.no_color);
        assert_eq!(cfg.view_extension(), "pug");
    }

    #[test]
    fn reads_output_and_extension() {
        let dir = project(Some("[output]\nno_color = true\n\n[app.pug]\nextension = \".jade\"\n"));
        let cfg = AppConfig::load_from(dir.path().to_path_buf(), None).unwrap();
        assert!(cfg.output.no_color);
        assert_eq!(cfg.view_extension(), "jade");
    }

    #[test]
    fn invalid_extension_falls_back() {
        let dir = project(Some("[app.pug]\nextension = \"a/b\"\n"));
        let cfg = AppConfig::load_from(dir.path().to_path_buf(), None).unwrap();
        assert_eq!(cfg.view_extension(), "pug");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = project(None);
        let missing = dir.path().join("nope.toml");
        assert!(AppConfig::load_from(dir.path().to_path_buf(), Some(&missing)).is_err());
    }

    #[test]
    fn source_exposes_values() {
        let dir = project(Some("[app]\nname = \"Acme\"\n"));
        let cfg = AppConfig::load_from(dir.path().to_path_buf(), None).unwrap();
        assert_eq!(
            cfg.source().get("app.name"),
            Some(serde_json::json!("Acme"))
        );
    }
}
