//! File + environment configuration built on the `config` crate.
//!
//! # Resolution order (highest priority first)
//!
//! 1. Environment variables: `PUGVIEW__APP__PUG__BASEDIR=views`
//! 2. Config file (`config/app.toml` under the project root by default)

use std::path::Path;
use std::sync::Arc;

use config::{Config, Environment, File};
use pugview_core::{
    application::ports::ConfigSource,
    domain::FilterTable,
    error::{PugError, PugResult},
};
use serde_json::Value;
use tracing::{debug, instrument};

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "PUGVIEW";

/// Default config file, relative to the project root.
pub const DEFAULT_FILE: &str = "config/app.toml";

/// Layered application configuration.
pub struct LayeredConfig {
    inner: Config,
    filters: FilterTable,
}

impl LayeredConfig {
    /// Load configuration for the project at `root`.
    ///
    /// An explicit `file` must exist; the default file is optional.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn load(root: &Path, file: Option<&Path>) -> PugResult<Self> {
        Self::load_with_env(root, file, None)
    }

    /// Like [`load`](Self::load), reading environment overrides from `env`
    /// instead of the process environment when given.
    pub fn load_with_env(
        root: &Path,
        file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> PugResult<Self> {
        let (path, required) = match file {
            Some(explicit) => (explicit.to_path_buf(), true),
            None => (root.join(DEFAULT_FILE), false),
        };
        debug!(path = %path.display(), required, "Loading configuration");

        let inner = Config::builder()
            .add_source(File::from(path.as_path()).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .map_err(|e| config_error(&path, e))?;

        Ok(Self::from_config(inner))
    }

    /// Wrap an already built [`Config`].
    pub fn from_config(inner: Config) -> Self {
        Self {
            inner,
            filters: FilterTable::new(),
        }
    }

    /// Register a filter handed to templates through `app.pug.filters`.
    pub fn with_filter<F>(mut self, name: impl Into<String>, filter: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.filters.insert(name.into(), Arc::new(filter));
        self
    }
}

impl ConfigSource for LayeredConfig {
    fn get(&self, key: &str) -> Option<Value> {
        self.inner.get::<Value>(key).ok()
    }

    fn get_filters(&self, _key: &str) -> Option<FilterTable> {
        (!self.filters.is_empty()).then(|| self.filters.clone())
    }
}

fn config_error(path: &Path, e: config::ConfigError) -> PugError {
    PugError::Configuration {
        message: format!("{}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project(toml: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("config")).unwrap();
        std::fs::write(dir.path().join(DEFAULT_FILE), toml).unwrap();
        dir
    }

    fn no_env() -> Option<config::Map<String, String>> {
        Some(config::Map::new())
    }

    #[test]
    fn reads_the_default_file() {
        let dir = project(
            r#"
[app.pug]
basedir = "views"
pretty = true

[app.pug.globals]
siteName = "Acme"
"#,
        );
        let config = LayeredConfig::load_with_env(dir.path(), None, no_env()).unwrap();
        assert_eq!(config.get("app.pug.basedir"), Some(json!("views")));
        assert_eq!(config.get("app.pug.pretty"), Some(json!(true)));
        assert_eq!(
            config.get("app.pug.globals"),
            Some(json!({"siteName": "Acme"}))
        );
        assert_eq!(config.get("app.pug.cache"), None);
    }

    #[test]
    fn default_file_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let config = LayeredConfig::load_with_env(dir.path(), None, no_env()).unwrap();
        assert_eq!(config.get("app.pug.basedir"), None);
    }

    #[test]
    fn explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let err = LayeredConfig::load_with_env(dir.path(), Some(&missing), no_env())
            .err()
            .unwrap();
        assert!(matches!(err, PugError::Configuration { .. }));
    }

    #[test]
    fn environment_overrides_the_file() {
        let dir = project("[app.pug]\nbasedir = \"views\"\n");
        let mut env = config::Map::new();
        env.insert("PUGVIEW__APP__PUG__BASEDIR".to_string(), "templates".to_string());
        env.insert("PUGVIEW__APP__PUG__CACHE".to_string(), "true".to_string());

        let config = LayeredConfig::load_with_env(dir.path(), None, Some(env)).unwrap();
        assert_eq!(config.get("app.pug.basedir"), Some(json!("templates")));
        assert_eq!(config.get("app.pug.cache"), Some(json!(true)));
    }
}
