//! Configuration resolution.
//!
//! Turns the `app.pug.*` configuration keys into the renderer's base option
//! set, the views directory and a few renderer settings. Resolution never
//! fails: bad or missing values fall back to defaults and are reported as
//! [`ConfigWarning`]s.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::{
    application::ports::ConfigSource,
    domain::{
        DEFAULT_EXTENSION, OptionValue, RendererOptions, VIEWS_DIR, is_truthy, keys,
        normalise_extension,
    },
};

/// Configuration keys read by the resolver.
pub mod config_keys {
    pub const BASEDIR: &str = "app.pug.basedir";
    pub const PRETTY: &str = "app.pug.pretty";
    pub const CACHE: &str = "app.pug.cache";
    pub const DOCTYPE: &str = "app.pug.doctype";
    pub const FILTERS: &str = "app.pug.filters";
    pub const SELF: &str = "app.pug.self";
    pub const DEBUG: &str = "app.pug.debug";
    pub const GLOBALS: &str = "app.pug.globals";
    pub const CALL_SITE_WINS: &str = "app.pug.call_site_wins";
    pub const EXTENSION: &str = "app.pug.extension";
}

/// Non-fatal problems found while resolving configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `app.pug.basedir` was not set; the default views directory is used.
    MissingBasedir { default: &'static str },
    /// `app.pug.extension` was unusable; the default extension is used.
    InvalidExtension { given: String },
    /// `app.pug.globals` was set to something other than a map.
    GlobalsNotAMap,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBasedir { default } => write!(
                f,
                "Pug views directory (app.pug.basedir) not set, defaulting to \"{default}\""
            ),
            Self::InvalidExtension { given } => write!(
                f,
                "View extension '{given}' (app.pug.extension) is invalid, defaulting to \"{DEFAULT_EXTENSION}\""
            ),
            Self::GlobalsNotAMap => write!(f, "app.pug.globals is not a map and was ignored"),
        }
    }
}

/// Which side wins when call-site options collide with registry globals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeOrder {
    /// Registry entries are copied onto the call-site options, so the
    /// registry value wins on collision. This is the historical behaviour.
    #[default]
    RegistryWins,
    /// Call-site options are copied onto the registry snapshot.
    CallSiteWins,
}

/// Everything derived from configuration at construction time.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Base option set; seeds the global registry.
    pub options: RendererOptions,
    /// Directory view names are resolved against.
    pub views_path: PathBuf,
    /// View file extension, without the leading dot.
    pub extension: String,
    pub merge_order: MergeOrder,
    pub warnings: Vec<ConfigWarning>,
}

/// Reads `app.pug.*` keys into a [`ResolvedConfig`].
pub struct ConfigResolver;

impl ConfigResolver {
    /// Resolve options for an application rooted at `application_base`.
    ///
    /// Every warning is logged once and returned in
    /// [`ResolvedConfig::warnings`].
    #[instrument(skip_all, fields(base = %application_base.display()))]
    pub fn resolve(config: &dyn ConfigSource, application_base: &Path) -> ResolvedConfig {
        let mut warnings = Vec::new();

        let basedir = match config.get(config_keys::BASEDIR).filter(is_truthy) {
            Some(Value::String(dir)) => dir,
            Some(other) => other.to_string(),
            None => {
                warnings.push(ConfigWarning::MissingBasedir { default: VIEWS_DIR });
                VIEWS_DIR.to_owned()
            }
        };
        // The configured directory always lives under the application base.
        let views_path = application_base.join(basedir.trim_start_matches('/'));

        let mut options = RendererOptions::new()
            .with(keys::BASEDIR, views_path.to_string_lossy().into_owned())
            .with(keys::PRETTY, or_default(config, config_keys::PRETTY, Value::Bool(false)))
            .with(keys::CACHE, or_default(config, config_keys::CACHE, Value::Bool(false)))
            .with(keys::DOCTYPE, or_default(config, config_keys::DOCTYPE, Value::Null))
            .with(keys::SELF, or_default(config, config_keys::SELF, Value::Bool(false)))
            .with(keys::DEBUG, or_default(config, config_keys::DEBUG, Value::Bool(false)));

        let filters = match config.get_filters(config_keys::FILTERS) {
            Some(table) => OptionValue::Filters(table),
            None => OptionValue::Data(Value::Null),
        };
        options.insert(keys::FILTERS, filters);

        match config.get_or(config_keys::GLOBALS, Value::Object(Default::default())) {
            Value::Object(globals) => {
                for (name, value) in globals {
                    options.insert(name, value);
                }
            }
            Value::Null => {}
            _ => warnings.push(ConfigWarning::GlobalsNotAMap),
        }

        let extension = match config.get(config_keys::EXTENSION).filter(is_truthy) {
            Some(Value::String(given)) => normalise_extension(&given).unwrap_or_else(|_| {
                warnings.push(ConfigWarning::InvalidExtension { given });
                DEFAULT_EXTENSION.to_owned()
            }),
            Some(other) => {
                warnings.push(ConfigWarning::InvalidExtension {
                    given: other.to_string(),
                });
                DEFAULT_EXTENSION.to_owned()
            }
            None => DEFAULT_EXTENSION.to_owned(),
        };

        let merge_order = if config
            .get(config_keys::CALL_SITE_WINS)
            .is_some_and(|v| is_truthy(&v))
        {
            MergeOrder::CallSiteWins
        } else {
            MergeOrder::RegistryWins
        };

        for warning in &warnings {
            warn!("{warning}");
        }
        debug!(
            views_path = %views_path.display(),
            extension = %extension,
            ?merge_order,
            options = options.len(),
            "Renderer options resolved"
        );

        ResolvedConfig {
            options,
            views_path,
            extension,
            merge_order,
            warnings,
        }
    }
}

/// The configured value when truthy, `default` otherwise.
fn or_default(config: &dyn ConfigSource, key: &str, default: Value) -> Value {
    config.get(key).filter(is_truthy).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::StaticConfig;
    use crate::domain::FilterTable;
    use serde_json::json;
    use std::sync::Arc;

    fn resolve(tree: Value) -> ResolvedConfig {
        ConfigResolver::resolve(&StaticConfig::new(tree), Path::new("/srv/app"))
    }

    #[test]
    fn missing_basedir_defaults_and_warns_once() {
        let resolved = resolve(json!({}));
        assert_eq!(resolved.views_path, Path::new("/srv/app/resources/views"));
        assert_eq!(resolved.options.basedir(), Some("/srv/app/resources/views"));
        assert_eq!(
            resolved.warnings,
            vec![ConfigWarning::MissingBasedir {
                default: "resources/views"
            }]
        );
    }

    #[test]
    fn empty_basedir_counts_as_missing() {
        let resolved = resolve(json!({"app": {"pug": {"basedir": ""}}}));
        assert_eq!(resolved.views_path, Path::new("/srv/app/resources/views"));
        assert_eq!(resolved.warnings.len(), 1);
    }

    #[test]
    fn configured_basedir_is_prefixed_with_base_path() {
        let resolved = resolve(json!({"app": {"pug": {"basedir": "views"}}}));
        assert_eq!(resolved.views_path, Path::new("/srv/app/views"));
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn fixed_options_take_documented_defaults() {
        let opts = resolve(json!({})).options;
        assert_eq!(opts.data("pretty"), Some(&json!(false)));
        assert_eq!(opts.data("cache"), Some(&json!(false)));
        assert_eq!(opts.data("doctype"), Some(&Value::Null));
        assert_eq!(opts.data("filters"), Some(&Value::Null));
        assert_eq!(opts.data("self"), Some(&json!(false)));
        assert_eq!(opts.data("debug"), Some(&json!(false)));
    }

    #[test]
    fn configured_options_are_copied() {
        let opts = resolve(json!({"app": {"pug": {
            "pretty": true, "cache": true, "doctype": "html", "self": true, "debug": true
        }}}))
        .options;
        assert!(opts.pretty());
        assert!(opts.cache());
        assert!(opts.self_mode());
        assert!(opts.debug());
        assert_eq!(opts.doctype(), Some("html"));
    }

    #[test]
    fn globals_can_override_fixed_options() {
        let opts = resolve(json!({"app": {"pug": {
            "pretty": false,
            "globals": {"pretty": true, "siteName": "Acme"}
        }}}))
        .options;
        assert!(opts.pretty());
        assert_eq!(opts.data("siteName"), Some(&json!("Acme")));
    }

    #[test]
    fn non_map_globals_are_ignored_with_warning() {
        let resolved = resolve(json!({"app": {"pug": {"basedir": "v", "globals": [1, 2]}}}));
        assert_eq!(resolved.warnings, vec![ConfigWarning::GlobalsNotAMap]);
    }

    #[test]
    fn filters_come_from_the_source() {
        let mut table = FilterTable::new();
        table.insert("shout".into(), Arc::new(|s: &str| s.to_uppercase()) as _);
        let config = StaticConfig::new(json!({})).with_filters(table);
        let opts = ConfigResolver::resolve(&config, Path::new("/srv/app")).options;
        let filters = opts.filters().expect("filters registered");
        assert_eq!(filters["shout"]("hi"), "HI");
    }

    #[test]
    fn merge_order_defaults_to_registry_wins() {
        assert_eq!(resolve(json!({})).merge_order, MergeOrder::RegistryWins);
        assert_eq!(
            resolve(json!({"app": {"pug": {"call_site_wins": true}}})).merge_order,
            MergeOrder::CallSiteWins
        );
    }

    #[test]
    fn extension_is_configurable() {
        assert_eq!(resolve(json!({})).extension, "pug");
        assert_eq!(
            resolve(json!({"app": {"pug": {"extension": ".html"}}})).extension,
            "html"
        );
        let bad = resolve(json!({"app": {"pug": {"basedir": "v", "extension": "a/b"}}}));
        assert_eq!(bad.extension, "pug");
        assert_eq!(
            bad.warnings,
            vec![ConfigWarning::InvalidExtension {
                given: "a/b".into()
            }]
        );
    }
}
