//! MiniJinja-backed [`TemplateEngine`].
//!
//! Option mapping:
//!
//! | Option    | Effect                                                |
//! |-----------|-------------------------------------------------------|
//! | `basedir` | loader root; `extends`/`include` resolve against it   |
//! | `cache`   | reuse environments, see below                         |
//! | `pretty`  | `false` trims whitespace around block tags            |
//! | `debug`   | engine debug mode                                     |
//! | `filters` | registered as string filters                          |
//! | `self`    | locals exposed under `self` instead of the top level  |
//! | `doctype` | no engine effect; passed through as a template local  |
//!
//! Every other entry becomes a template local. Accessors are callable as
//! `name(key, default)`.
//!
//! Cached environments are keyed by every option that shapes the
//! environment (`basedir`, `pretty`, `debug` and the filter table), so a
//! changed option builds a new one.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use minijinja::{Environment, ErrorKind, Value, path_loader};
use pugview_core::{
    application::{ApplicationError, EngineErrorKind, ports::TemplateEngine},
    domain::{Accessor, OptionValue, RendererOptions, keys},
    error::{PugError, PugResult},
};
use tracing::{debug, instrument, trace};

type EnvironmentCache = HashMap<EnvironmentKey, Arc<Environment<'static>>>;

/// Template engine built on MiniJinja.
#[derive(Default)]
pub struct MiniJinjaEngine {
    environments: Mutex<EnvironmentCache>,
}

/// Everything [`build_environment`] reads from the options.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EnvironmentKey {
    basedir: PathBuf,
    pretty: bool,
    debug: bool,
    /// Filter names with the address of their closure. A cached
    /// environment holds its filters, so an address is never reused while
    /// its entry exists.
    filters: Vec<(String, usize)>,
}

impl EnvironmentKey {
    fn new(options: &RendererOptions) -> Self {
        let filters = options
            .filters()
            .map(|table| {
                table
                    .iter()
                    .map(|(name, filter)| {
                        (name.clone(), Arc::as_ptr(filter) as *const () as usize)
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            basedir: options.basedir().map(PathBuf::from).unwrap_or_default(),
            pretty: options.pretty(),
            debug: options.debug(),
            filters,
        }
    }
}

impl MiniJinjaEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached environments.
    pub fn cached_environments(&self) -> usize {
        self.cache().len()
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, EnvironmentCache> {
        self.environments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// The environment for `options`: cached per [`EnvironmentKey`] when
    /// `cache` is set, fresh otherwise.
    fn environment(&self, options: &RendererOptions) -> Arc<Environment<'static>> {
        if !options.cache() {
            return Arc::new(build_environment(options));
        }
        let key = EnvironmentKey::new(options);
        Arc::clone(
            self.cache()
                .entry(key)
                .or_insert_with(|| Arc::new(build_environment(options))),
        )
    }
}

impl TemplateEngine for MiniJinjaEngine {
    #[instrument(skip(self, options), fields(path = %path.display()))]
    fn render_file(&self, path: &Path, options: &RendererOptions) -> PugResult<String> {
        let env = self.environment(options);
        let ctx = locals(options);

        let rendered = match template_name(path, options.basedir()) {
            Some(name) => {
                trace!(template = %name, "Loading through the views loader");
                env.get_template(&name).and_then(|t| t.render(&ctx))
            }
            None => {
                let source = std::fs::read_to_string(path).map_err(|e| read_error(path, e))?;
                env.render_named_str(&path.display().to_string(), &source, &ctx)
            }
        };
        rendered.map_err(engine_error)
    }

    #[instrument(skip_all)]
    fn render_source(&self, source: &str, options: &RendererOptions) -> PugResult<String> {
        let env = self.environment(options);
        env.render_str(source, &locals(options))
            .map_err(engine_error)
    }
}

fn build_environment(options: &RendererOptions) -> Environment<'static> {
    let mut env = Environment::new();

    if let Some(basedir) = options.basedir() {
        env.set_loader(path_loader(basedir));
    }

    let pretty = options.pretty();
    env.set_trim_blocks(!pretty);
    env.set_lstrip_blocks(!pretty);
    env.set_debug(options.debug());

    if let Some(filters) = options.filters() {
        for (name, filter) in filters {
            let filter = Arc::clone(filter);
            env.add_filter(name.clone(), move |value: String| -> String { filter(&value) });
        }
    }

    debug!(
        basedir = options.basedir().unwrap_or("-"),
        pretty,
        debug = options.debug(),
        "Template environment built"
    );
    env
}

/// Template locals for `options`.
fn locals(options: &RendererOptions) -> BTreeMap<String, Value> {
    let mut locals = BTreeMap::new();
    for (name, value) in options {
        let value = match value {
            OptionValue::Data(data) => Value::from_serialize(data),
            OptionValue::Accessor(accessor) => accessor_function(Arc::clone(accessor)),
            OptionValue::Filters(_) => continue,
        };
        locals.insert(name.to_owned(), value);
    }

    if options.self_mode() {
        return BTreeMap::from([(keys::SELF.to_owned(), Value::from_serialize(&locals))]);
    }
    locals
}

/// Wrap an accessor as a template function `name(key, default)`.
fn accessor_function(accessor: Accessor) -> Value {
    Value::from_function(move |key: String, default: Option<Value>| -> Value {
        let default = default.and_then(|d| serde_json::to_value(&d).ok());
        Value::from_serialize(&accessor(&key, default))
    })
}

/// Loader name of `path` when it lies under `basedir`.
fn template_name(path: &Path, basedir: Option<&str>) -> Option<String> {
    let relative = path.strip_prefix(basedir?).ok()?;
    let segments: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    (!segments.is_empty()).then(|| segments.join("/"))
}

fn engine_error(e: minijinja::Error) -> PugError {
    let kind = match e.kind() {
        ErrorKind::TemplateNotFound => EngineErrorKind::NotFound,
        ErrorKind::SyntaxError => EngineErrorKind::Syntax,
        _ => EngineErrorKind::Render,
    };
    ApplicationError::engine(kind, e.to_string()).into()
}

fn read_error(path: &Path, e: io::Error) -> PugError {
    let kind = if e.kind() == io::ErrorKind::NotFound {
        EngineErrorKind::NotFound
    } else {
        EngineErrorKind::Render
    };
    ApplicationError::engine(kind, format!("{}: {}", path.display(), e)).into()
}
