//! Implementation of `pugview render`.
//!
//! Renders like a single request would: globals from configuration, the
//! request hook with no request capabilities (so only `config` is added),
//! then the view with `--data` as call-site options.

use serde_json::Value;
use tracing::{debug, instrument};

use pugview_adapters::MiniJinjaEngine;
use pugview_core::{
    application::{MergeOrder, ViewRenderer},
    domain::{RendererOptions, RequestCapabilities},
};

use crate::{
    cli::RenderArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(view = %args.view, inline = args.inline))]
pub fn execute(args: RenderArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let data = args.data.as_deref().map(parse_data).transpose()?;

    let mut renderer = ViewRenderer::new(
        config.source(),
        &config.root,
        Box::new(MiniJinjaEngine::new()),
    );
    if args.call_site_wins {
        renderer = renderer.with_merge_order(MergeOrder::CallSiteWins);
    }
    debug!(
        views = %renderer.views_path().display(),
        merge_order = ?renderer.merge_order(),
        "Renderer ready"
    );

    renderer.handle(&RequestCapabilities::new());

    let markup = if args.inline {
        renderer.render_string(&args.view, data)?
    } else {
        renderer.render(&args.view, data)?
    };

    output.emit(&markup)?;
    Ok(())
}

/// Parse `--data` into call-site options; it must be a JSON object.
fn parse_data(raw: &str) -> CliResult<RendererOptions> {
    match serde_json::from_str::<Value>(raw).with_cli_context(|| "--data is not valid JSON")? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(CliError::InvalidInput {
            message: format!("--data must be a JSON object, got {other}"),
            source: None,
        }),
    }
}
