//! Implementation of `pugview make:pug`.

use tracing::{debug, instrument};

use pugview_adapters::LocalFilesystem;
use pugview_core::application::ViewGenerator;

use crate::{cli::MakePugArgs, config::AppConfig, error::CliResult, output::OutputManager};

/// Create the view file and print its path relative to the project root.
#[instrument(skip_all, fields(name = %args.name))]
pub fn execute(args: MakePugArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let extension = config.view_extension();
    debug!(root = %config.root.display(), %extension, force = args.force, "Generating view");

    let generator =
        ViewGenerator::new(Box::new(LocalFilesystem::new())).with_extension(extension);
    let created = generator.generate(
        &config.root,
        &args.name,
        args.layout.as_deref(),
        args.force,
    )?;

    output.created(&created.display().to_string())?;
    Ok(())
}
