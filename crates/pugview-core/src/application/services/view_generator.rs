//! View Generator - the `make:pug` use case.
//!
//! 1. Check that we run from a project root
//! 2. Turn the requested name into a path under the views directory
//! 3. Write the skeleton, removing a partial file on failure

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{DEFAULT_EXTENSION, ViewBlueprint, ViewName},
    error::PugResult,
};

/// File whose presence marks a project root.
pub const PROJECT_SENTINEL: &str = "ace";

const COMMAND: &str = "make:pug";

/// Generates empty view files.
pub struct ViewGenerator {
    filesystem: Box<dyn Filesystem>,
    sentinel: String,
    extension: String,
}

impl ViewGenerator {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            filesystem,
            sentinel: PROJECT_SENTINEL.to_owned(),
            extension: DEFAULT_EXTENSION.to_owned(),
        }
    }

    /// Use a different project-root marker file.
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    /// Write views with a different extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Create the view `name` under `project_root`, optionally extending
    /// `layout`. Returns the created path relative to `project_root`.
    ///
    /// An existing file is only replaced when `force` is set.
    #[instrument(skip(self, project_root), fields(root = %project_root.display()))]
    pub fn generate(
        &self,
        project_root: &Path,
        name: &str,
        layout: Option<&str>,
        force: bool,
    ) -> PugResult<PathBuf> {
        if !self.filesystem.exists(&project_root.join(&self.sentinel)) {
            return Err(ApplicationError::NotInProjectRoot {
                command: COMMAND,
                sentinel: self.sentinel.clone(),
            }
            .into());
        }

        let view = ViewName::parse(name)?;
        let relative = view.relative_path(&self.extension);
        let path = project_root.join(&relative);

        let existed = self.filesystem.exists(&path);
        if existed && !force {
            return Err(ApplicationError::ViewExists { path: relative }.into());
        }

        let content = ViewBlueprint::new(layout, self.extension.as_str()).render();
        if let Err(e) = self.write(&path, &content) {
            if !existed {
                self.rollback(&path);
            }
            return Err(e);
        }

        info!(path = %relative.display(), "View created");
        Ok(relative)
    }

    fn write(&self, path: &Path, content: &str) -> PugResult<()> {
        if let Some(parent) = path.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(path, content)
    }

    /// Best-effort removal of a partially written file. A failed removal
    /// is logged; the caller still returns the write error.
    fn rollback(&self, path: &Path) {
        if !self.filesystem.exists(path) {
            return;
        }
        if let Err(e) = self.filesystem.remove_file(path) {
            warn!(error = %e, path = %path.display(), "Rollback failed");
        } else {
            info!(path = %path.display(), "Rollback successful");
        }
    }
}
