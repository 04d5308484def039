//! View names and the skeleton written for freshly generated views.

use std::path::PathBuf;

use super::error::DomainError;

/// Conventional views directory, relative to the project root.
pub const VIEWS_DIR: &str = "resources/views";

/// Default extension of view files.
pub const DEFAULT_EXTENSION: &str = "pug";

/// Normalise a configured view extension: a leading `.` is dropped and
/// path separators are rejected.
pub fn normalise_extension(extension: &str) -> Result<String, DomainError> {
    let trimmed = extension.trim().trim_start_matches('.');
    if trimmed.is_empty() || trimmed.contains(['/', '\\']) {
        return Err(DomainError::InvalidExtension {
            extension: extension.into(),
        });
    }
    Ok(trimmed.to_owned())
}

/// A view name as typed by a user (`UserView.profile`), normalised into
/// path segments (`user`, `profile`).
///
/// Normalisation lowercases the name, removes every occurrence of `view`
/// and treats `.` and `/` as directory separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewName {
    raw: String,
    segments: Vec<String>,
}

impl ViewName {
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        let normalised = name.to_lowercase().replace("view", "").replace('.', "/");

        if normalised.is_empty() {
            return Err(DomainError::InvalidViewName {
                name: name.into(),
                reason: "nothing is left once 'view' is removed".into(),
            });
        }

        let segments: Vec<String> = normalised.split('/').map(str::to_owned).collect();
        if segments.iter().any(|s| s.trim().is_empty()) {
            return Err(DomainError::InvalidViewName {
                name: name.into(),
                reason: "contains an empty path segment".into(),
            });
        }
        if segments.iter().any(|s| s.contains('\\')) {
            return Err(DomainError::InvalidViewName {
                name: name.into(),
                reason: "backslashes are not allowed".into(),
            });
        }

        Ok(Self {
            raw: name.into(),
            segments,
        })
    }

    /// The name as originally given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Path of the view file relative to the project root, e.g.
    /// `resources/views/user/profile.pug`.
    pub fn relative_path(&self, extension: &str) -> PathBuf {
        let mut path = PathBuf::from(VIEWS_DIR);
        for segment in &self.segments {
            path.push(segment);
        }
        path.set_extension(extension);
        path
    }
}

/// Skeleton of a generated view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewBlueprint {
    layout: Option<String>,
    extension: String,
}

impl ViewBlueprint {
    /// An empty-string layout counts as no layout. The first `.pug` in the
    /// layout name is dropped so both `layouts/main` and `layouts/main.pug`
    /// are accepted.
    pub fn new(layout: Option<&str>, extension: impl Into<String>) -> Self {
        let layout = layout
            .filter(|l| !l.is_empty())
            .map(|l| l.replacen(".pug", "", 1));
        Self {
            layout,
            extension: extension.into(),
        }
    }

    pub fn layout(&self) -> Option<&str> {
        self.layout.as_deref()
    }

    /// Render the file content.
    pub fn render(&self) -> String {
        match &self.layout {
            Some(layout) => format!(
                "{{% extends \"{layout}.{ext}\" %}}\n\n{{% block content %}}\n{{% endblock %}}\n",
                ext = self.extension,
            ),
            None => "{% block content %}\n{% endblock %}\n".to_string(),
        }
    }
}
