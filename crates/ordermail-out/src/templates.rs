//! Template loading.
//!
//! The email template is a single Handlebars HTML file read from disk. It is
//! read again for every render so edits show up without a restart.

use std::path::{Path, PathBuf};

use crate::RenderError;

/// A template file's contents together with where it came from
#[derive(Debug, Clone)]
pub struct TemplateSource {
    pub path: PathBuf,
    pub source: String,
}

impl TemplateSource {
    /// Read a template file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| RenderError::Template(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), bytes = source.len(), "template loaded");
        Ok(Self::new(path, source))
    }

    pub fn new(path: impl Into<PathBuf>, source: String) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}
