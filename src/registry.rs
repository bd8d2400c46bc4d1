//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for all available formats.
//! Formats can be registered and retrieved by name or by file extension, and any two
//! registered formats can be chained with [`FormatRegistry::convert`].

use crate::config::DocmorphConfig;
use crate::error::FormatError;
use crate::format::Format;
use crate::formats::docx::DocxFormat;
use crate::formats::latex::LatexFormat;
use crate::formats::markdown::MarkdownFormat;
use crate::ir::IrDocument;
use std::collections::HashMap;

/// Registry of document formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::with_defaults();
/// let latex = registry.convert(b"# Title", "markdown", "latex").await?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Find the format claiming a file extension (case-insensitive, leading dot optional)
    pub fn for_extension(&self, extension: &str) -> Option<&dyn Format> {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        let mut names = self.list_formats();
        names.retain(|name| {
            self.formats[name]
                .file_extensions()
                .iter()
                .any(|candidate| *candidate == extension)
        });
        names
            .first()
            .and_then(|name| self.formats.get(name))
            .map(|f| f.as_ref())
    }

    /// Parse input using the specified format
    pub async fn parse(&self, input: &[u8], format: &str) -> Result<IrDocument, FormatError> {
        self.get(format)?.parse(input).await
    }

    /// Serialize a document using the specified format
    pub async fn serialize(&self, doc: &IrDocument, format: &str) -> Result<Vec<u8>, FormatError> {
        self.get(format)?.serialize(doc).await
    }

    /// Parse with `from`, then serialize the normalized tree with `to`
    pub async fn convert(&self, input: &[u8], from: &str, to: &str) -> Result<Vec<u8>, FormatError> {
        let source = self.get(from)?;
        let target = self.get(to)?;
        let doc = source.parse(input).await?;
        tracing::debug!(from, to, blocks = doc.blocks.len(), "converting document");
        target.serialize(&doc).await
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(MarkdownFormat::default());
        registry.register(LatexFormat::default());
        registry.register(DocxFormat::default());

        registry
    }

    /// Create a registry whose formats use the options of a loaded configuration
    pub fn with_config(config: &DocmorphConfig) -> Self {
        let mut registry = Self::new();

        registry.register(MarkdownFormat::new(config.markdown.clone()));
        registry.register(LatexFormat::new(config.latex.clone()));
        registry.register(DocxFormat::new(config.docx.clone()));

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
