//! Configuration loader for docmorph.
//!
//! `defaults/docmorph.default.toml` is embedded into the binary so that docs and runtime
//! behavior stay in sync. Applications layer user-specific files on top of those defaults
//! via [`Loader`] before deserializing into [`DocmorphConfig`].

use crate::formats::docx::DocxOptions;
use crate::formats::latex::LatexOptions;
use crate::formats::markdown::MarkdownOptions;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/docmorph.default.toml");

/// Top-level configuration consumed by the CLI and [`crate::FormatRegistry::with_config`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocmorphConfig {
    pub logging: LoggingConfig,
    pub markdown: MarkdownOptions,
    pub latex: LatexOptions,
    pub docx: DocxOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, used when `RUST_LOG` is unset
    pub filter: String,
}

/// Layers TOML files over the embedded defaults, later files winning key by key.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a file given on the command line. A missing file fails at [`Loader::build`].
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Layer a file that may not exist, such as `docmorph.toml` in the working directory.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        tracing::debug!(path = %path.display(), required, "layering config file");
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    pub fn build(self) -> Result<DocmorphConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<DocmorphConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.logging.filter, "docmorph=warn");
        assert_eq!(config.markdown.wrap_width, 0);
        assert!(!config.latex.standalone);
        assert_eq!(config.docx.code_font, "Courier New");
    }

    #[test]
    fn embedded_defaults_match_option_defaults() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.markdown, MarkdownOptions::default());
        assert_eq!(config.latex, LatexOptions::default());
        assert_eq!(config.docx, DocxOptions::default());
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = Loader::new()
            .with_file("/definitely/not/here/docmorph.toml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn later_files_win() {
        let mut first = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(first, "[latex]\nstandalone = true\n[docx]\nlink_color = \"FF0000\"")
            .expect("write config");
        let mut second = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(second, "[docx]\nlink_color = \"00FF00\"").expect("write config");

        let config = Loader::new()
            .with_file(first.path())
            .with_optional_file(second.path())
            .build()
            .expect("config to build");
        assert!(config.latex.standalone);
        assert_eq!(config.docx.link_color, "00FF00");
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[markdown]\nwrap_width = 72").expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert_eq!(config.markdown.wrap_width, 72);
        assert_eq!(config.docx.code_font, "Courier New");
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/definitely/not/here/docmorph.toml")
            .build()
            .expect("config to build");
        assert_eq!(config, load_defaults().unwrap());
    }
}
