//! # Config Documents
//!
//! A [`ConfigDocument`] is the parsed, in-memory form of one config file.
//! It is created per check run and discarded afterwards.
//!
//! JSON and YAML share a single tree model (`serde_json::Value`). YAML-only
//! constructs are flattened on the way in: tags are dropped and scalar map
//! keys are stringified.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::error::CheckError;
use crate::parser::ParserRegistry;

/// Syntax a config file is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Standard JSON.
    Json,
    /// YAML 1.2 (single document).
    Yaml,
}

impl DocumentFormat {
    /// Map a file extension (without the dot) to a format.
    ///
    /// Matching is case-sensitive, like shell globbing on the platforms the
    /// configs live on.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "json" => Some(Self::Json),
            "yml" | "yaml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Format implied by a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Human-readable name, as used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed config file.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    path: PathBuf,
    format: DocumentFormat,
    root: Value,
}

impl ConfigDocument {
    /// Wrap an already-parsed tree.
    pub fn new(path: impl Into<PathBuf>, format: DocumentFormat, root: Value) -> Self {
        Self {
            path: path.into(),
            format,
            root,
        }
    }

    /// Path the document was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format the document was parsed as.
    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Root of the parsed tree.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Look up a node by JSON Pointer (e.g. `/upstreams/0/name`).
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.root.pointer(pointer)
    }
}

/// Read and parse a file, choosing the parser from its extension.
///
/// # Errors
///
/// - [`CheckError::Configuration`] if the extension maps to no known format
///   or the registry has no parser for it.
/// - [`CheckError::Io`] if the file cannot be read.
/// - [`CheckError::Parse`] if the contents are malformed.
pub fn load_document(registry: &ParserRegistry, path: &Path) -> Result<ConfigDocument, CheckError> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| {
        CheckError::Configuration(format!(
            "cannot determine config format of {} from its extension",
            path.display()
        ))
    })?;
    load_document_as(registry, path, format)
}

/// Read and parse a file as an explicit format, ignoring its extension.
///
/// The parser capability is resolved before the file is touched, so a
/// missing parser is reported even when the file does not exist.
pub fn load_document_as(
    registry: &ParserRegistry,
    path: &Path,
    format: DocumentFormat,
) -> Result<ConfigDocument, CheckError> {
    let parser = registry.require(format)?;

    let content = std::fs::read_to_string(path).map_err(|e| CheckError::io(path, e))?;
    let root = parser
        .parse(&content)
        .map_err(|reason| CheckError::parse(path, format, reason))?;

    tracing::debug!(path = %path.display(), %format, "parsed config document");

    Ok(ConfigDocument::new(path, format, root))
}
