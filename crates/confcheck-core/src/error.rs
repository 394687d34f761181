//! # Error Types: Structured Check Failures
//!
//! Every check in confcheck fails with a [`CheckError`]. All variants are
//! fatal to the run: the first failure aborts the remaining checks and is
//! surfaced to the invoking process as a non-zero exit.
//!
//! ## Design
//!
//! - Parse errors carry the offending file path, the format it was parsed
//!   as, and the underlying parser message.
//! - Invariant violations carry the entry, the field, and the expected vs
//!   actual values.
//! - A missing parser capability is a [`CheckError::Configuration`], distinct
//!   from a malformed file.

use std::path::Path;

use thiserror::Error;

use crate::document::DocumentFormat;

/// Top-level error type for config checks.
#[derive(Error, Debug)]
pub enum CheckError {
    /// A file did not parse under its declared format.
    #[error("failed to parse {path} as {format}: {reason}")]
    Parse {
        /// Path of the file that failed to parse.
        path: String,
        /// Format the file was parsed as.
        format: DocumentFormat,
        /// Underlying parser message.
        reason: String,
    },

    /// A required capability (usually a parser) is not available.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A named entry was not found in a collection.
    #[error("no entry named '{key}' in '{collection}' of {path}")]
    MissingEntry {
        /// Collection that was searched (e.g. `upstreams`).
        collection: String,
        /// Name that was looked up.
        key: String,
        /// Document the collection belongs to.
        path: String,
    },

    /// An entry exists but a field does not hold the expected value.
    #[error("invariant violated for '{entry}': expected {field} = '{expected}', found '{actual}'")]
    InvariantViolation {
        /// Entry the field belongs to.
        entry: String,
        /// Field that was checked.
        field: String,
        /// Expected value.
        expected: String,
        /// Actual value found in the document.
        actual: String,
    },

    /// A file or directory could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that could not be read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl CheckError {
    /// Build a [`CheckError::Parse`] for `path`.
    pub fn parse(path: &Path, format: DocumentFormat, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.display().to_string(),
            format,
            reason: reason.into(),
        }
    }

    /// Build a [`CheckError::Io`] for `path`.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Short, stable name of the error kind, used in log fields and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "parse_error",
            Self::Configuration(_) => "configuration_error",
            Self::MissingEntry { .. } => "missing_entry",
            Self::InvariantViolation { .. } => "invariant_violation",
            Self::Io { .. } => "io_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_path_and_format() {
        let err = CheckError::parse(
            Path::new("observability/bad.json"),
            DocumentFormat::Json,
            "trailing comma at line 3 column 1",
        );
        let msg = err.to_string();
        assert!(msg.contains("observability/bad.json"));
        assert!(msg.contains("JSON"));
        assert!(msg.contains("trailing comma"));
        assert_eq!(err.kind(), "parse_error");
    }

    #[test]
    fn invariant_violation_names_expected_and_actual() {
        let err = CheckError::InvariantViolation {
            entry: "backend-upstream".to_string(),
            field: "hash_on".to_string(),
            expected: "cookie".to_string(),
            actual: "ip".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("backend-upstream"));
        assert!(msg.contains("'cookie'"));
        assert!(msg.contains("'ip'"));
    }

    #[test]
    fn missing_entry_names_collection_and_key() {
        let err = CheckError::MissingEntry {
            collection: "upstreams".to_string(),
            key: "backend-upstream".to_string(),
            path: "kong.yml".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no entry named 'backend-upstream' in 'upstreams' of kong.yml"
        );
        assert_eq!(err.kind(), "missing_entry");
    }

    #[test]
    fn io_error_keeps_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CheckError::io(Path::new("/nope"), source);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("/nope"));
    }
}
