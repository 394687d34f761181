//! # Syntax Validation
//!
//! Parses every discovered config file with the parser matching its
//! extension. The run is fail-fast: the first file that does not parse
//! aborts validation with [`CheckError::Parse`].

use std::path::{Path, PathBuf};

use serde::Serialize;

use confcheck_core::{load_document, CheckError, DocumentFormat, ParserRegistry};

use crate::discover::{discover, DEFAULT_EXTENSIONS};

/// A file that parsed successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckedFile {
    /// Path of the file.
    pub path: PathBuf,
    /// Format it was parsed as.
    pub format: DocumentFormat,
}

/// Outcome of a successful syntax validation run.
#[derive(Debug, Clone, Serialize)]
pub struct SyntaxReport {
    /// Directory that was scanned.
    pub dir: PathBuf,
    /// Files checked, in the order they were parsed.
    pub files: Vec<CheckedFile>,
}

impl SyntaxReport {
    /// Number of files checked.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if the directory held no matching files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of files checked in `format`.
    pub fn count(&self, format: DocumentFormat) -> usize {
        self.files.iter().filter(|f| f.format == format).count()
    }
}

/// Validates that config files parse.
#[derive(Debug)]
pub struct SyntaxValidator<'r> {
    registry: &'r ParserRegistry,
    extensions: Vec<String>,
}

impl<'r> SyntaxValidator<'r> {
    /// Build a validator for the default `json` and `yml` extensions.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Configuration`] if `registry` lacks a parser for
    /// any of the default formats (in practice: YAML support compiled out).
    pub fn new(registry: &'r ParserRegistry) -> Result<Self, CheckError> {
        Self::with_extensions(registry, DEFAULT_EXTENSIONS)
    }

    /// Build a validator for an explicit extension set.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Configuration`] if an extension maps to no known
    /// format, or if `registry` has no parser for one of the formats.
    pub fn with_extensions<S: AsRef<str>>(
        registry: &'r ParserRegistry,
        extensions: &[S],
    ) -> Result<Self, CheckError> {
        if extensions.is_empty() {
            return Err(CheckError::Configuration(
                "no config file extensions to check".to_string(),
            ));
        }

        let mut resolved = Vec::with_capacity(extensions.len());
        for ext in extensions {
            let ext = ext.as_ref().trim_start_matches('.');
            let format = DocumentFormat::from_extension(ext).ok_or_else(|| {
                CheckError::Configuration(format!("unsupported config file extension '{ext}'"))
            })?;
            registry.require(format)?;
            resolved.push(ext.to_string());
        }

        Ok(Self {
            registry,
            extensions: resolved,
        })
    }

    /// Extensions this validator checks.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Parse every matching file directly inside `dir`.
    ///
    /// # Errors
    ///
    /// - [`CheckError::Io`] if the directory or a file cannot be read.
    /// - [`CheckError::Parse`] for the first file that does not parse.
    pub fn validate_dir(&self, dir: &Path) -> Result<SyntaxReport, CheckError> {
        let paths = discover(dir, self.extensions.as_slice())?;
        tracing::info!(
            dir = %dir.display(),
            count = paths.len(),
            "validating config file syntax"
        );

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let document = load_document(self.registry, &path).map_err(|e| {
                tracing::debug!(path = %path.display(), kind = e.kind(), "config file rejected");
                e
            })?;
            files.push(CheckedFile {
                format: document.format(),
                path,
            });
        }

        Ok(SyntaxReport {
            dir: dir.to_path_buf(),
            files,
        })
    }
}

#[cfg(all(test, feature = "yaml"))]
mod tests {
    use super::*;
    use confcheck_core::JsonParser;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn valid_json_files_pass() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.json", r#"{"panels": [{"id": 1}]}"#);
        write(dir.path(), "b.json", "[]");

        let registry = ParserRegistry::with_defaults();
        let report = SyntaxValidator::new(&registry)
            .unwrap()
            .validate_dir(dir.path())
            .unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report.count(DocumentFormat::Json), 2);
    }

    #[test]
    fn valid_yaml_files_pass() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "prometheus.yml",
            "global:\n  scrape_interval: 15s\nscrape_configs:\n  - job_name: kong\n",
        );
        write(dir.path(), "empty.yml", "");

        let registry = ParserRegistry::with_defaults();
        let report = SyntaxValidator::new(&registry)
            .unwrap()
            .validate_dir(dir.path())
            .unwrap();
        assert_eq!(report.count(DocumentFormat::Yaml), 2);
    }

    #[test]
    fn empty_directory_passes() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ParserRegistry::with_defaults();
        let report = SyntaxValidator::new(&registry)
            .unwrap()
            .validate_dir(dir.path())
            .unwrap();
        assert!(report.is_empty());
        assert_eq!(report.dir, dir.path());
    }

    #[test]
    fn trailing_comma_json_fails_with_path() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "good.json", "{}");
        let bad = write(dir.path(), "otel.json", "{\n  \"exporters\": [\"otlp\"],\n}\n");

        let registry = ParserRegistry::with_defaults();
        let err = SyntaxValidator::new(&registry)
            .unwrap()
            .validate_dir(dir.path())
            .unwrap_err();
        match err {
            CheckError::Parse { path, format, .. } => {
                assert_eq!(path, bad.display().to_string());
                assert_eq!(format, DocumentFormat::Json);
            }
            other => panic!("expected Parse, got: {other}"),
        }
    }

    #[test]
    fn broken_yaml_fails_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write(dir.path(), "alerts.yml", "groups: [\n  - name: x\n");

        let registry = ParserRegistry::with_defaults();
        let err = SyntaxValidator::new(&registry)
            .unwrap()
            .validate_dir(dir.path())
            .unwrap_err();
        match err {
            CheckError::Parse { path, format, .. } => {
                assert_eq!(path, bad.display().to_string());
                assert_eq!(format, DocumentFormat::Yaml);
            }
            other => panic!("expected Parse, got: {other}"),
        }
    }

    #[test]
    fn first_failure_in_sorted_order_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let first = write(dir.path(), "a-broken.json", "{");
        write(dir.path(), "z-broken.json", "{");

        let registry = ParserRegistry::with_defaults();
        let err = SyntaxValidator::new(&registry)
            .unwrap()
            .validate_dir(dir.path())
            .unwrap_err();
        assert!(err.to_string().contains(&first.display().to_string()), "got: {err}");
    }

    #[test]
    fn missing_yaml_parser_is_configuration_error() {
        let registry = ParserRegistry::empty().with_parser(JsonParser);
        let err = SyntaxValidator::new(&registry).unwrap_err();
        assert!(matches!(err, CheckError::Configuration(_)), "got: {err}");
    }

    #[test]
    fn json_only_extensions_work_without_yaml_parser() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.json", "{}");
        write(dir.path(), "ignored.yml", ": : :");

        let registry = ParserRegistry::empty().with_parser(JsonParser);
        let report = SyntaxValidator::with_extensions(&registry, &["json"])
            .unwrap()
            .validate_dir(dir.path())
            .unwrap();
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn unknown_extension_is_configuration_error() {
        let registry = ParserRegistry::with_defaults();
        let err = SyntaxValidator::with_extensions(&registry, &["toml"]).unwrap_err();
        assert!(err.to_string().contains("toml"), "got: {err}");
    }

    #[test]
    fn leading_dot_in_extension_is_accepted() {
        let registry = ParserRegistry::with_defaults();
        let validator = SyntaxValidator::with_extensions(&registry, &[".json", ".yml"]).unwrap();
        assert_eq!(validator.extensions(), ["json", "yml"]);
    }

    #[test]
    fn empty_extension_set_is_rejected() {
        let registry = ParserRegistry::with_defaults();
        let none: [&str; 0] = [];
        let err = SyntaxValidator::with_extensions(&registry, &none).unwrap_err();
        assert!(matches!(err, CheckError::Configuration(_)));
    }
}
