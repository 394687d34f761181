//! # Session Affinity Check
//!
//! Asserts that a named upstream hashes on a cookie, and reports the cookie
//! name and the upstream's targets.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use confcheck_core::{load_document_as, CheckError, ConfigDocument, DocumentFormat, ParserRegistry};

use crate::upstream::{index_upstreams, DuplicatePolicy, GatewayConfig};
use crate::{DEFAULT_HASH_ON, DEFAULT_UPSTREAM};

/// What the check expects to find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffinityExpectation {
    /// Upstream that must exist.
    pub upstream: String,
    /// Required `hash_on` value.
    pub hash_on: String,
    /// Handling of repeated upstream names.
    pub duplicates: DuplicatePolicy,
}

impl Default for AffinityExpectation {
    fn default() -> Self {
        Self {
            upstream: DEFAULT_UPSTREAM.to_string(),
            hash_on: DEFAULT_HASH_ON.to_string(),
            duplicates: DuplicatePolicy::default(),
        }
    }
}

impl AffinityExpectation {
    /// Run the check against an already-parsed document.
    ///
    /// # Errors
    ///
    /// - [`CheckError::Parse`] if the `upstreams` section or the selected
    ///   entry is malformed. Other entries only need a string `name`.
    /// - [`CheckError::InvariantViolation`] for a rejected duplicate name or
    ///   a `hash_on` mismatch.
    /// - [`CheckError::MissingEntry`] if the upstream does not exist.
    pub fn check(&self, document: &ConfigDocument) -> Result<AffinityReport, CheckError> {
        let config = GatewayConfig::from_document(document)?;
        let index = index_upstreams(&config.upstreams, self.duplicates)?;

        let entry = index.get(self.upstream.as_str()).ok_or_else(|| CheckError::MissingEntry {
            collection: "upstreams".to_string(),
            key: self.upstream.clone(),
            path: document.path().display().to_string(),
        })?;
        let upstream = entry.decode(document)?;

        if upstream.hash_on() != self.hash_on {
            return Err(CheckError::InvariantViolation {
                entry: upstream.name.clone(),
                field: "hash_on".to_string(),
                expected: self.hash_on.clone(),
                actual: upstream.hash_on().to_string(),
            });
        }

        let report = AffinityReport {
            upstream: upstream.name.clone(),
            hash_on: upstream.hash_on().to_string(),
            cookie: upstream.cookie().map(str::to_string),
            targets: upstream.target_addresses(),
        };

        if report.cookie.is_none() {
            tracing::warn!(upstream = %report.upstream, "hash_on_cookie is not set");
        }
        if report.targets.is_empty() {
            tracing::warn!(upstream = %report.upstream, "upstream has no targets");
        }
        tracing::info!(
            upstream = %report.upstream,
            targets = report.targets.len(),
            "session affinity invariant holds"
        );

        Ok(report)
    }
}

/// Outcome of a passing affinity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AffinityReport {
    /// Upstream that was checked.
    pub upstream: String,
    /// Its `hash_on` value.
    pub hash_on: String,
    /// Affinity cookie name, if configured.
    pub cookie: Option<String>,
    /// Target addresses, in declaration order.
    pub targets: Vec<String>,
}

impl fmt::Display for AffinityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: hash_on={} cookie={} targets=[{}]",
            self.upstream,
            self.hash_on,
            self.cookie.as_deref().unwrap_or("(unset)"),
            self.targets.join(", ")
        )
    }
}

/// Loads gateway config files and runs an [`AffinityExpectation`] on them.
#[derive(Debug)]
pub struct AffinityChecker<'r> {
    registry: &'r ParserRegistry,
    expectation: AffinityExpectation,
}

impl<'r> AffinityChecker<'r> {
    /// Build a checker.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Configuration`] if `registry` has no YAML parser.
    pub fn new(registry: &'r ParserRegistry, expectation: AffinityExpectation) -> Result<Self, CheckError> {
        registry.require(DocumentFormat::Yaml)?;
        Ok(Self { registry, expectation })
    }

    /// Parse `path` as YAML and check it.
    ///
    /// # Errors
    ///
    /// [`CheckError::Io`] or [`CheckError::Parse`] if the file cannot be
    /// loaded, otherwise the errors of [`AffinityExpectation::check`].
    pub fn check_file(&self, path: &Path) -> Result<AffinityReport, CheckError> {
        tracing::info!(
            path = %path.display(),
            upstream = %self.expectation.upstream,
            "checking upstream session affinity"
        );
        let document = load_document_as(self.registry, path, DocumentFormat::Yaml)?;
        self.expectation.check(&document)
    }
}
