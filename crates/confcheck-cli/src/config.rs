//! # Configuration
//!
//! Optional file passed with `--config`, read through the same parser
//! registry as the checked files (`.yml`/`.yaml` or `.json`). Every key is
//! optional; missing keys take the defaults below, unknown keys are rejected.
//! Command-line flags override file values.
//!
//! ```yaml
//! syntax_dir: infra/observability
//! extensions: [json, yml]
//! gateway_config: infra/api-gateway/kong.yml
//! upstream: backend-upstream
//! hash_on: cookie
//! duplicates: last_wins   # or: reject
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use confcheck_core::{load_document, ParserRegistry};
use confcheck_gateway::{AffinityExpectation, DuplicatePolicy, DEFAULT_CONFIG_PATH, DEFAULT_HASH_ON, DEFAULT_UPSTREAM};
use confcheck_syntax::DEFAULT_EXTENSIONS;

/// Directory scanned by `confcheck syntax`, relative to the repository root.
pub const DEFAULT_SYNTAX_DIR: &str = "infra/observability";

/// Effective settings for a check run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    /// Directory whose config files must parse.
    pub syntax_dir: PathBuf,
    /// File extensions the syntax check looks at.
    pub extensions: Vec<String>,
    /// Gateway declarative config to check.
    pub gateway_config: PathBuf,
    /// Upstream that must carry session affinity.
    pub upstream: String,
    /// Required `hash_on` value.
    pub hash_on: String,
    /// Handling of repeated upstream names.
    pub duplicates: DuplicatePolicy,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            syntax_dir: PathBuf::from(DEFAULT_SYNTAX_DIR),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            gateway_config: PathBuf::from(DEFAULT_CONFIG_PATH),
            upstream: DEFAULT_UPSTREAM.to_string(),
            hash_on: DEFAULT_HASH_ON.to_string(),
            duplicates: DuplicatePolicy::default(),
        }
    }
}

impl CheckConfig {
    /// Load settings from a config file, choosing the parser by extension.
    pub fn load(path: &Path, registry: &ParserRegistry) -> Result<Self> {
        let document = load_document(registry, path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_value(document.root().clone())
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    /// Build settings from a parsed tree. An empty document yields the defaults.
    pub fn from_value(value: Value) -> Result<Self> {
        let config: Option<Self> = serde_json::from_value(value)?;
        Ok(config.unwrap_or_default())
    }

    /// Load `path` if given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>, registry: &ParserRegistry) -> Result<Self> {
        match path {
            Some(path) => {
                let config = Self::load(path, registry)?;
                tracing::debug!(path = %path.display(), "loaded config file");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// The affinity expectation these settings describe.
    pub fn expectation(&self) -> AffinityExpectation {
        AffinityExpectation {
            upstream: self.upstream.clone(),
            hash_on: self.hash_on.clone(),
            duplicates: self.duplicates,
        }
    }
}
