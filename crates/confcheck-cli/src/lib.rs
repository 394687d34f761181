//! # confcheck-cli: Config Check Command-Line Interface
//!
//! Provides the `confcheck` binary used by CI to gate config changes.
//!
//! ## Subcommands
//!
//! - `confcheck syntax [DIR]`: every `*.json` / `*.yml` file in DIR parses.
//! - `confcheck affinity [PATH]`: the gateway upstream hashes on a cookie.
//! - `confcheck all`: both checks, stopping at the first failure.
//!
//! ```bash
//! confcheck syntax infra/observability
//! confcheck affinity infra/api-gateway/kong.yml --upstream backend-upstream
//! confcheck --config confcheck.yml all
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: every check passed.
//! - `1`: a check failed (parse error, missing entry, invariant violation,
//!   missing parser capability).
//! - `2`: operational error before any check ran (e.g. unreadable config file).
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; check logic lives in the domain crates.
//! - Human-readable results go to stdout; diagnostics go through `tracing`.

pub mod affinity;
pub mod all;
pub mod config;
pub mod syntax;

use std::path::{Path, PathBuf};

use confcheck_core::{CheckError, ParserRegistry};

use crate::config::CheckConfig;

/// Everything a subcommand needs to run.
#[derive(Debug)]
pub struct CheckContext {
    /// Root that relative paths are resolved against.
    pub repo_root: PathBuf,
    /// Effective configuration.
    pub config: CheckConfig,
    /// Parser capabilities available to the checks.
    pub registry: ParserRegistry,
}

impl CheckContext {
    /// Context with every parser compiled into this build.
    pub fn new(repo_root: impl Into<PathBuf>, config: CheckConfig) -> Self {
        Self::with_registry(repo_root, config, ParserRegistry::with_defaults())
    }

    /// Context with an explicit parser registry.
    pub fn with_registry(
        repo_root: impl Into<PathBuf>,
        config: CheckConfig,
        registry: ParserRegistry,
    ) -> Self {
        Self {
            repo_root: repo_root.into(),
            config,
            registry,
        }
    }

    /// Resolve `path` against the repository root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        resolve_path(path, &self.repo_root)
    }
}

/// Resolve a path that may be relative to the repository root.
///
/// Absolute paths are returned as-is. A relative path is taken relative to
/// `repo_root` if it exists there, otherwise relative to the current directory.
pub fn resolve_path(path: &Path, repo_root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let repo_relative = repo_root.join(path);
    if repo_relative.exists() {
        repo_relative
    } else {
        path.to_path_buf()
    }
}

/// Walk up from `start` to the first directory containing `infra/`.
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join("infra").is_dir())
        .map(Path::to_path_buf)
}

/// Print a failed check and return its exit code.
pub(crate) fn report_failure(err: &CheckError) -> u8 {
    tracing::error!(kind = err.kind(), "check failed: {err}");
    println!("FAIL: {err}");
    1
}
