//! # Affinity Subcommand
//!
//! Checks that the gateway upstream balances with cookie-based session
//! affinity, and prints its cookie name and targets.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use confcheck_core::CheckError;
use confcheck_gateway::{AffinityChecker, AffinityExpectation, AffinityReport, DuplicatePolicy};

use crate::{report_failure, CheckContext};

/// Arguments for the `confcheck affinity` subcommand.
#[derive(Args, Debug, Default)]
pub struct AffinityArgs {
    /// Gateway config file. Defaults to `gateway_config` from the config file.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Upstream that must hash on a cookie.
    #[arg(long)]
    pub upstream: Option<String>,

    /// Fail when two upstreams share a name instead of keeping the last one.
    #[arg(long)]
    pub strict_duplicates: bool,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the affinity subcommand.
///
/// Returns exit code: 0 if the invariant holds, 1 otherwise.
pub fn run_affinity(args: &AffinityArgs, ctx: &CheckContext) -> Result<u8> {
    let path = ctx.resolve(args.path.as_deref().unwrap_or(&ctx.config.gateway_config));

    let mut expectation = ctx.config.expectation();
    if let Some(ref upstream) = args.upstream {
        expectation.upstream = upstream.clone();
    }
    if args.strict_duplicates {
        expectation.duplicates = DuplicatePolicy::Reject;
    }

    match check(ctx, expectation, &path) {
        Ok(report) => {
            print_report(&report, args.json)?;
            Ok(0)
        }
        Err(e) => Ok(report_failure(&e)),
    }
}

fn print_report(report: &AffinityReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("OK: {report}");
    }
    Ok(())
}

fn check(
    ctx: &CheckContext,
    expectation: AffinityExpectation,
    path: &std::path::Path,
) -> Result<AffinityReport, CheckError> {
    AffinityChecker::new(&ctx.registry, expectation)?.check_file(path)
}

#[cfg(all(test, feature = "yaml"))]
mod tests {
    use super::*;
    use crate::config::CheckConfig;

    fn check_configured(ctx: &CheckContext) -> Result<AffinityReport, CheckError> {
        let path = ctx.resolve(&ctx.config.gateway_config);
        check(ctx, ctx.config.expectation(), &path)
    }

    const KONG_YML: &str = "\
_format_version: \"3.0\"
upstreams:
  - name: backend-upstream
    hash_on: cookie
    hash_on_cookie: session_id
    targets:
      - target: 10.0.0.1:8080
      - target: 10.0.0.2:8080
  - name: ws-upstream
    hash_on: ip
";

    fn repo_with_kong(body: &str) -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("infra/api-gateway");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("kong.yml"), body).unwrap();
        root
    }

    #[test]
    fn default_config_passes() {
        let root = repo_with_kong(KONG_YML);
        let ctx = CheckContext::new(root.path(), CheckConfig::default());
        assert_eq!(run_affinity(&AffinityArgs::default(), &ctx).unwrap(), 0);

        let report = check_configured(&ctx).unwrap();
        assert_eq!(report.cookie.as_deref(), Some("session_id"));
        assert_eq!(report.targets, ["10.0.0.1:8080", "10.0.0.2:8080"]);
    }

    #[test]
    fn upstream_flag_overrides_config() {
        let root = repo_with_kong(KONG_YML);
        let ctx = CheckContext::new(root.path(), CheckConfig::default());
        let args = AffinityArgs {
            upstream: Some("ws-upstream".to_string()),
            ..AffinityArgs::default()
        };
        assert_eq!(run_affinity(&args, &ctx).unwrap(), 1);
    }

    #[test]
    fn missing_upstream_returns_1() {
        let root = repo_with_kong("upstreams: []\n");
        let ctx = CheckContext::new(root.path(), CheckConfig::default());
        assert_eq!(run_affinity(&AffinityArgs::default(), &ctx).unwrap(), 1);
        assert!(matches!(
            check_configured(&ctx).unwrap_err(),
            CheckError::MissingEntry { .. }
        ));
    }

    #[test]
    fn strict_duplicates_flag() {
        let body = format!("{KONG_YML}  - name: backend-upstream\n    hash_on: cookie\n");
        let root = repo_with_kong(&body);
        let ctx = CheckContext::new(root.path(), CheckConfig::default());

        assert_eq!(run_affinity(&AffinityArgs::default(), &ctx).unwrap(), 0);
        let strict = AffinityArgs {
            strict_duplicates: true,
            ..AffinityArgs::default()
        };
        assert_eq!(run_affinity(&strict, &ctx).unwrap(), 1);
    }

    #[test]
    fn explicit_path_and_json_output() {
        let root = repo_with_kong("upstreams: []\n");
        let other = root.path().join("kong.staging.yml");
        std::fs::write(&other, KONG_YML).unwrap();

        let ctx = CheckContext::new(root.path(), CheckConfig::default());
        let args = AffinityArgs {
            path: Some(other),
            json: true,
            ..AffinityArgs::default()
        };
        assert_eq!(run_affinity(&args, &ctx).unwrap(), 0);
    }

    #[test]
    fn missing_file_returns_1() {
        let root = tempfile::tempdir().unwrap();
        let ctx = CheckContext::new(root.path(), CheckConfig::default());
        assert_eq!(run_affinity(&AffinityArgs::default(), &ctx).unwrap(), 1);
    }
}
