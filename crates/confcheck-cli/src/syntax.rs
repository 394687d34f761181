//! # Syntax Subcommand
//!
//! Confirms that every config file in a directory parses.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use confcheck_core::DocumentFormat;
use confcheck_syntax::{SyntaxReport, SyntaxValidator};

use crate::{report_failure, CheckContext};

/// Arguments for the `confcheck syntax` subcommand.
#[derive(Args, Debug, Default)]
pub struct SyntaxArgs {
    /// Directory to scan. Defaults to `syntax_dir` from the config file.
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// File extension to check. Repeat for several. Defaults to json and yml.
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Print the report as JSON instead of a summary line.
    #[arg(long)]
    pub json: bool,
}

/// Execute the syntax subcommand.
///
/// Returns exit code: 0 if every file parsed, 1 on the first failure.
pub fn run_syntax(args: &SyntaxArgs, ctx: &CheckContext) -> Result<u8> {
    let dir = ctx.resolve(args.dir.as_deref().unwrap_or(&ctx.config.syntax_dir));
    let extensions = if args.extensions.is_empty() {
        &ctx.config.extensions
    } else {
        &args.extensions
    };

    let result = SyntaxValidator::with_extensions(&ctx.registry, extensions.as_slice())
        .and_then(|validator| validator.validate_dir(&dir));

    match result {
        Ok(report) => {
            print_report(&report, args.json)?;
            Ok(0)
        }
        Err(e) => Ok(report_failure(&e)),
    }
}

fn print_report(report: &SyntaxReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    println!(
        "OK: {} config file(s) in {} parsed ({} JSON, {} YAML)",
        report.len(),
        report.dir.display(),
        report.count(DocumentFormat::Json),
        report.count(DocumentFormat::Yaml),
    );
    Ok(())
}
