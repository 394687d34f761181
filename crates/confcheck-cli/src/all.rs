//! # All Subcommand
//!
//! Runs the syntax check and then the affinity check with configured
//! defaults, stopping at the first failure.

use anyhow::Result;
use clap::Args;

use crate::affinity::{run_affinity, AffinityArgs};
use crate::syntax::{run_syntax, SyntaxArgs};
use crate::CheckContext;

/// Arguments for the `confcheck all` subcommand.
#[derive(Args, Debug, Default)]
pub struct AllArgs {
    /// Fail when two upstreams share a name.
    #[arg(long)]
    pub strict_duplicates: bool,
}

/// Execute every check in order.
pub fn run_all(args: &AllArgs, ctx: &CheckContext) -> Result<u8> {
    let code = run_syntax(&SyntaxArgs::default(), ctx)?;
    if code != 0 {
        return Ok(code);
    }
    tracing::info!("syntax check passed");

    let affinity = AffinityArgs {
        strict_duplicates: args.strict_duplicates,
        ..AffinityArgs::default()
    };
    run_affinity(&affinity, ctx)
}
