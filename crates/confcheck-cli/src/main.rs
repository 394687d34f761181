//! # confcheck CLI entry point
//!
//! Parses command-line arguments, sets up logging, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use confcheck_cli::affinity::{run_affinity, AffinityArgs};
use confcheck_cli::all::{run_all, AllArgs};
use confcheck_cli::config::CheckConfig;
use confcheck_cli::syntax::{run_syntax, SyntaxArgs};
use confcheck_cli::{find_repo_root, CheckContext};
use confcheck_core::ParserRegistry;

/// Infrastructure config checks for CI.
///
/// Verifies that observability configs parse and that the API gateway keeps
/// cookie-based session affinity on the backend upstream.
#[derive(Parser, Debug)]
#[command(name = "confcheck", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a configuration file (YAML or JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that every JSON/YAML file in a directory parses.
    Syntax(SyntaxArgs),

    /// Check that the gateway upstream hashes on a session cookie.
    Affinity(AffinityArgs),

    /// Run every check, stopping at the first failure.
    All(AllArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!("confcheck v{} starting", env!("CARGO_PKG_VERSION"));

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let repo_root = find_repo_root(&cwd).unwrap_or_else(|| {
        tracing::warn!("Could not locate repository root; using current directory");
        cwd
    });
    tracing::debug!(repo_root = %repo_root.display(), "resolved repository root");

    let registry = ParserRegistry::with_defaults();
    tracing::debug!(formats = ?registry.formats(), "parser capabilities");

    let config = match CheckConfig::load_or_default(cli.config.as_deref(), &registry) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(2);
        }
    };
    let ctx = CheckContext::with_registry(repo_root, config, registry);

    let result = match cli.command {
        Commands::Syntax(args) => run_syntax(&args, &ctx),
        Commands::Affinity(args) => run_affinity(&args, &ctx),
        Commands::All(args) => run_all(&args, &ctx),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
