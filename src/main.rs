//! Entry point for papertrail, a terminal research assistant that answers
//! questions by letting a language model call paper search, summary,
//! comparison, and citation tools.
//!
//! This binary loads environment variables, installs the tracing subscriber,
//! parses CLI arguments via [`cli`], and dispatches the chosen subcommand.

mod agent;
mod chat;
mod cli;
mod config;
mod constants;
mod conversation;
mod format;
mod message;
mod models;
mod provider;
mod retrieval;
mod tokens;
mod tools;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::parse();
    init_tracing(cli.verbose);
    cli::run(cli).await
}

/// Logs go to stderr so answers on stdout stay clean. `RUST_LOG` wins over
/// the `--verbose` default.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "papertrail=debug"
    } else {
        "papertrail=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
