//! backport - cherry-pick a ticket onto its release/hotfix branch

mod cli;

use clap::Parser;
use cli::CommitSource;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "backport")]
#[command(about = "Cherry-pick a ticket's commits onto its release/hotfix branch and open a merge request")]
#[command(version)]
struct Cli {
    /// Enter commit hashes directly instead of merge request ids
    #[arg(long, short = 'c')]
    commits: bool,

    /// Path to the config file (default: <config dir>/backporter/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "backporter=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let source = if cli.commits {
        CommitSource::Hashes
    } else {
        CommitSource::MergeRequests
    };

    if let Err(e) = cli::run_backport(cli.config.as_deref(), source).await {
        cli::report_error(&e);
        std::process::exit(1);
    }
}
