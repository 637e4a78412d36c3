use clap::Parser;

use asset_cache_bust::cli::{Cli, init_logging, run};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli).await {
        tracing::error!("Error: {err:#}");
        std::process::exit(1);
    }
}
