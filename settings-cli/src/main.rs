//! rulesetctl entry point

use clap::Parser;
use settings_cli::{run, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("rulesetctl failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
