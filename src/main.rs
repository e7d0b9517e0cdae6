//! rashomon - command-line companion to the Rashomon SDK.

use anyhow::Result;
use rashomon_sdk::cli::Cli;
use rashomon_sdk::config::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.log_level.as_deref())?;

    cli.run().await
}
