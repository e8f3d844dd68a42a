use std::path::PathBuf;

use clap::Parser;

use tx_reconciler::config::{apply_env_overrides, load_config, ReconcilerConfig};
use tx_reconciler::resilience::RateLimiter;
use tx_reconciler::QueryClient;

#[derive(Parser)]
#[command(name = "tx-query")]
#[command(about = "Look up one transaction and print its normalized amount", long_about = None)]
struct Cli {
    /// Transaction ID (hash) to look up.
    tx_id: String,

    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Chain short name, overrides the config file.
    #[arg(long)]
    chain: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => {
            let mut config = ReconcilerConfig::default();
            apply_env_overrides(&mut config);
            config
        }
    };
    if let Some(chain) = cli.chain {
        config.api.chain_symbol = chain;
    }

    let limiter = RateLimiter::from_config(&config.rate_limit)?;
    let client = QueryClient::new(&config.api, limiter)?;

    match client.query(&cli.tx_id).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Err(e) => {
            eprintln!("Error: lookup failed for {}: {}", cli.tx_id, e);
            std::process::exit(1);
        }
    }

    Ok(())
}
