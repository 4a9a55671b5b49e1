//! DLMM liquidity advisor server.
use anyhow::Result;
use clap::Parser;
use dlmm_lp_api::{ApiServer, ServerConfig};
use dotenv::dotenv;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dlmm-advisor")]
#[command(about = "DLMM pool and bin-range advisor HTTP server", long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "DLMM_BIND_ADDR")]
    bind: Option<SocketAddr>,

    /// Solana RPC endpoint
    #[arg(long, env = "DLMM_RPC_URL")]
    rpc_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = ServerConfig::from_env();
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }
    if let Some(rpc_url) = cli.rpc_url {
        config.rpc_url = rpc_url;
    }

    ApiServer::new(config)?.run().await
}
