use anyhow::Context;
use clap::Parser;
use sahaya_server::{serve, telemetry, ServerArgs, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let args = ServerArgs::parse();
    let config = ServerConfig::from_args(args).context("invalid configuration")?;
    serve(config).await.context("sahaya-server failed")?;
    Ok(())
}
