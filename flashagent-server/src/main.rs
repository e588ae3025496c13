use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use flashagent_common::observability::{init_logging, LogConfig};
use flashagent_config::{FlashConfig, FlashConfigLoader};

#[derive(Debug, Parser)]
#[command(name = "flashagent-server", about = "FlashAgent browser service")]
struct Args {
    /// Path to the configuration file.
    #[arg(long, default_value = "flashagent.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Config first (env wins); a missing or malformed file is fatal here.
    let cfg: FlashConfig = FlashConfigLoader::new().with_file(&args.config).load()?;

    let log_path = init_logging(LogConfig {
        app_name: "flashagent-server",
        emit_stderr: true,
        ..LogConfig::default()
    })?;
    tracing::info!(log = %log_path.display(), "logging initialised");

    let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, max_steps = cfg.agent.max_steps, "flashagent server listening");

    axum::serve(listener, flashagent_server::router()).await?;
    Ok(())
}
