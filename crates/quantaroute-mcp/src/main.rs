use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use quantaroute_lib::config::{API_KEY_ENV, BASE_URL_ENV, TIMEOUT_ENV};
use quantaroute_lib::{Gateway, GatewayConfig};
use quantaroute_mcp::{run, McpServer, StdioTransport};

#[derive(Parser, Debug)]
#[command(author, version, about = "QuantaRoute geocoder MCP server (stdio)")]
struct Cli {
    /// Fallback API key for backend calls.
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Backend base URL.
    #[arg(long, env = BASE_URL_ENV)]
    base_url: Option<String>,

    /// Backend request timeout in seconds.
    #[arg(long, env = TIMEOUT_ENV, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Log filter (overrides RUST_LOG).
    #[arg(long)]
    log_level: Option<String>,
}

/// Configure tracing to write only to stderr.
fn configure_tracing(log_level: Option<&str>) -> Result<()> {
    let env_filter = match log_level {
        Some(level) => EnvFilter::try_new(level).context("invalid --log-level filter")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let subscriber = fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

fn gateway_config(cli: &Cli) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    if let Some(key) = cli.api_key.as_deref() {
        config = config.with_api_key(key);
    }
    if let Some(base_url) = cli.base_url.as_deref().filter(|v| !v.trim().is_empty()) {
        config = config.with_base_url(base_url.trim());
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    configure_tracing(cli.log_level.as_deref())?;

    let config = gateway_config(&cli);
    if !config.has_api_key() {
        warn!("no API key configured; tool calls will fail until QUANTAROUTE_API_KEY is set");
    }
    let gateway = Gateway::from_config(config).context("invalid gateway configuration")?;
    info!("QuantaRoute Geocoder MCP server running on stdio");

    let server = McpServer::new(gateway);
    run(&server, StdioTransport::stdio())
        .await
        .context("MCP server loop failed")
}
