//! apisig server - HMAC HTTP Signature authenticated echo service.
//!
//! Verifies the `Authorization: Signature ...` header of every request and
//! echoes back the authenticated key id. Useful as a reference deployment and
//! for testing clients against a real verifier.
//!
//! # Usage
//!
//! ```text
//! API_KEYS=client-1:s3cr3t LISTEN=0.0.0.0:8080 apisig-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LISTEN` | `0.0.0.0:8080` | Bind address |
//! | `API_KEYS` | *(required)* | Comma-separated `id:secret` pairs |
//! | `REQUEST_LIFETIME` | `300` | Freshness window in seconds (`0`/`off` disables) |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::net::SocketAddr;

use anyhow::{Context, Result};
use apisig_server::{ServerConfig, build_gateway, serve};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Perform a health check by connecting to the server and requesting `/health`.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if response.contains("200 OK") && response.contains("\"running\"") {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

/// Resolve on Ctrl-C.
async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("received shutdown signal, draining connections");
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env().context("invalid configuration")?;

    // Handle --health-check flag for container health checks.
    if std::env::args().any(|a| a == "--health-check") {
        let addr = config.listen.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    init_tracing(&config.log_level)?;

    let gateway = build_gateway(&config)?;

    let addr: SocketAddr = config
        .listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(
        %addr,
        request_lifetime = ?config.request_lifetime(),
        version = VERSION,
        "starting apisig server",
    );

    serve(listener, gateway, shutdown_signal()).await
}
