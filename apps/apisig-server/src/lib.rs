//! apisig server library.
//!
//! Assembles the authenticating gateway from a [`ServerConfig`] and runs the
//! accept loop. The `apisig-server` binary is a thin wrapper around this
//! crate; integration tests use it to run the server in-process.

pub mod config;
pub mod gateway;
pub mod handler;

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use apisig_auth::SignatureVerifier;
use apisig_http::{SignatureAuthConfig, SignatureAuthService};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

pub use config::ServerConfig;
pub use gateway::GatewayService;
pub use handler::EchoHandler;

/// Build the gateway for `config`.
///
/// Fails when no API keys are configured.
pub fn build_gateway(config: &ServerConfig) -> Result<GatewayService<EchoHandler>> {
    let resolver = config.resolver();
    if resolver.is_empty() {
        anyhow::bail!("no API keys configured. Set API_KEYS to a list of id:secret pairs.");
    }
    debug!(keys = resolver.len(), "Registered API keys");

    let verifier = SignatureVerifier::new(resolver, config.verifier.clone());
    let auth = SignatureAuthService::new(
        Arc::new(EchoHandler),
        verifier,
        SignatureAuthConfig::default(),
    );

    Ok(GatewayService::new(auth))
}

/// Run the accept loop, serving connections until `shutdown` completes.
pub async fn serve(
    listener: TcpListener,
    service: GatewayService<EchoHandler>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained");

    Ok(())
}
