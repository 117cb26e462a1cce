//! Integration tests for the apisig server.
//!
//! Each test starts the server in-process on an ephemeral port and talks to it
//! over real HTTP with `reqwest`, signing requests with
//! [`apisig_auth::sign::authorization_header`].
//!
//! ```text
//! cargo test -p apisig-integration
//! ```

use std::net::SocketAddr;
use std::sync::Once;

use apisig_auth::SignatureAlgorithm;
use apisig_auth::sign::{authorization_header, http_date};
use apisig_server::{ServerConfig, build_gateway, serve};
use chrono::{DateTime, Utc};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

static INIT: Once = Once::new();

/// Key id registered with every test server.
pub const KEY_ID: &str = "abc";

/// Secret for [`KEY_ID`].
pub const SECRET: &str = "sekret";

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A server running on a background task. Shut down on drop.
#[derive(Debug)]
pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<anyhow::Result<()>>>,
}

impl TestServer {
    /// Start a server with the default test key and freshness window.
    pub async fn start() -> Self {
        Self::start_with(test_config()).await
    }

    /// Start a server with an explicit configuration.
    pub async fn start_with(config: ServerConfig) -> Self {
        init_tracing();

        let gateway = build_gateway(&config).expect("test config should be valid");
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve(listener, gateway, async move {
            rx.await.ok();
        }));

        Self {
            addr,
            shutdown: Some(tx),
            handle: Some(handle),
        }
    }

    /// Absolute URL for `path_and_query` on this server.
    #[must_use]
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{path_and_query}", self.addr)
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle
                .await
                .expect("server task panicked")
                .expect("server returned error");
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Server configuration with the single test key.
#[must_use]
pub fn test_config() -> ServerConfig {
    ServerConfig {
        api_keys: vec![(KEY_ID.to_owned(), SECRET.to_owned())],
        ..ServerConfig::default()
    }
}

/// Describes how to sign a test request.
#[derive(Debug, Clone)]
pub struct Signer<'a> {
    /// Key id placed in the directive.
    pub key_id: &'a str,
    /// Secret the signature is computed with.
    pub secret: &'a str,
    /// Algorithm to sign with.
    pub algorithm: SignatureAlgorithm,
    /// Covered headers, in order.
    pub headers: &'a [&'a str],
    /// Value of the `date` header.
    pub date: DateTime<Utc>,
}

impl Default for Signer<'_> {
    fn default() -> Self {
        Self {
            key_id: KEY_ID,
            secret: SECRET,
            algorithm: SignatureAlgorithm::HmacSha256,
            headers: &["(request-target)", "date"],
            date: Utc::now(),
        }
    }
}

impl Signer<'_> {
    /// Build the headers for a signed request: `date`, every `extra` header,
    /// and `authorization`.
    #[must_use]
    pub fn sign(
        &self,
        method: &str,
        path_and_query: &str,
        extra: &[(&str, &str)],
    ) -> http::HeaderMap {
        let mut builder = http::Request::builder()
            .method(method)
            .uri(path_and_query)
            .header(http::header::DATE, http_date(self.date));
        for (name, value) in extra {
            builder = builder.header(*name, *value);
        }
        let (mut parts, ()) = builder.body(()).expect("valid request").into_parts();

        let value = authorization_header(
            &parts,
            self.key_id,
            self.algorithm,
            self.headers,
            self.secret.as_bytes(),
        )
        .expect("signing headers present");
        parts.headers.insert(
            http::header::AUTHORIZATION,
            value.parse().expect("valid header value"),
        );
        parts.headers
    }
}

mod test_auth;
mod test_health;
