//! HTTPS listener

use anyhow::{Context, Result, anyhow, bail};
use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use hyper_util::service::TowerToHyperService;
use rustls::ServerConfig;
use rustls::pki_types::CertificateDer;
use std::fs::File;
use std::io::BufReader;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_rustls::TlsAcceptor;
use tracing::{debug, info, warn};

/// Build a rustls server config from PEM certificate chain and key files
pub fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<Arc<ServerConfig>> {
    let cert_file = File::open(cert_path)
        .with_context(|| format!("Failed to open TLS certificate {}", cert_path.display()))?;
    let certs: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut BufReader::new(cert_file))
        .collect::<Result<_, _>>()
        .with_context(|| format!("Failed to parse TLS certificate {}", cert_path.display()))?;
    if certs.is_empty() {
        bail!("No certificates found in {}", cert_path.display());
    }

    let key_file = File::open(key_path)
        .with_context(|| format!("Failed to open TLS key {}", key_path.display()))?;
    let key = rustls_pemfile::private_key(&mut BufReader::new(key_file))
        .with_context(|| format!("Failed to parse TLS key {}", key_path.display()))?
        .ok_or_else(|| anyhow!("No private key found in {}", key_path.display()))?;

    let mut config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .context("Invalid TLS certificate or key")?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    info!("Loaded TLS certificate from {}", cert_path.display());
    Ok(Arc::new(config))
}

/// Accept TLS connections until the shutdown flag flips.
///
/// Each connection is served on its own task with HTTP/1.1 or HTTP/2,
/// whichever the client negotiates. On shutdown, open connections finish
/// their in-flight requests before this returns.
pub async fn serve_tls(
    listener: TcpListener,
    config: Arc<ServerConfig>,
    app: Router,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let acceptor = TlsAcceptor::from(config);
    let mut connections = JoinSet::new();

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    warn!("Failed to accept TLS connection: {}", e);
                    continue;
                }
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => continue,
            _ = shutdown.wait_for(|stop| *stop) => break,
        };

        let acceptor = acceptor.clone();
        let app = app.clone();
        let mut shutdown = shutdown.clone();
        connections.spawn(async move {
            let tls_stream = tokio::select! {
                accepted = acceptor.accept(stream) => match accepted {
                    Ok(s) => s,
                    Err(e) => {
                        debug!("TLS handshake with {} failed: {}", peer, e);
                        return;
                    }
                },
                _ = shutdown.wait_for(|stop| *stop) => return,
            };
            serve_connection(tls_stream, app, shutdown, peer).await;
        });
    }
    drop(listener);

    if !connections.is_empty() {
        info!("Waiting for {} HTTPS connection(s) to close", connections.len());
    }
    while connections.join_next().await.is_some() {}

    info!("HTTPS listener stopped");
    Ok(())
}

/// Serve one connection, switching it to graceful shutdown when the flag flips
async fn serve_connection<I>(
    io: I,
    app: Router,
    mut shutdown: watch::Receiver<bool>,
    peer: SocketAddr,
) where
    I: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let builder = auto::Builder::new(TokioExecutor::new());
    let conn = builder.serve_connection(TokioIo::new(io), TowerToHyperService::new(app));
    tokio::pin!(conn);

    let result = tokio::select! {
        result = conn.as_mut() => result,
        _ = async { let _ = shutdown.wait_for(|stop| *stop).await; } => {
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    };
    if let Err(e) = result {
        debug!("Error serving connection from {}: {}", peer, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_certificate_file() {
        let err = load_tls_config(Path::new("/nonexistent/cert.pem"), Path::new("/nonexistent/key.pem"))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to open TLS certificate"));
    }

    #[test]
    fn test_certificate_file_without_pem_blocks() {
        let mut cert = tempfile::NamedTempFile::new().unwrap();
        cert.write_all(b"not a certificate\n").unwrap();
        let key = tempfile::NamedTempFile::new().unwrap();

        let err = load_tls_config(cert.path(), key.path()).unwrap_err();
        assert!(err.to_string().contains("No certificates found"));
    }

    #[tokio::test]
    async fn test_in_flight_request_completes_after_shutdown() {
        use axum::routing::get;
        use std::time::Duration;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::sync::Notify;

        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let app = Router::new().route(
            "/slow",
            get({
                let entered = entered.clone();
                let release = release.clone();
                move || {
                    let entered = entered.clone();
                    let release = release.clone();
                    async move {
                        entered.notify_one();
                        release.notified().await;
                        "done"
                    }
                }
            }),
        );

        let (mut client, server) = tokio::io::duplex(4096);
        let (tx, rx) = watch::channel(false);
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        let served = tokio::spawn(serve_connection(server, app, rx, peer));

        client
            .write_all(b"GET /slow HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();
        entered.notified().await;

        tx.send(true).unwrap();
        release.notify_one();

        let mut response = Vec::new();
        tokio::time::timeout(Duration::from_secs(5), client.read_to_end(&mut response))
            .await
            .expect("connection closed after the response")
            .unwrap();
        let response = String::from_utf8(response).unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.ends_with("done"));

        tokio::time::timeout(Duration::from_secs(5), served)
            .await
            .expect("connection task finished")
            .unwrap();
    }
}
