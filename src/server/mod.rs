//! HTTP server front: listener, accept loops, TLS and graceful shutdown.
//!
//! Every request goes through a [`ResolverChain`]: the route table first,
//! then the static roots, then a plain 404.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tokio_httpbin::server::{ResolverChain, Server, ServerConfig};
//!
//! let config = ServerConfig::new("0.0.0.0:8080".parse()?);
//! let server = Server::bind(config, Arc::new(ResolverChain::new())).await?;
//! server.run().await?;
//! ```
//!
//! # Graceful Shutdown
//!
//! [`Server::trigger_shutdown`] stops the accept loops and asks every open
//! connection to finish its in-flight requests and close;
//! [`Server::wait_for_drain`] then waits for the connection count to reach zero.
//!
//! ```rust,ignore
//! server.trigger_shutdown();
//! server.wait_for_drain(server.drain_timeout()).await;
//! ```

pub mod config;
pub mod connection;
pub mod response;
pub mod routing;

use std::io::BufReader;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use socket2::{Domain, Protocol, SockRef, Socket, TcpKeepalive, Type};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_rustls::rustls::pki_types::CertificateDer;
use tokio_rustls::rustls::ServerConfig as RustlsConfig;
use tokio_rustls::TlsAcceptor;
use tracing::{debug, error, info, warn};

pub use config::ServerConfig;
use connection::ConnectionContext;
pub use routing::{resolve_uri_to_path, ResolverChain, Resolver, RouteResolver, StaticResolver};

use crate::config::ConfigError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// HTTP/1.1 + HTTP/2 server over a bound listener.
pub struct Server {
    config: ServerConfig,
    listener: Arc<TcpListener>,
    local_addr: SocketAddr,
    tls_acceptor: Option<TlsAcceptor>,
    resolver: Arc<ResolverChain>,
    /// Active connections counter
    active_connections: Arc<AtomicUsize>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    shutdown_initiated: Arc<AtomicBool>,
}

impl Server {
    /// Load TLS material (if configured) and bind the listener.
    ///
    /// Must run inside a tokio runtime. Binding port 0 picks a free port,
    /// see [`Server::local_addr`].
    pub async fn bind(config: ServerConfig, resolver: Arc<ResolverChain>) -> Result<Self, BoxError> {
        let tls_acceptor = if config.has_tls() {
            let tls_config = Self::load_tls_config(&config)?;
            info!("TLS enabled");
            Some(TlsAcceptor::from(Arc::new(tls_config)))
        } else {
            None
        };

        let std_listener = Self::create_listener(config.addr)?;
        let listener = TcpListener::from_std(std_listener)?;
        let local_addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config,
            listener: Arc::new(listener),
            local_addr,
            tls_acceptor,
            resolver,
            active_connections: Arc::new(AtomicUsize::new(0)),
            shutdown_tx,
            shutdown_rx,
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Get the number of active connections.
    pub fn active_connections(&self) -> usize {
        self.active_connections.load(Ordering::Relaxed)
    }

    fn load_tls_config(config: &ServerConfig) -> Result<RustlsConfig, BoxError> {
        let cert_path = config.tls_cert.as_deref().ok_or("TLS cert path not set")?;
        let key_path = config.tls_key.as_deref().ok_or("TLS key path not set")?;

        let certs: Vec<CertificateDer<'static>> =
            rustls_pemfile::certs(&mut Self::open_pem(cert_path)?)
                .filter_map(|r| r.ok())
                .collect();
        if certs.is_empty() {
            return Err(ConfigError::Invalid {
                key: "TLS_CERT".into(),
                message: "no certificates found in cert file".into(),
            }
            .into());
        }

        let key = rustls_pemfile::private_key(&mut Self::open_pem(key_path)?)?.ok_or_else(|| {
            ConfigError::Invalid {
                key: "TLS_KEY".into(),
                message: "no private key found in key file".into(),
            }
        })?;

        let mut tls_config = RustlsConfig::builder()
            .with_no_client_auth()
            .with_single_cert(certs, key)?;

        // ALPN for HTTP/2 and HTTP/1.1
        tls_config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

        Ok(tls_config)
    }

    fn open_pem(path: &Path) -> Result<BufReader<std::fs::File>, ConfigError> {
        std::fs::File::open(path)
            .map(BufReader::new)
            .map_err(|error| ConfigError::Io {
                path: path.display().to_string(),
                error,
            })
    }

    fn create_listener(addr: SocketAddr) -> std::io::Result<std::net::TcpListener> {
        let domain = if addr.is_ipv6() {
            Domain::IPV6
        } else {
            Domain::IPV4
        };

        let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
        socket.set_reuse_address(true)?;

        #[cfg(unix)]
        socket.set_reuse_port(true)?;

        socket.set_nonblocking(true)?;
        socket.bind(&addr.into())?;
        socket.listen(1024)?;

        Ok(socket.into())
    }

    /// Run the accept loops until [`Server::trigger_shutdown`].
    ///
    /// Returns once every loop has stopped accepting; open connections
    /// keep draining in their own tasks.
    pub async fn run(&self) -> Result<(), BoxError> {
        let num_workers = self.config.worker_count();
        let protocol = if self.tls_acceptor.is_some() {
            "https"
        } else {
            "http"
        };
        info!(
            "Server listening on {}://{} (workers: {}, resolvers: {:?})",
            protocol,
            self.local_addr,
            num_workers,
            self.resolver.names()
        );

        let ctx = Arc::new(ConnectionContext {
            resolver: Arc::clone(&self.resolver),
            active_connections: Arc::clone(&self.active_connections),
            header_timeout: self.config.header_timeout,
            max_body_bytes: self.config.max_body_bytes,
            access_log_enabled: self.config.access_log,
            service_name: Arc::from(self.config.service_name.as_str()),
        });

        let mut handles = Vec::with_capacity(num_workers);

        for worker_id in 0..num_workers {
            let listener = Arc::clone(&self.listener);
            let tls_acceptor = self.tls_acceptor.clone();
            let mut shutdown_rx = self.shutdown_rx.clone();
            let conn_shutdown_rx = self.shutdown_rx.clone();
            let ctx = Arc::clone(&ctx);

            let handle = tokio::spawn(async move {
                debug!("Worker {} started", worker_id);

                loop {
                    tokio::select! {
                        result = listener.accept() => {
                            let (stream, remote_addr) = match result {
                                Ok(conn) => conn,
                                Err(e) => {
                                    error!("Worker {}: Accept error: {}", worker_id, e);
                                    continue;
                                }
                            };

                            let _ = stream.set_nodelay(true);

                            let keepalive = TcpKeepalive::new()
                                .with_time(Duration::from_secs(5))
                                .with_interval(Duration::from_secs(1))
                                .with_retries(3);
                            let _ = SockRef::from(&stream).set_tcp_keepalive(&keepalive);

                            let ctx = Arc::clone(&ctx);
                            let tls = tls_acceptor.clone();
                            let conn_shutdown = conn_shutdown_rx.clone();

                            tokio::spawn(async move {
                                ctx.handle_connection(stream, remote_addr, tls, conn_shutdown).await;
                            });
                        }
                        _ = shutdown_rx.changed() => {
                            debug!("Worker {} received shutdown signal, stopping accept loop", worker_id);
                            break;
                        }
                    }
                }
            });

            handles.push(handle);
        }

        for result in futures_util::future::join_all(handles).await {
            if let Err(e) = result {
                error!("Accept loop task failed: {}", e);
            }
        }

        Ok(())
    }

    /// Trigger graceful shutdown.
    pub fn trigger_shutdown(&self) {
        if self.shutdown_initiated.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.shutdown_tx.send(true);
    }

    /// Get the configured drain timeout.
    pub fn drain_timeout(&self) -> Duration {
        self.config.drain_timeout
    }

    /// Wait for all active connections to drain.
    /// Returns true if drained, false if the timeout was reached.
    pub async fn wait_for_drain(&self, timeout: Duration) -> bool {
        let start = std::time::Instant::now();
        let check_interval = Duration::from_millis(100);

        loop {
            let active = self.active_connections.load(Ordering::Relaxed);
            if active == 0 {
                return true;
            }

            if start.elapsed() >= timeout {
                warn!("Drain timeout reached with {} active connections", active);
                return false;
            }

            debug!("Waiting for {} connections to drain...", active);
            tokio::time::sleep(check_interval).await;
        }
    }
}
