//! HTTP/1 server on hyper and tokio.
//!
//! The server accepts connections until shutdown, collects each request
//! body, hands the request to the [`Dispatcher`] and writes the response.
//! Body collection and dispatch are each bounded by the configured request
//! timeout, and bodies longer than `max_body_bytes` answer 413.
//!
//! # Example
//!
//! ```rust,ignore
//! use lookup_broker_server::{Dispatcher, Server, ServerConfig};
//!
//! let server = Server::new(ServerConfig::default(), dispatcher);
//! server.run().await?;
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use lookup_broker_core::BrokerError;
use lookup_broker_middleware::{Request, Response, ResponseExt};
use tokio::net::{TcpListener, TcpStream};

use crate::config::ServerConfig;
use crate::dispatch::Dispatcher;
use crate::error::ServerError;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// The broker's HTTP server.
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    dispatcher: Arc<Dispatcher>,
}

impl Server {
    /// Creates a server dispatching to `dispatcher`.
    #[must_use]
    pub fn new(config: ServerConfig, dispatcher: Dispatcher) -> Self {
        Self {
            config,
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// The server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Runs until SIGTERM or SIGINT.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_with_shutdown(ShutdownSignal::with_os_signals())
            .await
    }

    /// Binds the configured address and runs until `shutdown` triggers.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self.config.socket_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.serve(listener, shutdown).await
    }

    /// Serves connections from `listener` until `shutdown` triggers, then
    /// waits up to the shutdown timeout for open connections.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, "server listening");

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = listener.accept() => match result {
                    Ok((stream, remote_addr)) => {
                        let server = Arc::clone(&server);
                        let token = tracker.acquire();
                        let shutdown = shutdown.clone();

                        tokio::spawn(async move {
                            if let Err(e) = server.handle_connection(stream, remote_addr, shutdown).await {
                                tracing::debug!(remote_addr = %remote_addr, error = %e, "connection error");
                            }
                            drop(token);
                        });
                    }
                    Err(e) => tracing::error!(error = %e, "failed to accept connection"),
                },

                () = shutdown.recv() => {
                    tracing::info!("shutdown signal received, stopping server");
                    break;
                }
            }
        }

        let shutdown_timeout = server.config.shutdown_timeout();
        tracing::info!(
            connections = tracker.active_connections(),
            "waiting up to {shutdown_timeout:?} for open connections"
        );

        tokio::select! {
            () = tracker.wait_for_shutdown() => tracing::info!("all connections closed"),
            () = tokio::time::sleep(shutdown_timeout) => tracing::warn!(
                connections = tracker.active_connections(),
                "shutdown timeout reached with open connections"
            ),
        }

        tracing::info!("server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: &Arc<Self>,
        stream: TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let server = Arc::clone(self);
        let service = service_fn(move |request: http::Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { Ok::<_, Infallible>(server.handle_request(request).await) }
        });

        let connection = http1::Builder::new().serve_connection(TokioIo::new(stream), service);

        tokio::select! {
            result = connection => result,
            () = shutdown.recv() => {
                tracing::debug!(remote_addr = %remote_addr, "connection closed for shutdown");
                Ok(())
            }
        }
    }

    async fn handle_request(&self, request: http::Request<Incoming>) -> Response {
        let timeout = self.config.request_timeout();
        let limit = self.config.max_body_bytes();
        let (parts, body) = request.into_parts();

        let body = match tokio::time::timeout(timeout, Limited::new(body, limit).collect()).await {
            Ok(Ok(collected)) => collected.to_bytes(),
            Ok(Err(e)) if e.is::<LengthLimitError>() => {
                tracing::warn!(http.path = %parts.uri.path(), limit, "request body too large");
                return Response::broker_error(&BrokerError::PayloadTooLarge { limit });
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "failed to read request body");
                return Response::broker_error(&BrokerError::BodyRead(e.to_string()));
            }
            Err(_) => {
                tracing::warn!(http.path = %parts.uri.path(), "request body timed out");
                return Response::broker_error(&BrokerError::Timeout);
            }
        };

        let request = Request::from_parts(parts, Full::new(body));
        let path = request.uri().path().to_string();

        match tokio::time::timeout(timeout, self.dispatcher.dispatch(request)).await {
            Ok(response) => response,
            Err(_) => {
                tracing::warn!(http.path = %path, "request handling timed out");
                Response::broker_error(&BrokerError::Timeout)
            }
        }
    }
}
