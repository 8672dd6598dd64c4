//! HTTP server.
//!
//! [`Server`] owns the configuration and the [`Router`]. Routes are registered before
//! [`Server::start`], which binds the listener and spawns the accept loop. Every accepted
//! connection runs on its own task.
use std::future::poll_fn;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

use crate::log::{info, trace, warning};
use crate::routing::{RouteError, Router};

mod config;
mod listener;
mod connection;

pub use config::{Config, ConfigError};
pub use listener::Listener;
pub use connection::serve_connection;

use connection::{Connection, shutdown_signal};

/// Server error.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error("server already running")]
    AlreadyRunning,
    #[error("server not running")]
    NotRunning,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// HTTP server.
///
/// Dropping a running server stops accepting connections, connections in flight finish their
/// current request.
#[derive(Debug)]
pub struct Server {
    config: Arc<Config>,
    routes: Routes,
    running: Option<Running>,
}

#[derive(Debug)]
enum Routes {
    Building(Router),
    Frozen(Arc<Router>),
}

#[derive(Debug)]
struct Running {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
    local_addr: Option<SocketAddr>,
}

impl Server {
    /// Create new [`Server`] with an empty router.
    pub fn new(config: Config) -> Result<Self, ServerError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            routes: Routes::Building(Router::new()),
            running: None,
        })
    }

    /// Create new [`Server`] with routes already registered.
    pub fn with_router(config: Config, router: Router) -> Result<Self, ServerError> {
        let mut server = Self::new(config)?;
        server.routes = Routes::Building(router);
        Ok(server)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the router for registration.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::ServerAlreadyStarted`] once the server has been started.
    pub fn router_mut(&mut self) -> Result<&mut Router, RouteError> {
        match &mut self.routes {
            Routes::Building(router) => Ok(router),
            Routes::Frozen(_) => Err(RouteError::ServerAlreadyStarted),
        }
    }

    /// Bind the configured address and start serving.
    pub async fn start(&mut self) -> Result<(), ServerError> {
        if self.running.is_some() {
            return Err(ServerError::AlreadyRunning);
        }
        let listener = TcpListener::bind(self.config.addr).await?;
        self.start_with(listener)
    }

    /// Start serving connections from `listener`.
    ///
    /// Route registration is no longer possible afterwards.
    pub fn start_with<L: Listener>(&mut self, listener: L) -> Result<(), ServerError> {
        if self.running.is_some() {
            return Err(ServerError::AlreadyRunning);
        }

        let router = self.freeze();
        let local_addr = listener.local_addr();
        let (shutdown, rx) = watch::channel(false);

        info!("listening on {local_addr:?}");
        let task = tokio::spawn(accept_loop(listener, router, self.config.clone(), rx));

        self.running = Some(Running {
            shutdown,
            task,
            local_addr,
        });
        Ok(())
    }

    /// Stop accepting connections, then wait for every connection to finish.
    ///
    /// Handlers in flight complete and their responses are written, no further request is read.
    pub async fn stop(&mut self) -> Result<(), ServerError> {
        let Some(running) = self.running.take() else {
            return Err(ServerError::NotRunning);
        };
        let _ = running.shutdown.send(true);
        running.task.await.map_err(io::Error::other)?;
        info!("server stopped");
        Ok(())
    }

    /// Returns `true` if the server is accepting connections.
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Returns the bound address while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().and_then(|running| running.local_addr)
    }

    fn freeze(&mut self) -> Arc<Router> {
        match &mut self.routes {
            Routes::Frozen(router) => router.clone(),
            Routes::Building(router) => {
                let router = Arc::new(std::mem::take(router));
                self.routes = Routes::Frozen(router.clone());
                router
            }
        }
    }
}

async fn accept_loop<L: Listener>(
    listener: L,
    router: Arc<Router>,
    config: Arc<Config>,
    rx: watch::Receiver<bool>,
) {
    let mut connections = JoinSet::new();
    let mut shutdown = Some(rx.clone());

    loop {
        tokio::select! {
            _ = shutdown_signal(&mut shutdown) => break,
            accepted = poll_fn(|cx| listener.poll_accept(cx)) => match accepted {
                Ok((io, peer)) => {
                    trace!("accepted {peer:?}");
                    let conn = Connection::new(
                        io,
                        peer,
                        router.clone(),
                        config.clone(),
                        Some(rx.clone()),
                    );
                    connections.spawn(conn.run());
                }
                Err(err) => {
                    warning!("failed to accept connection: {err}");
                }
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
        }
    }

    drop(listener);
    info!("listener closed, draining {} connections", connections.len());
    while connections.join_next().await.is_some() {}
}
