//! Server construction and lifecycle
//!
//! Builds the shared application context, binds the listener, and drives the
//! HTTP serve loop. Each inbound request is handled independently to
//! completion; the only shared state lives in the key-value store and the
//! remote repository.

use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::StartupConfig;
use crate::error::VaultError;
use crate::remote::RemoteStore;
use crate::server::routes::build_router;
use crate::state::{FsKvStore, KvStore};

/// Collaborators shared by every request handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<StartupConfig>,
    pub kv: Arc<dyn KvStore>,
    pub remote: RemoteStore,
}

/// The vault HTTP server.
pub struct Server {
    listener: TcpListener,
    router: axum::Router,
}

impl Server {
    /// Opens the state store, builds the remote client, and binds the listener.
    pub async fn new(config: StartupConfig) -> Result<Self, VaultError> {
        let config = Arc::new(config);
        let kv: Arc<dyn KvStore> = Arc::new(FsKvStore::open(config.state_dir_path())?);
        let remote = RemoteStore::new(Arc::clone(&config))?;

        if config.github_token.is_none() {
            info!("No GitHub token configured; file listing will be empty");
        }

        let socket = config.bind_socket();
        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => {
                info!("Server bound to {}", socket);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(VaultError::from(e));
            }
        };

        let context = AppContext {
            config,
            kv,
            remote,
        };

        Ok(Self {
            listener,
            router: build_router(context),
        })
    }

    /// The address the listener actually bound (port 0 resolves here).
    pub fn local_addr(&self) -> Result<SocketAddr, VaultError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves requests until the process is stopped.
    pub async fn start(self) -> Result<(), VaultError> {
        info!("Starting vault server on {}", self.listener.local_addr()?);
        axum::serve(self.listener, self.router)
            .await
            .map_err(VaultError::from)
    }
}
