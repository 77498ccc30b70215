use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info};

use crate::config::Config;
use crate::http::connection::{Connection, ServiceContext};
use crate::http::response::StatusTable;
use crate::http::writer::ResponseEncoder;
use crate::routes::{DirStore, Router};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub struct Server {
    listener: TcpListener,
    ctx: Arc<ServiceContext>,
}

impl Server {
    /// Binds the listening socket and builds the state shared by all connections.
    pub async fn bind(cfg: &Config) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(&cfg.listen_addr).await?;
        info!(
            addr = %listener.local_addr()?,
            directory = %cfg.directory.display(),
            "Listening"
        );

        let statuses = Arc::new(StatusTable::standard());
        let ctx = ServiceContext {
            router: Router::new(DirStore::new(&cfg.directory)),
            encoder: ResponseEncoder::new(statuses),
            framing: cfg.framing,
            limits: cfg.limits(),
        };

        Ok(Self {
            listener,
            ctx: Arc::new(ctx),
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections forever. Failed accepts are logged and retried.
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            let accepted = self.listener.accept().await;
            self.on_accept(accepted).await;
        }
    }

    /// Accepts connections until `shutdown` resolves. In-flight connections
    /// finish on their own tasks.
    pub async fn run_until<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => self.on_accept(accepted).await,
                _ = &mut shutdown => {
                    info!("Listener shutting down");
                    return Ok(());
                }
            }
        }
    }

    async fn on_accept(&self, accepted: io::Result<(TcpStream, SocketAddr)>) {
        let (socket, peer) = match accepted {
            Ok(pair) => pair,
            Err(e) => {
                // EMFILE and friends clear up once connections close.
                error!("Accept failed: {}", e);
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                return;
            }
        };
        info!("Accepted connection from {}", peer);

        let ctx = Arc::clone(&self.ctx);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, ctx);
            if let Err(e) = conn.run().await {
                error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}

/// Binds and serves `cfg` until Ctrl-C.
pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let server = Server::bind(cfg).await?;
    server
        .run_until(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
            }
        })
        .await
}
