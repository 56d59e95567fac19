//! TCP listener that hands every accepted connection its own match

use crate::config::Config;
use crate::error::ServerError;
use crate::session::run_match;
use log::{error, info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};

/// Game server accepting one match per connection
pub struct Server {
    listener: TcpListener,
    config: Arc<Config>,
}

impl Server {
    pub async fn bind(config: Config) -> Result<Self, ServerError> {
        config.validate()?;

        let addr = config.listen_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        info!("Start listening game on {}", addr);

        Ok(Server {
            listener,
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the task is dropped. A failed accept is
    /// logged and the loop carries on.
    pub async fn run(&self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let config = Arc::clone(&self.config);
                    tokio::spawn(handle_connection(stream, peer, config));
                }
                Err(e) => {
                    error!("Error on accept game: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
            }
        }
    }
}

async fn handle_connection(stream: TcpStream, peer: SocketAddr, config: Arc<Config>) {
    if let Err(e) = stream.set_nodelay(true) {
        warn!("Failed to set TCP_NODELAY for {}: {}", peer, e);
    }

    match run_match(stream, peer, &config).await {
        Ok(result) => info!("End game, remote = {}, result = {:?}", peer, result),
        Err(e) => info!("End game, remote = {}, disconnected: {}", peer, e),
    }
}
