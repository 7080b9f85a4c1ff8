//! TCP server
//!
//! Accepts connections and hands each one to its own task. All tasks share
//! one dispatcher; command execution is serialized only at the keyspace
//! lock.

mod connection;

pub use connection::Connection;

use crate::dispatch::Dispatcher;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Bind the listener and serve connections until the task is cancelled.
pub async fn run(addr: &str, dispatcher: Arc<Dispatcher>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", addr);

    loop {
        let (socket, peer) = listener.accept().await?;
        info!("new connection from {}", peer);

        let dispatcher = dispatcher.clone();
        tokio::spawn(async move {
            let mut connection = Connection::new(socket);
            if let Err(e) = connection.serve(dispatcher).await {
                error!("connection error from {}: {}", peer, e);
            }
            info!("connection closed: {}", peer);
        });
    }
}
