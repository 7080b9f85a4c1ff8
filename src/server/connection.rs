//! Per-connection read/dispatch/write loop

use crate::dispatch::Dispatcher;
use crate::protocol::{RespEncoder, RespParser, RespValue};
use bytes::BytesMut;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, warn};

pub struct Connection {
    stream: TcpStream,
    read_buffer: BytesMut,
    write_buffer: BytesMut,
}

impl Connection {
    pub fn new(stream: TcpStream) -> Self {
        Connection {
            stream,
            read_buffer: BytesMut::with_capacity(4096),
            write_buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Serve the connection until the peer hangs up.
    ///
    /// Commands execute in receive order; each reply is written before the
    /// next frame is dispatched. A malformed inbound frame drops the
    /// connection without sending anything, per the protocol contract.
    pub async fn serve(&mut self, dispatcher: Arc<Dispatcher>) -> io::Result<()> {
        loop {
            let n = self.stream.read_buf(&mut self.read_buffer).await?;
            if n == 0 {
                if self.read_buffer.is_empty() {
                    return Ok(());
                }
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "peer closed mid-frame",
                ));
            }

            loop {
                let frame = RespParser::parse(&mut self.read_buffer).map_err(|e| {
                    warn!("dropping connection on protocol error: {}", e);
                    io::Error::new(io::ErrorKind::InvalidData, e)
                })?;
                let Some(frame) = frame else {
                    break;
                };

                debug!("request: {}", frame);
                let reply = dispatcher.dispatch(&frame);
                self.write_reply(&reply).await?;
            }
        }
    }

    async fn write_reply(&mut self, reply: &RespValue) -> io::Result<()> {
        self.write_buffer.clear();
        RespEncoder::encode_to(&mut self.write_buffer, reply);
        self.stream.write_all(&self.write_buffer).await?;
        self.stream.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Keyspace;
    use tokio::net::TcpListener;

    async fn spawn_server() -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let dispatcher = Arc::new(Dispatcher::new(Arc::new(Keyspace::new())));

        tokio::spawn(async move {
            loop {
                let (socket, _) = listener.accept().await.unwrap();
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move {
                    let _ = Connection::new(socket).serve(dispatcher).await;
                });
            }
        });

        addr
    }

    async fn read_reply(stream: &mut TcpStream) -> Vec<u8> {
        let mut buf = [0u8; 1024];
        let n = stream.read(&mut buf).await.unwrap();
        buf[..n].to_vec()
    }

    #[tokio::test]
    async fn test_serve_set_then_get() {
        let addr = spawn_server().await;
        let mut stream = TcpStream::connect(addr).await.unwrap();

        stream
            .write_all(b"*3\r\n$3\r\nSET\r\n$3\r\nkey\r\n$5\r\nvalue\r\n")
            .await
            .unwrap();
        assert_eq!(read_reply(&mut stream).await, b"+OK\r\n");

        stream
            .write_all(b"*2\r\n$3\r\nGET\r\n$3\r\nkey\r\n")
            .await
            .unwrap();
        assert_eq!(read_reply(&mut stream).await, b"$5\r\nvalue\r\n");
    }

    #[tokio::test]
    async fn test_serve_handles_split_frames() {
        let addr = spawn_server().await;
        let mut stream = TcpStream::connect(addr).await.unwrap();

        // the frame arrives in two pieces
        stream.write_all(b"*1\r\n$4\r\nPI").await.unwrap();
        stream.flush().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        stream.write_all(b"NG\r\n").await.unwrap();

        assert_eq!(read_reply(&mut stream).await, b"+PONG\r\n");
    }

    #[tokio::test]
    async fn test_protocol_error_drops_connection() {
        let addr = spawn_server().await;
        let mut stream = TcpStream::connect(addr).await.unwrap();

        stream.write_all(b"!bogus\r\n").await.unwrap();

        // nothing is written back; the server closes the stream
        let mut buf = [0u8; 16];
        let n = stream.read(&mut buf).await.unwrap();
        assert_eq!(n, 0);
    }
}
