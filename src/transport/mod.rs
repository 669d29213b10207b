//! # Lambdatronic Transport
//!
//! This module provides the byte-level link to the controller: a `Transport`
//! trait with exact-length reads and full writes, a buffered implementation
//! over any tokio stream, and the TCP connector for serial-over-socket bridges.
//!
//! Reads are bounded by a short timeout. A timeout is reported as
//! `LambdaError::Timeout` and never consumes data: bytes that arrived before the
//! timeout stay buffered and are returned by the next call.

pub mod mock;

use crate::config::ConnectionConfig;
use crate::error::LambdaError;
use bytes::BytesMut;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};
use tokio::time::timeout;

pub use mock::MockTransport;

/// Byte-level link used by the protocol engine.
#[async_trait::async_trait]
pub trait Transport: Send {
    /// Returns exactly `n` bytes, or `LambdaError::Timeout` without consuming anything.
    async fn read_exact(&mut self, n: usize) -> Result<Vec<u8>, LambdaError>;

    /// Writes and flushes all of `data`.
    async fn write_all(&mut self, data: &[u8]) -> Result<(), LambdaError>;
}

/// Buffered transport over any async byte stream.
pub struct StreamTransport<S> {
    stream: S,
    rx: BytesMut,
    read_timeout: Duration,
}

/// Transport over a TCP serial bridge.
pub type TcpTransport = StreamTransport<TcpStream>;

impl<S> StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S, read_timeout: Duration) -> Self {
        StreamTransport {
            stream,
            rx: BytesMut::with_capacity(512),
            read_timeout,
        }
    }

    /// Bytes received but not yet handed out.
    pub fn buffered(&self) -> usize {
        self.rx.len()
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

#[async_trait::async_trait]
impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn read_exact(&mut self, n: usize) -> Result<Vec<u8>, LambdaError> {
        while self.rx.len() < n {
            self.rx.reserve(n - self.rx.len());
            // read_buf is cancel safe, so an elapsed timeout loses nothing
            let read = timeout(self.read_timeout, self.stream.read_buf(&mut self.rx))
                .await
                .map_err(|_| LambdaError::Timeout)??;
            if read == 0 {
                return Err(LambdaError::ConnectionClosed);
            }
        }
        Ok(self.rx.split_to(n).to_vec())
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<(), LambdaError> {
        self.stream.write_all(data).await?;
        self.stream.flush().await?;
        Ok(())
    }
}

/// Connects to the bridge, trying every resolved address in order.
pub async fn connect(config: &ConnectionConfig) -> Result<TcpTransport, LambdaError> {
    let target = config.target();
    let addrs = lookup_host((config.host.as_str(), config.port))
        .await
        .map_err(|e| LambdaError::ConnectError {
            target: target.clone(),
            reason: e.to_string(),
        })?;

    let mut last_error = String::from("no addresses resolved");
    for addr in addrs {
        match timeout(config.connect_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                if let Err(e) = stream.set_nodelay(true) {
                    log::debug!("Could not disable Nagle on {addr}: {e}");
                }
                log::info!("Connected to {target} via {addr}");
                return Ok(StreamTransport::new(stream, config.read_timeout));
            }
            Ok(Err(e)) => {
                log::debug!("Connect to {addr} failed: {e}");
                last_error = format!("{addr}: {e}");
            }
            Err(_) => {
                log::debug!("Connect to {addr} timed out");
                last_error = format!("{addr}: timed out");
            }
        }
    }

    Err(LambdaError::ConnectError {
        target,
        reason: last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::duplex;

    #[tokio::test]
    async fn test_read_exact_across_partial_writes() {
        let (client, mut device) = duplex(64);
        let mut transport = StreamTransport::new(client, Duration::from_millis(200));

        device.write_all(&[0x4D, 0x31]).await.unwrap();
        let reader = tokio::spawn(async move { transport.read_exact(3).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        device.write_all(&[0x04]).await.unwrap();

        assert_eq!(reader.await.unwrap().unwrap(), vec![0x4D, 0x31, 0x04]);
    }

    #[tokio::test]
    async fn test_timeout_keeps_partial_bytes() {
        let (client, mut device) = duplex(64);
        let mut transport = StreamTransport::new(client, Duration::from_millis(20));

        device.write_all(&[0x4D]).await.unwrap();
        assert!(matches!(
            transport.read_exact(3).await,
            Err(LambdaError::Timeout)
        ));
        assert_eq!(transport.buffered(), 1);

        device.write_all(&[0x32, 0x07]).await.unwrap();
        assert_eq!(transport.read_exact(3).await.unwrap(), vec![0x4D, 0x32, 0x07]);
        assert_eq!(transport.buffered(), 0);
    }

    #[tokio::test]
    async fn test_closed_stream() {
        let (client, device) = duplex(64);
        let mut transport = StreamTransport::new(client, Duration::from_millis(50));
        drop(device);
        assert!(matches!(
            transport.read_exact(3).await,
            Err(LambdaError::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_write_all() {
        let (client, mut device) = duplex(64);
        let mut transport = StreamTransport::new(client, Duration::from_millis(50));
        transport.write_all(&[0x52, 0x62, 0x03]).await.unwrap();

        let mut buf = [0u8; 3];
        device.read_exact(&mut buf).await.unwrap();
        assert_eq!(buf, [0x52, 0x62, 0x03]);
    }
}
