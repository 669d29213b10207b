//! Mock transport implementation for testing
//!
//! This module provides an in-memory transport that can be used to test the
//! protocol engine without a controller or a socket. Clones share buffers, so a
//! test can keep one handle while the engine owns another.

use crate::error::LambdaError;
use crate::protocol::command::Command;
use crate::protocol::frame::encode;
use crate::transport::Transport;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Mock transport that simulates the controller side of the link
#[derive(Clone, Default)]
pub struct MockTransport {
    /// Data written by the engine (outgoing)
    tx_buffer: Arc<Mutex<Vec<u8>>>,
    /// Data the engine will read (incoming)
    rx_buffer: Arc<Mutex<VecDeque<u8>>>,
    /// Simulated error for the next operation
    next_error: Arc<Mutex<Option<io::Error>>>,
    /// Once set, an empty receive buffer reads as a closed connection
    closed: Arc<Mutex<bool>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue raw bytes to be read
    pub fn queue_rx_data(&self, data: &[u8]) {
        lock(&self.rx_buffer).extend(data);
    }

    /// Queue a well-formed frame to be read
    pub fn queue_frame(&self, command: Command, payload: &[u8]) -> Result<(), LambdaError> {
        let bytes = encode(command, payload)?;
        self.queue_rx_data(&bytes);
        Ok(())
    }

    /// Bytes still waiting to be read
    pub fn pending_rx(&self) -> usize {
        lock(&self.rx_buffer).len()
    }

    /// Get data that was written to the transport
    pub fn get_tx_data(&self) -> Vec<u8> {
        lock(&self.tx_buffer).clone()
    }

    /// Get and clear data that was written to the transport
    pub fn take_tx_data(&self) -> Vec<u8> {
        std::mem::take(&mut *lock(&self.tx_buffer))
    }

    /// Set an error to be returned on the next operation
    pub fn set_next_error(&self, error: io::Error) {
        *lock(&self.next_error) = Some(error);
    }

    /// Simulate the peer hanging up once the queued data is consumed
    pub fn close(&self) {
        *lock(&self.closed) = true;
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn read_exact(&mut self, n: usize) -> Result<Vec<u8>, LambdaError> {
        if let Some(error) = lock(&self.next_error).take() {
            return Err(error.into());
        }

        let mut rx = lock(&self.rx_buffer);
        if rx.len() >= n {
            return Ok(rx.drain(..n).collect());
        }
        if *lock(&self.closed) {
            Err(LambdaError::ConnectionClosed)
        } else {
            Err(LambdaError::Timeout)
        }
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<(), LambdaError> {
        if let Some(error) = lock(&self.next_error).take() {
            return Err(error.into());
        }

        lock(&self.tx_buffer).extend_from_slice(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_short_read_times_out_without_consuming() {
        let mut mock = MockTransport::new();
        mock.queue_rx_data(&[0x01, 0x02]);

        assert!(matches!(mock.read_exact(3).await, Err(LambdaError::Timeout)));
        assert_eq!(mock.pending_rx(), 2);

        mock.queue_rx_data(&[0x03]);
        assert_eq!(mock.read_exact(3).await.unwrap(), vec![0x01, 0x02, 0x03]);
    }

    #[tokio::test]
    async fn test_queue_frame() {
        let mut mock = MockTransport::new();
        mock.queue_frame(Command::new(0x4D, 0x33), &[]).unwrap();
        assert_eq!(
            mock.read_exact(5).await.unwrap(),
            vec![0x4D, 0x33, 0x00, 0x00, 0x80]
        );
    }

    #[test]
    fn test_queue_oversized_frame() {
        let mock = MockTransport::new();
        assert!(matches!(
            mock.queue_frame(Command::new(0x4D, 0x31), &[0u8; 256]),
            Err(LambdaError::PayloadTooLong(256))
        ));
        assert_eq!(mock.pending_rx(), 0);
    }

    #[tokio::test]
    async fn test_shared_tx_buffer() {
        let mock = MockTransport::new();
        let mut engine_side = mock.clone();
        engine_side.write_all(&[0xAA, 0xBB]).await.unwrap();
        assert_eq!(mock.take_tx_data(), vec![0xAA, 0xBB]);
        assert!(mock.get_tx_data().is_empty());
    }

    #[tokio::test]
    async fn test_error_and_close() {
        let mut mock = MockTransport::new();
        mock.set_next_error(io::Error::new(io::ErrorKind::BrokenPipe, "Test error"));
        assert!(matches!(mock.write_all(&[0x00]).await, Err(LambdaError::Io(_))));

        mock.close();
        assert!(matches!(
            mock.read_exact(1).await,
            Err(LambdaError::ConnectionClosed)
        ));
    }
}
