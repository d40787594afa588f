//! TCP transport
//!
//! Thin wrapper around a `TcpStream` that applies per-call timeouts and
//! reads whole frames: six header bytes first, then the body length the
//! header declares plus the CRC trailer.

use crate::error::{ClientError, Result};
use rocproto::frame::{CRC_LEN, HEADER_LEN};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

#[derive(Debug, Default)]
pub struct Transport {
    stream: Option<TcpStream>,
}

impl Transport {
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Connect if not already connected.
    pub async fn open(&mut self, addr: SocketAddr, connect_timeout: Duration) -> Result<()> {
        if self.stream.is_some() {
            tracing::trace!(%addr, "connection already open");
            return Ok(());
        }
        tracing::debug!(%addr, "connecting");
        let stream = timeout(connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| ClientError::ConnectTimeout(addr))?
            .map_err(|source| ClientError::ConnectFailed { addr, source })?;
        self.stream = Some(stream);
        Ok(())
    }

    /// Gracefully shut the connection down. A close timeout or shutdown
    /// error is logged, not surfaced; the stream is dropped either way.
    pub async fn close(&mut self, close_timeout: Duration) {
        if let Some(mut stream) = self.stream.take() {
            tracing::debug!("closing connection");
            match timeout(close_timeout, stream.shutdown()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!("error shutting down connection: {e}"),
                Err(_) => tracing::warn!("timed out waiting for connection to close"),
            }
        }
    }

    /// Drop the connection without the graceful shutdown. Used when the
    /// read boundary is lost and the socket can no longer be trusted.
    pub fn abort(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!("aborting connection");
        }
    }

    pub async fn write_frame(&mut self, frame: &[u8], write_timeout: Duration) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(ClientError::ClosedByPeer)?;
        tracing::trace!(len = frame.len(), "writing frame");
        timeout(write_timeout, stream.write_all(frame))
            .await
            .map_err(|_| ClientError::WriteTimeout)?
            .map_err(map_io)?;
        Ok(())
    }

    /// Read one whole response frame.
    pub async fn read_frame(&mut self, read_timeout: Duration) -> Result<Vec<u8>> {
        let stream = self.stream.as_mut().ok_or(ClientError::ClosedByPeer)?;
        timeout(read_timeout, read_frame_inner(stream))
            .await
            .map_err(|_| ClientError::ReadTimeout)?
    }
}

async fn read_frame_inner(stream: &mut TcpStream) -> Result<Vec<u8>> {
    let mut frame = vec![0u8; HEADER_LEN];
    stream.read_exact(&mut frame).await.map_err(map_io)?;
    let body_len = frame[5] as usize;
    let mut rest = vec![0u8; body_len + CRC_LEN];
    stream.read_exact(&mut rest).await.map_err(map_io)?;
    frame.extend_from_slice(&rest);
    tracing::trace!(len = frame.len(), "read frame");
    Ok(frame)
}

fn map_io(e: std::io::Error) -> ClientError {
    match e.kind() {
        std::io::ErrorKind::UnexpectedEof
        | std::io::ErrorKind::ConnectionReset
        | std::io::ErrorKind::ConnectionAborted
        | std::io::ErrorKind::BrokenPipe => ClientError::ClosedByPeer,
        _ => ClientError::Io(e),
    }
}
