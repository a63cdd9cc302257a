//! TCP transport layer for MC protocol communication.
//!
//! This module provides the [`Transport`] trait and its TCP implementation,
//! [`TcpTransport`]. The transport layer is completely separated from the
//! protocol layer: it only knows about sockets and bytes.
//!
//! # Design
//!
//! - **Protocol agnostic** - Handles only byte transmission, no MC protocol knowledge
//! - **Synchronous** - Blocking send/receive with configurable timeout
//! - **Single connection** - One stream, opened and closed explicitly
//!
//! A single `receive` call returns whatever one read delivers. MC frames are
//! small enough to arrive in one segment in practice; partial reads are not
//! reassembled.
//!
//! # Example
//!
//! ```no_run
//! use fx3_mcprotocol::{TcpTransport, Transport, MAX_FRAME_SIZE};
//! use std::time::Duration;
//!
//! let mut transport = TcpTransport::new("192.168.4.2", 5001, Duration::from_secs(5));
//! transport.connect()?;
//! transport.send(b"01FF000A4420000000640100")?;
//! let response = transport.receive(MAX_FRAME_SIZE)?;
//! transport.close();
//! # Ok::<(), fx3_mcprotocol::McError>(())
//! ```

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, trace};

use crate::error::{McError, Result};

/// Default MC protocol port of the FX3U-ENET-ADP.
pub const DEFAULT_MC_PORT: u16 = 5001;

/// Default timeout for connect, send and receive.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Receive buffer size used for one response.
pub const MAX_FRAME_SIZE: usize = 4096;

/// Byte-stream connection to a PLC.
///
/// Implementations own their connection exclusively. All failures are
/// reported as [`McError::Connection`].
pub trait Transport {
    /// Opens the connection. Does nothing when already connected.
    fn connect(&mut self) -> Result<()>;

    /// Writes the whole buffer.
    fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Performs one read of at most `max_size` bytes.
    fn receive(&mut self, max_size: usize) -> Result<Vec<u8>>;

    /// Releases the connection. Safe to call when not connected.
    fn close(&mut self);

    /// Returns whether a connection is currently open.
    fn is_connected(&self) -> bool;
}

fn not_connected() -> McError {
    McError::connection(
        "not connected to PLC",
        io::Error::from(io::ErrorKind::NotConnected),
    )
}

/// TCP transport for MC protocol communication.
pub struct TcpTransport {
    host: String,
    port: u16,
    timeout: Duration,
    stream: Option<TcpStream>,
}

impl TcpTransport {
    /// Creates a disconnected transport for `host:port`.
    ///
    /// No network activity happens until [`connect`](Transport::connect).
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
            stream: None,
        }
    }

    /// Returns the remote host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the remote port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn open(&self) -> io::Result<TcpStream> {
        let mut last_err = None;
        for addr in (self.host.as_str(), self.port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(self.timeout))?;
                    stream.set_write_timeout(Some(self.timeout))?;
                    stream.set_nodelay(true)?;
                    return Ok(stream);
                }
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::AddrNotAvailable, "host resolved to no address")
        }))
    }
}

impl Transport for TcpTransport {
    fn connect(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let stream = self.open().map_err(|e| {
            McError::connection(format!("failed to connect to {}:{}", self.host, self.port), e)
        })?;
        debug!(host = %self.host, port = self.port, "connected to PLC");
        self.stream = Some(stream);
        Ok(())
    }

    fn send(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or_else(not_connected)?;
        stream
            .write_all(data)
            .map_err(|e| McError::connection("failed to send data", e))?;
        trace!(len = data.len(), "sent frame");
        Ok(())
    }

    fn receive(&mut self, max_size: usize) -> Result<Vec<u8>> {
        let stream = self.stream.as_mut().ok_or_else(not_connected)?;
        let mut buffer = vec![0u8; max_size];
        let size = stream
            .read(&mut buffer)
            .map_err(|e| McError::connection("failed to receive data", e))?;
        buffer.truncate(size);
        trace!(len = size, "received frame");
        Ok(buffer)
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.shutdown(Shutdown::Both) {
                debug!(error = %e, "shutdown failed while closing");
            }
            debug!(host = %self.host, port = self.port, "connection closed");
        }
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}

impl std::fmt::Debug for TcpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpTransport")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("timeout", &self.timeout)
            .field(
                "local_addr",
                &self.stream.as_ref().and_then(|s| s.local_addr().ok()),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    fn echo_server() -> (u16, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 64];
            let n = stream.read(&mut buf).unwrap();
            stream.write_all(&buf[..n]).unwrap();
        });
        (port, handle)
    }

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_MC_PORT, 5001);
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(5));
        assert_eq!(MAX_FRAME_SIZE, 4096);
    }

    #[test]
    fn test_new_does_not_connect() {
        let transport = TcpTransport::new("127.0.0.1", 5001, Duration::from_millis(100));
        assert!(!transport.is_connected());
        assert_eq!(transport.host(), "127.0.0.1");
        assert_eq!(transport.port(), 5001);
        assert_eq!(transport.timeout(), Duration::from_millis(100));
    }

    #[test]
    fn test_send_receive_require_connection() {
        let mut transport = TcpTransport::new("127.0.0.1", 5001, Duration::from_millis(100));
        assert!(matches!(
            transport.send(b"00"),
            Err(McError::Connection { .. })
        ));
        assert!(matches!(
            transport.receive(16),
            Err(McError::Connection { .. })
        ));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut transport = TcpTransport::new("127.0.0.1", 5001, Duration::from_millis(100));
        transport.close();
        transport.close();
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_connect_refused() {
        // Bind then drop to get a port nobody listens on
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let mut transport = TcpTransport::new("127.0.0.1", port, Duration::from_millis(500));
        let err = transport.connect().unwrap_err();
        assert!(matches!(err, McError::Connection { .. }));
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_round_trip_over_loopback() {
        let (port, server) = echo_server();
        let mut transport = TcpTransport::new("127.0.0.1", port, Duration::from_secs(2));

        transport.connect().unwrap();
        transport.connect().unwrap();
        assert!(transport.is_connected());

        transport.send(b"01FF000A").unwrap();
        let response = transport.receive(MAX_FRAME_SIZE).unwrap();
        assert_eq!(response, b"01FF000A");

        transport.close();
        assert!(!transport.is_connected());
        transport.close();
        server.join().unwrap();
    }

    #[test]
    fn test_debug() {
        let transport = TcpTransport::new("127.0.0.1", 5001, Duration::from_millis(100));
        let debug_str = format!("{:?}", transport);
        assert!(debug_str.contains("TcpTransport"));
        assert!(debug_str.contains("127.0.0.1"));
    }
}
