//! High-level MC protocol client for FX3 PLCs.
//!
//! This module provides the [`Client`] struct, which is the primary interface
//! for reading and writing FX3 PLC memory by symbol.
//!
//! # Overview
//!
//! Every call runs the same pipeline:
//!
//! 1. Reject writes on a read-only client
//! 2. Parse the symbol (`"D100"`) and check its bit/word kind
//! 3. Validate the address range against the CPU profile
//! 4. Build the request with the selected codec
//! 5. Send it, receive one response, parse it with the same codec
//!
//! Each operation produces exactly 1 request and 1 response.
//! No automatic retries, caching, or reconnection.
//!
//! # Example
//!
//! ```no_run
//! use fx3_mcprotocol::{Client, ClientConfig, CpuModel, Encoding};
//!
//! let config = ClientConfig::new("192.168.4.2")
//!     .with_cpu(CpuModel::FX3U)
//!     .with_encoding(Encoding::Ascii);
//! let mut plc = Client::new(config)?;
//! plc.connect()?;
//!
//! let regs = plc.read_regs("D100", 3)?;
//! let running = plc.read_bit("M8000")?;
//! plc.write_reg("D200", 42)?;
//!
//! plc.close();
//! # Ok::<(), fx3_mcprotocol::McError>(())
//! ```
//!
//! # Thread Safety
//!
//! A client owns one connection and serves one request at a time. To poll
//! several PLCs concurrently, create one client per PLC.

use std::time::Duration;

use tracing::{debug, trace};

use crate::codec::{unsupported, Codec, Encoding};
use crate::error::{McError, Result};
use crate::profile::{CpuModel, DeviceProfile, LimitPolicy};
use crate::symbol::{parse_symbol, Symbol};
use crate::transport::{TcpTransport, Transport, DEFAULT_MC_PORT, DEFAULT_TIMEOUT, MAX_FRAME_SIZE};
use crate::utils;

/// Configuration for creating an MC protocol client.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClientConfig {
    /// PLC adapter hostname or IP address.
    pub host: String,
    /// MC protocol port.
    pub port: u16,
    /// CPU model, selecting the memory profile.
    pub cpu: CpuModel,
    /// Frame encoding.
    pub encoding: Encoding,
    /// Connect, send and receive timeout.
    pub timeout: Duration,
    /// Rejects every write when set.
    pub read_only: bool,
    /// Treatment of devices without a limit in the CPU profile.
    pub limit_policy: LimitPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_MC_PORT,
            cpu: CpuModel::default(),
            encoding: Encoding::default(),
            timeout: DEFAULT_TIMEOUT,
            read_only: false,
            limit_policy: LimitPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for `host` with default settings
    /// (port 5001, FX3U, ASCII, 5 s timeout, read-write).
    ///
    /// # Example
    ///
    /// ```
    /// use fx3_mcprotocol::{ClientConfig, CpuModel, Encoding};
    ///
    /// let config = ClientConfig::new("192.168.4.2");
    /// assert_eq!(config.port, 5001);
    /// assert_eq!(config.cpu, CpuModel::FX3U);
    /// assert_eq!(config.encoding, Encoding::Ascii);
    /// assert!(!config.read_only);
    /// ```
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Sets a custom port (default is 5001).
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the CPU model (default is FX3U).
    pub fn with_cpu(mut self, cpu: CpuModel) -> Self {
        self.cpu = cpu;
        self
    }

    /// Sets the frame encoding (default is ASCII).
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets a custom timeout (default is 5 seconds).
    ///
    /// # Example
    ///
    /// ```
    /// use fx3_mcprotocol::ClientConfig;
    /// use std::time::Duration;
    ///
    /// let config = ClientConfig::new("192.168.4.2").with_timeout(Duration::from_secs(2));
    /// assert_eq!(config.timeout, Duration::from_secs(2));
    /// ```
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables or disables read-only mode.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Sets the policy for devices without a profile limit.
    pub fn with_limit_policy(mut self, policy: LimitPolicy) -> Self {
        self.limit_policy = policy;
        self
    }

    /// Builds a configuration from textual CPU and encoding names, as found
    /// in command lines or settings files. Names are case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns `McError::InvalidConfig` for an unknown CPU model or encoding.
    ///
    /// # Example
    ///
    /// ```
    /// use fx3_mcprotocol::{ClientConfig, CpuModel, Encoding};
    ///
    /// let config = ClientConfig::from_names("192.168.4.2", "fx3g", "BINARY").unwrap();
    /// assert_eq!(config.cpu, CpuModel::FX3G);
    /// assert_eq!(config.encoding, Encoding::Binary);
    ///
    /// assert!(ClientConfig::from_names("192.168.4.2", "FX1S", "ascii").is_err());
    /// ```
    pub fn from_names(host: impl Into<String>, cpu: &str, encoding: &str) -> Result<Self> {
        Ok(Self::new(host)
            .with_cpu(cpu.parse()?)
            .with_encoding(encoding.parse()?))
    }

    fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(McError::invalid_config("host must not be empty"));
        }
        if self.port == 0 {
            return Err(McError::invalid_config("port must not be 0"));
        }
        if self.timeout.is_zero() {
            return Err(McError::invalid_config("timeout must be greater than zero"));
        }
        Ok(())
    }
}

/// MC protocol client for FX3 PLCs.
///
/// Generic over its [`Transport`]; [`Client::new`] uses [`TcpTransport`].
pub struct Client<T: Transport = TcpTransport> {
    transport: T,
    config: ClientConfig,
    profile: &'static DeviceProfile,
    codec: &'static dyn Codec,
}

impl Client<TcpTransport> {
    /// Creates a TCP client with the given configuration.
    ///
    /// No connection is opened until [`connect`](Self::connect).
    ///
    /// # Errors
    ///
    /// Returns `McError::InvalidConfig` for an empty host, port 0 or a zero timeout.
    ///
    /// # Example
    ///
    /// ```
    /// use fx3_mcprotocol::{Client, ClientConfig};
    ///
    /// let client = Client::new(ClientConfig::new("127.0.0.1")).unwrap();
    /// assert_eq!(client.profile().name(), "FX3U");
    /// assert!(!client.is_connected());
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = TcpTransport::new(config.host.clone(), config.port, config.timeout);
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client that exchanges frames over `transport`.
    ///
    /// # Errors
    ///
    /// Returns `McError::InvalidConfig` if the configuration is invalid.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        config.validate()?;
        debug!(
            host = %config.host,
            port = config.port,
            cpu = %config.cpu,
            encoding = %config.encoding,
            read_only = config.read_only,
            "client created"
        );
        Ok(Self {
            transport,
            profile: config.cpu.profile(),
            codec: config.encoding.codec(),
            config,
        })
    }

    /// Connects to the PLC. Does nothing when already connected.
    pub fn connect(&mut self) -> Result<()> {
        self.transport.connect()
    }

    /// Closes the PLC connection. Safe to call at any time.
    pub fn close(&mut self) {
        self.transport.close();
    }

    /// Returns whether the transport is connected.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the CPU memory profile in use.
    pub fn profile(&self) -> &'static DeviceProfile {
        self.profile
    }

    /// Returns the codec in use.
    pub fn codec(&self) -> &'static dyn Codec {
        self.codec
    }

    /// Returns a reference to the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Reads a single word register.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use fx3_mcprotocol::{Client, ClientConfig};
    /// # let mut plc = Client::new(ClientConfig::new("192.168.4.2")).unwrap();
    /// plc.connect()?;
    /// let value = plc.read_reg("D100")?;
    /// println!("D100 = {}", value);
    /// # Ok::<(), fx3_mcprotocol::McError>(())
    /// ```
    pub fn read_reg(&mut self, symbol: &str) -> Result<u16> {
        let values = self.read_regs(symbol, 1)?;
        first(values)
    }

    /// Reads `count` consecutive word registers starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The symbol is malformed or names a bit device
    /// - The range exceeds the CPU profile
    /// - Communication fails
    /// - The PLC returns an error completion code
    pub fn read_regs(&mut self, start: &str, count: usize) -> Result<Vec<u16>> {
        let sym = self.word_symbol(start, "read_regs")?;
        self.check_range(&sym, count)?;
        debug!(symbol = %sym, count, "reading words");

        let frame = self.codec.build_read_words(sym.device, sym.index, count)?;
        let response = self.exchange(&frame)?;
        self.codec.parse_read_words(&response, count)
    }

    /// Reads a single bit.
    pub fn read_bit(&mut self, symbol: &str) -> Result<bool> {
        let values = self.read_bits(symbol, 1)?;
        first(values)
    }

    /// Reads `count` consecutive bits starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The symbol is malformed or names a word device
    /// - The range exceeds the CPU profile
    /// - The codec does not support bit access
    /// - Communication fails
    /// - The PLC returns an error completion code
    pub fn read_bits(&mut self, start: &str, count: usize) -> Result<Vec<bool>> {
        let sym = self.bit_symbol(start, "read_bits")?;
        self.check_range(&sym, count)?;
        if !self.codec.supports_bits() {
            return Err(unsupported("bit read", self.config.encoding));
        }
        debug!(symbol = %sym, count, "reading bits");

        let frame = self.codec.build_read_bits(sym.device, sym.index, count)?;
        let response = self.exchange(&frame)?;
        self.codec.parse_read_bits(&response, count)
    }

    /// Writes a single word register.
    pub fn write_reg(&mut self, symbol: &str, value: u16) -> Result<()> {
        self.write_regs(symbol, &[value])
    }

    /// Writes consecutive word registers starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The client is read-only
    /// - The symbol is malformed or names a bit device
    /// - The range exceeds the CPU profile
    /// - The codec does not support writes
    /// - Communication fails
    /// - The PLC returns an error completion code
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use fx3_mcprotocol::{Client, ClientConfig};
    /// # let mut plc = Client::new(ClientConfig::new("192.168.4.2")).unwrap();
    /// plc.connect()?;
    /// plc.write_regs("D200", &[0x1234, 0x5678])?;
    /// # Ok::<(), fx3_mcprotocol::McError>(())
    /// ```
    pub fn write_regs(&mut self, start: &str, values: &[u16]) -> Result<()> {
        self.check_writable("write_regs")?;
        let sym = self.word_symbol(start, "write_regs")?;
        self.check_range(&sym, values.len())?;
        if !self.codec.supports_writes() {
            return Err(unsupported("word write", self.config.encoding));
        }
        debug!(symbol = %sym, count = values.len(), "writing words");

        let frame = self.codec.build_write_words(sym.device, sym.index, values)?;
        let response = self.exchange(&frame)?;
        self.codec.parse_write_response(&response)
    }

    /// Writes a single bit.
    pub fn write_bit(&mut self, symbol: &str, value: bool) -> Result<()> {
        self.write_bits(symbol, &[value])
    }

    /// Writes consecutive bits starting at `start`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`write_regs`](Self::write_regs), with the symbol
    /// required to name a bit device and the codec to support bit writes.
    pub fn write_bits(&mut self, start: &str, values: &[bool]) -> Result<()> {
        self.check_writable("write_bits")?;
        let sym = self.bit_symbol(start, "write_bits")?;
        self.check_range(&sym, values.len())?;
        if !self.codec.supports_writes() || !self.codec.supports_bits() {
            return Err(unsupported("bit write", self.config.encoding));
        }
        debug!(symbol = %sym, count = values.len(), "writing bits");

        let frame = self.codec.build_write_bits(sym.device, sym.index, values)?;
        let response = self.exchange(&frame)?;
        self.codec.parse_write_response(&response)
    }

    /// Reads a `u32` from two consecutive registers (low word first).
    pub fn read_u32(&mut self, symbol: &str) -> Result<u32> {
        Ok(utils::words_to_u32(self.read_pair(symbol)?))
    }

    /// Writes a `u32` to two consecutive registers (low word first).
    pub fn write_u32(&mut self, symbol: &str, value: u32) -> Result<()> {
        self.write_regs(symbol, &utils::u32_to_words(value))
    }

    /// Reads an `i32` (DINT) from two consecutive registers.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use fx3_mcprotocol::{Client, ClientConfig};
    /// # let mut plc = Client::new(ClientConfig::new("192.168.4.2")).unwrap();
    /// plc.connect()?;
    /// let counter: i32 = plc.read_i32("D100")?;
    /// # Ok::<(), fx3_mcprotocol::McError>(())
    /// ```
    pub fn read_i32(&mut self, symbol: &str) -> Result<i32> {
        Ok(utils::words_to_i32(self.read_pair(symbol)?))
    }

    /// Writes an `i32` (DINT) to two consecutive registers.
    pub fn write_i32(&mut self, symbol: &str, value: i32) -> Result<()> {
        self.write_regs(symbol, &utils::i32_to_words(value))
    }

    /// Reads an `f32` (REAL) from two consecutive registers.
    pub fn read_f32(&mut self, symbol: &str) -> Result<f32> {
        Ok(utils::words_to_f32(self.read_pair(symbol)?))
    }

    /// Writes an `f32` (REAL) to two consecutive registers.
    pub fn write_f32(&mut self, symbol: &str, value: f32) -> Result<()> {
        self.write_regs(symbol, &utils::f32_to_words(value))
    }

    fn read_pair(&mut self, symbol: &str) -> Result<[u16; 2]> {
        match self.read_regs(symbol, 2)?.as_slice() {
            &[low, high] => Ok([low, high]),
            other => Err(McError::invalid_response(format!(
                "expected 2 words, got {}",
                other.len()
            ))),
        }
    }

    fn check_writable(&self, operation: &'static str) -> Result<()> {
        if self.config.read_only {
            return Err(McError::ReadOnly { operation });
        }
        Ok(())
    }

    fn word_symbol(&self, text: &str, operation: &str) -> Result<Symbol> {
        let sym = parse_symbol(text)?;
        if sym.is_bit() {
            return Err(McError::invalid_symbol(format!(
                "{} is a bit device; {} needs a word device",
                sym, operation
            )));
        }
        Ok(sym)
    }

    fn bit_symbol(&self, text: &str, operation: &str) -> Result<Symbol> {
        let sym = parse_symbol(text)?;
        if !sym.is_bit() {
            return Err(McError::invalid_symbol(format!(
                "{} is a word device; {} needs a bit device",
                sym, operation
            )));
        }
        Ok(sym)
    }

    fn check_range(&self, sym: &Symbol, count: usize) -> Result<()> {
        match self.config.limit_policy {
            LimitPolicy::Permissive => self.profile.validate(sym.device, sym.index, count),
            LimitPolicy::Strict => self.profile.validate_strict(sym.device, sym.index, count),
        }
    }

    fn exchange(&mut self, frame: &[u8]) -> Result<Vec<u8>> {
        trace!(request = %String::from_utf8_lossy(frame), raw = ?frame, "request frame");
        self.transport.send(frame)?;
        let response = self.transport.receive(MAX_FRAME_SIZE)?;
        trace!(raw = ?response, "response frame");
        Ok(response)
    }
}

fn first<V>(values: Vec<V>) -> Result<V> {
    values
        .into_iter()
        .next()
        .ok_or_else(|| McError::invalid_response("response carried no values"))
}

impl<T: Transport + std::fmt::Debug> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("transport", &self.transport)
            .field("cpu", &self.config.cpu)
            .field("encoding", &self.config.encoding)
            .field("read_only", &self.config.read_only)
            .finish()
    }
}
