//! # FX3 MC Protocol Library
//!
//! A Rust library for reading and writing Mitsubishi FX3-series PLC memory
//! over the MC protocol exposed by the FX3U-ENET-ADP Ethernet adapter.
//!
//! This is a **protocol-only** library: no polling, schedulers, or
//! application-level features. Each call produces exactly 1 request and 1
//! response. No automatic retries, caching, or reconnection.
//!
//! ## Features
//!
//! - **Symbol addressing** — `"D100"`, `"M8000"`, case-insensitive
//! - **CPU profiles** — FX3S, FX3G, FX3GC, FX3U address limits checked before sending
//! - **Two encodings** — ASCII (read/write, words and bits) and binary (word reads)
//! - **Read-only mode** — writes rejected before any network activity
//! - **No panics** — all errors returned as `Result<T, McError>`
//!
//! ## Quick Start
//!
//! ```no_run
//! use fx3_mcprotocol::{Client, ClientConfig, CpuModel};
//!
//! fn main() -> fx3_mcprotocol::Result<()> {
//!     let config = ClientConfig::new("192.168.4.2")
//!         .with_cpu(CpuModel::FX3U)
//!         .with_read_only(true);
//!     let mut plc = Client::new(config)?;
//!     plc.connect()?;
//!
//!     // Read D100-D102
//!     let regs = plc.read_regs("D100", 3)?;
//!     println!("D100-D102 = {:?}", regs);
//!
//!     // Read the RUN monitor bit
//!     let running = plc.read_bit("M8000")?;
//!     println!("M8000 = {}", running);
//!
//!     plc.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Devices
//!
//! | Device | Kind | ASCII / binary device code |
//! |--------|:----:|:--------------------------:|
//! | D  | word | `4420` |
//! | R  | word | `5220` |
//! | M  | bit  | `4D20` |
//! | X  | bit  | `5820` |
//! | Y  | bit  | `5920` |
//! | TN, TS, CN, CS | word | none |
//!
//! Word operations on bit devices (and the reverse) fail before any I/O.
//!
//! ## Error Handling
//!
//! ```no_run
//! use fx3_mcprotocol::{Client, ClientConfig, McError};
//!
//! let mut plc = Client::new(ClientConfig::new("192.168.4.2"))?;
//! plc.connect()?;
//!
//! match plc.read_regs("D100", 10) {
//!     Ok(data) => println!("Data: {:?}", data),
//!     Err(e) if e.is_timeout() => println!("Communication timeout"),
//!     Err(McError::PlcError { code }) => println!("PLC error: 0x{:02X}", code),
//!     Err(McError::OutOfRange { max, .. }) => println!("Address beyond {}", max),
//!     Err(e) => println!("Error: {}", e),
//! }
//! # Ok::<(), McError>(())
//! ```

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod ascii;
mod binary;
mod client;
mod codec;
mod device;
mod error;
mod profile;
mod symbol;
mod transport;
pub mod utils;

// Public re-exports
pub use ascii::{swap_word_halves, AsciiCodec, MAX_ASCII_POINTS};
pub use binary::{BinaryCodec, BINARY_REQUEST_SIZE};
pub use client::{Client, ClientConfig};
pub use codec::{Codec, Encoding};
pub use device::Device;
pub use error::{McError, Result};
pub use profile::{CpuModel, DeviceProfile, LimitPolicy};
pub use symbol::{parse_symbol, Symbol};
pub use transport::{TcpTransport, Transport, DEFAULT_MC_PORT, DEFAULT_TIMEOUT, MAX_FRAME_SIZE};
