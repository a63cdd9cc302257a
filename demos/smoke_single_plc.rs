//! Example: Smoke test against a single PLC
//!
//! Run with: cargo run --example smoke_single_plc -- 192.168.4.4
//!
//! This example demonstrates:
//! - Read-only client setup
//! - Batch and single register reads
//! - Bit reads
//! - Log output through `RUST_LOG=fx3_mcprotocol=debug`

use fx3_mcprotocol::utils::format_hex;
use fx3_mcprotocol::{Client, ClientConfig};
use tracing_subscriber::EnvFilter;

fn main() -> fx3_mcprotocol::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let host = std::env::args().nth(1).unwrap_or_else(|| "192.168.4.4".to_string());
    let cpu = std::env::args().nth(2).unwrap_or_else(|| "FX3U".to_string());
    let mode = std::env::args().nth(3).unwrap_or_else(|| "ascii".to_string());

    let config = ClientConfig::from_names(host, &cpu, &mode)?.with_read_only(true);
    let mut plc = Client::new(config)?;
    plc.connect()?;

    println!("=== SMOKE TEST : SINGLE PLC ===");

    println!("D500-D504 : {:?}", plc.read_regs("D500", 5)?);
    println!("D20-D24   : {:?}", plc.read_regs("D20", 5)?);

    let d100 = plc.read_reg("D100")?;
    println!("D100      : {} ({})", d100, format_hex(d100));

    if plc.codec().supports_bits() {
        println!("M0        : {}", plc.read_bit("M0")?);
        println!("M8000     : {}", plc.read_bit("M8000")?); // RUN monitor
    }

    plc.close();
    println!("=== SMOKE TEST PASSED ===");
    Ok(())
}
