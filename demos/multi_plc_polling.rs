//! Example: Polling several PLCs
//!
//! Run with: cargo run --example multi_plc_polling
//!
//! Each PLC gets its own client on its own thread; the library itself has
//! no shared state between clients.

use std::thread;
use std::time::Duration;

use fx3_mcprotocol::utils::format_bits;
use fx3_mcprotocol::{Client, ClientConfig, CpuModel, Encoding};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const PLCS: [(&str, &str); 4] = [
    ("PLC_1", "192.168.4.2"),
    ("PLC_2", "192.168.4.3"),
    ("PLC_3", "192.168.4.4"),
    ("PLC_4", "192.168.4.5"),
];

const POLL_INTERVAL: Duration = Duration::from_secs(1);
const POLL_CYCLES: usize = 10;

fn poll(name: &'static str, host: &'static str) -> fx3_mcprotocol::Result<()> {
    let config = ClientConfig::new(host)
        .with_cpu(CpuModel::FX3U)
        .with_encoding(Encoding::Ascii)
        .with_read_only(true);
    let mut plc = Client::new(config)?;
    plc.connect()?;

    for _ in 0..POLL_CYCLES {
        let d100 = plc.read_regs("D100", 3)?;
        let m0 = plc.read_bits("M0", 8)?;
        info!(plc = name, ?d100, m0_m7 = %format_bits(&m0), "poll");
        thread::sleep(POLL_INTERVAL);
    }

    plc.close();
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== MULTI-PLC POLLING STARTED ===");

    let handles: Vec<_> = PLCS
        .iter()
        .map(|&(name, host)| (name, thread::spawn(move || poll(name, host))))
        .collect();

    for (name, handle) in handles {
        match handle.join() {
            Ok(Ok(())) => info!(plc = name, "polling finished"),
            Ok(Err(e)) => warn!(plc = name, error = %e, "polling stopped"),
            Err(_) => warn!(plc = name, "polling thread panicked"),
        }
    }
}
