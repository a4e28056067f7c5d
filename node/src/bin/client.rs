//! Query-user executable: drives one PPRC session against the aggregator.
//!
//! Builds the encrypted range query, sends it, and turns the blinded,
//! shuffled sketch that comes back into a cardinality estimate.

use std::net::TcpStream;
use std::process;
use std::time::Instant;

use pprc::client::{build_query, recover_estimate};
use pprc::she::SecretKey;
use pprc::wire::{read_frame, write_frame};
use tracing::{error, info};

/// The demo query rectangle, matching the reference workload.
const RANGE_X: std::ops::Range<i32> = 0..100;
const RANGE_Y: std::ops::Range<i32> = 0..100;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <server_ip> <port>", args[0]);
        process::exit(1);
    }

    if let Err(e) = run(&args[1], &args[2]) {
        error!("session failed: {e}");
        process::exit(1);
    }
}

fn run(host: &str, port: &str) -> Result<(), Box<dyn std::error::Error>> {
    let started = Instant::now();

    // The key is validated against the protocol's noise budget on
    // construction; a bad key never reaches the wire.
    let key = SecretKey::reference();
    let mut rng = rand::rng();

    let mut socket = TcpStream::connect((host, port.parse::<u16>()?))?;
    info!("connected to aggregator at {host}:{port}");

    let query = build_query(RANGE_X, RANGE_Y, &key, &mut rng);
    info!("sending encrypted query ({} ciphertexts)", query.len());
    write_frame(&mut socket, &query)?;

    let response = read_frame(&mut socket)?;
    info!("received {} sketch buckets", response.len());

    let estimate = recover_estimate(&key, &response);
    info!("estimated range count: {estimate}");
    info!("session time: {:.3}s", started.elapsed().as_secs_f64());
    Ok(())
}
