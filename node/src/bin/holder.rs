//! Data-holder executable: serves one encrypted range query over its
//! local dataset, simulating several providers in one process.

use std::net::TcpListener;
use std::process;
use std::time::Instant;

use pprc::holder::DataHolder;
use pprc::params::{PROVIDERS_PER_HOLDER, SKETCH_LEN};
use pprc::protocol::QueryPayload;
use pprc::wire::{read_frame, write_frame};
use tracing::{error, info};

/// Synthetic dataset size per simulated provider.
const RECORDS_PER_PROVIDER: usize = 2190;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <listen_port>", args[0]);
        process::exit(1);
    }

    if let Err(e) = run(&args[1]) {
        error!("session failed: {e}");
        process::exit(1);
    }
}

fn run(listen_port: &str) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(("0.0.0.0", listen_port.parse::<u16>()?))?;
    info!("data holder listening on port {listen_port}");
    let (mut socket, peer) = listener.accept()?;
    info!("aggregator connected from {peer}");

    let holder = DataHolder::synthetic(RECORDS_PER_PROVIDER, PROVIDERS_PER_HOLDER, SKETCH_LEN);
    info!(
        "loaded {} records across {} providers",
        holder.len(),
        holder.providers()
    );

    let query = QueryPayload::from_vec(read_frame(&mut socket)?)?;
    info!(
        "received encrypted query (filter length {})",
        query.filter_len()
    );

    let started = Instant::now();
    let mut rng = rand::rng();
    let sketches = holder.respond(&query, &mut rng);
    info!(
        "evaluated {} records in {:.3}s",
        holder.len(),
        started.elapsed().as_secs_f64()
    );

    write_frame(&mut socket, &sketches)?;
    info!("sent {} sketch ciphertexts", sketches.len());
    Ok(())
}
