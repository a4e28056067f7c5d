//! Aggregator executable: relays the encrypted query to the data holder,
//! then sums, blinds, and shuffles the returned sketches for the client.
//!
//! Holds no cryptographic state beyond the ciphertexts in flight.

use std::net::{TcpListener, TcpStream};
use std::process;

use pprc::aggregate::{blind_and_shuffle, combine_provider_sketches};
use pprc::params::PROVIDERS_PER_HOLDER;
use pprc::wire::{read_frame, write_frame};
use tracing::{error, info};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        eprintln!(
            "Usage: {} <listen_port> <holder_ip> <holder_port>",
            args[0]
        );
        process::exit(1);
    }

    if let Err(e) = run(&args[1], &args[2], &args[3]) {
        error!("session failed: {e}");
        process::exit(1);
    }
}

fn run(listen_port: &str, holder_ip: &str, holder_port: &str) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(("0.0.0.0", listen_port.parse::<u16>()?))?;
    info!("listening for the client on port {listen_port}");
    let (mut client_socket, peer) = listener.accept()?;
    info!("client connected from {peer}");

    let mut holder_socket = TcpStream::connect((holder_ip, holder_port.parse::<u16>()?))?;
    info!("connected to data holder at {holder_ip}:{holder_port}");

    let query = read_frame(&mut client_socket)?;
    info!("received query ({} ciphertexts), forwarding", query.len());
    write_frame(&mut holder_socket, &query)?;

    let flat = read_frame(&mut holder_socket)?;
    info!("received {} sketch ciphertexts from the holder", flat.len());

    let mut aggregated = combine_provider_sketches(&flat, PROVIDERS_PER_HOLDER)?;
    let mut rng = rand::rng();
    blind_and_shuffle(&mut aggregated, &mut rng);
    info!(
        "aggregated, blinded, and shuffled {} buckets",
        aggregated.len()
    );

    write_frame(&mut client_socket, &aggregated)?;
    info!("response sent to client");
    Ok(())
}
