//! TCP party line
//!
//! Run with: cargo run --example party_line -- [BIND_ADDR] [CLIENTS]
//!
//! Examples:
//!   cargo run --example party_line                      # 127.0.0.1:4000, 2 clients
//!   cargo run --example party_line 0.0.0.0:4100         # 0.0.0.0:4100, 2 clients
//!   cargo run --example party_line localhost:4000 3     # wait for 3 clients
//!
//! Waits for CLIENTS connections, then routes every byte each client
//! sends to all the others. Try it with netcat in separate terminals:
//!
//!   nc 127.0.0.1 4000
//!
//! A client that hangs up leaves the line silently; bytes fanned out to
//! it afterwards show up on the error channel and are logged. The line
//! stays open until every participant hangs up or you press Ctrl+C.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use bytehub::{CancelToken, Endpoint, Router, TcpEndpoint};

/// Parse bind address from command line argument.
///
/// Accepts formats:
/// - "localhost" -> 127.0.0.1:4000
/// - "localhost:4100" -> 127.0.0.1:4100
/// - "0.0.0.0:4000" -> 0.0.0.0:4000
fn parse_bind_addr(arg: &str) -> Result<SocketAddr, String> {
    const DEFAULT_PORT: u16 = 4000;

    let normalized = arg.replace("localhost", "127.0.0.1");

    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn parse_client_count(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(count) if count >= 2 => Ok(count),
        Ok(_) => Err("A party line needs at least two participants".to_string()),
        Err(_) => Err(format!("Invalid client count: '{}'", arg)),
    }
}

fn print_usage() {
    eprintln!("Usage: party_line [BIND_ADDR] [CLIENTS]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  BIND_ADDR    Address to listen on (default: 127.0.0.1:4000)");
    eprintln!("  CLIENTS      Connections to wait for before routing (default: 2)");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let bind_addr = match args.get(1) {
        Some(arg) => match parse_bind_addr(arg) {
            Ok(addr) => addr,
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        },
        None => "127.0.0.1:4000".parse()?,
    };

    let client_count = match args.get(2) {
        Some(arg) => match parse_client_count(arg) {
            Ok(count) => count,
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        },
        None => 2,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bytehub=debug".parse()?)
                .add_directive("party_line=info".parse()?),
        )
        .init();

    let listener = TcpListener::bind(bind_addr).await?;
    println!("Party line listening on {}", bind_addr);
    println!(
        "Waiting for {} clients... (connect with: nc {} {})",
        client_count,
        bind_addr.ip(),
        bind_addr.port(),
    );

    let mut endpoints: Vec<Arc<dyn Endpoint>> = Vec::with_capacity(client_count);
    while endpoints.len() < client_count {
        let (stream, peer) = listener.accept().await?;
        println!("  [{}/{}] {} joined", endpoints.len() + 1, client_count, peer);
        endpoints.push(Arc::new(TcpEndpoint::new(stream)));
    }

    let scope = CancelToken::new();
    let (mut router, mut errors) = Router::new(&scope, endpoints);
    println!("Routing. Press Ctrl+C to hang up everyone.");

    // Drain errors until the channel closes, which happens once every
    // read loop has exited. Ctrl+C closes the endpoints; the loops then
    // run out at the next EOF and the drain ends on its own.
    let mut shutdown_requested = false;
    loop {
        tokio::select! {
            maybe = errors.recv() => match maybe {
                Some(err) => {
                    tracing::warn!(endpoint = err.endpoint(), error = %err, "Routing error");
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c(), if !shutdown_requested => {
                println!("\nHanging up...");
                shutdown_requested = true;
                if let Err(err) = router.close().await {
                    tracing::warn!(error = %err, "Close reported a failure");
                }
            }
        }
    }
    router.join().await;

    let stats = router.stats();
    println!(
        "Line closed: {} bytes in, {} bytes out across {} endpoints.",
        stats.total_bytes_in(),
        stats.total_bytes_out(),
        router.endpoint_count(),
    );

    Ok(())
}
