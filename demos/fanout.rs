//! In-memory fan-out walkthrough
//!
//! Run with: cargo run --example fanout
//!
//! This example demonstrates:
//! - Wiring three `MemoryStream`s into a `Router`
//! - The application side of a stream: `send` puts bytes on the wire,
//!   `recv` picks up what the router delivered
//! - Draining the bounded error channel from a background task
//! - Per-endpoint statistics and an orderly shutdown
//!
//! # Architecture
//!
//! ```text
//!   alice.send("...")          +--------------+
//!        │                     │    Router    │
//!        └──── read loop ─────>│              │
//!                              │   fan-out    │
//!                              +──────┬───────+
//!                        deliver      │      deliver
//!                  bob.recv() <───────┴───────> carol.recv()
//! ```
//!
//! The sender never hears its own chunk back: fan-out skips the source
//! endpoint, so `alice.recv()` stays empty after alice speaks.

use std::sync::Arc;
use std::time::Duration;

use bytehub::{CancelToken, Endpoint, MemoryStream, ReadOutcome, Router};

/// Poll `recv` until a chunk arrives or the attempt limit runs out.
///
/// `recv` never blocks; between empty polls we sleep briefly so the
/// router's read loops get scheduled.
async fn recv_chunk(stream: &MemoryStream) -> Option<Vec<u8>> {
    let mut buf = [0u8; 256];
    for _ in 0..500 {
        match stream.recv(&mut buf) {
            Ok(ReadOutcome::Data(0)) => tokio::time::sleep(Duration::from_millis(2)).await,
            Ok(ReadOutcome::Data(count)) => return Some(buf[..count].to_vec()),
            Ok(ReadOutcome::Eof) | Err(_) => return None,
        }
    }
    None
}

fn show(name: &str, chunk: Option<Vec<u8>>) {
    match chunk {
        Some(bytes) => println!("  {} received: {:?}", name, String::from_utf8_lossy(&bytes)),
        None => println!("  {} received nothing", name),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bytehub=debug".parse()?)
                .add_directive("fanout=debug".parse()?),
        )
        .init();

    let scope = CancelToken::new();
    let alice = Arc::new(MemoryStream::new());
    let bob = Arc::new(MemoryStream::new());
    let carol = Arc::new(MemoryStream::new());

    let (mut router, mut errors) = Router::new(
        &scope,
        vec![
            alice.clone() as Arc<dyn Endpoint>,
            bob.clone(),
            carol.clone(),
        ],
    );

    // Routing errors arrive on a bounded channel; drain it in the
    // background so a burst of failures cannot stall the read loops.
    let drain = tokio::spawn(async move {
        while let Some(err) = errors.recv().await {
            tracing::warn!(endpoint = err.endpoint(), error = %err, "Routing error");
        }
    });

    println!("=== alice speaks ===");
    alice.send(b"hello from alice")?;
    show("bob", recv_chunk(&bob).await);
    show("carol", recv_chunk(&carol).await);
    println!("  alice has {} bytes waiting (her own chunk is not echoed)", alice.pending_recv());
    println!();

    println!("=== bob replies ===");
    bob.send(b"hi alice!")?;
    show("alice", recv_chunk(&alice).await);
    show("carol", recv_chunk(&carol).await);
    println!();

    let stats = router.stats();
    println!("=== statistics ===");
    for (index, endpoint) in stats.endpoints.iter().enumerate() {
        println!(
            "  endpoint {}: {} chunks in, {} bytes in, {} bytes out, {} errors",
            index, endpoint.chunks_in, endpoint.bytes_in, endpoint.bytes_out, endpoint.errors,
        );
    }
    println!(
        "  totals: {} bytes in, {} bytes out",
        stats.total_bytes_in(),
        stats.total_bytes_out(),
    );
    println!();

    router.close().await?;
    router.join().await;
    drain.await?;
    println!("Router closed, all read loops finished.");

    Ok(())
}
