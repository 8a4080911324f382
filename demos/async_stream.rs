//! Async stream re-chunking example.
//!
//! A producer task sends buffers of uneven sizes with delays, the way a
//! network body arrives; the consumer gets fixed-size chunks.
//!
//! Run with:
//!     cargo run --example async_stream

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use rechunkrs::rechunk_async;
use tokio::sync::mpsc;

/// Adapts a channel receiver into a stream of buffers.
struct Body(mpsc::Receiver<Bytes>);

impl Stream for Body {
    type Item = Bytes;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Bytes>> {
        self.0.poll_recv(cx)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::channel(4);

    tokio::spawn(async move {
        for i in 0..50u32 {
            // Simulate async delay (e.g., waiting for network data)
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
            let len = 1000 + (i as usize * 7919) % 9000;
            if tx.send(Bytes::from(vec![i as u8; len])).await.is_err() {
                break;
            }
        }
    });

    let mut chunks = rechunk_async(Body(rx), 32 * 1024);
    let mut total_chunks = 0;
    let mut total_bytes = 0;

    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        total_chunks += 1;
        total_bytes += chunk.len();
        println!("Chunk {}: len={}", total_chunks, chunk.len());
    }

    println!("\nTotal: {} chunks, {} bytes", total_chunks, total_bytes);
    Ok(())
}
