//! Basic synchronous re-chunking example.
//!
//! Run with:
//!     cargo run --example sync_basic

use bytes::Bytes;
use rechunkrs::{Rechunker, rechunk};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Simulate reads of uneven sizes, as a socket would deliver them
    let reads: Vec<Bytes> = [1500usize, 9000, 20, 64 * 1024, 3, 70_000]
        .iter()
        .enumerate()
        .map(|(i, &len)| Bytes::from(vec![i as u8; len]))
        .collect();
    let total: usize = reads.iter().map(|r| r.len()).sum();

    println!("Re-chunking {} bytes from {} reads...\n", total, reads.len());

    let mut total_chunks = 0;
    for chunk in rechunk(reads.clone(), 16 * 1024)? {
        let chunk = chunk?;
        total_chunks += 1;
        println!("Chunk {}: len={}", total_chunks, chunk.len());
    }

    // Same thing, push style
    let mut rechunker = Rechunker::new(16 * 1024)?;
    let mut pushed = 0;
    for read in reads {
        pushed += rechunker.push(read)?.len();
    }
    if let Some(last) = rechunker.finish() {
        pushed += 1;
        println!("\nFinal short chunk: {} bytes", last.len());
    }

    println!("\nTotal: {} chunks (push API: {})", total_chunks, pushed);
    Ok(())
}
