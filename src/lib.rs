//! rechunkrs
//!
//! Fixed-size re-chunking of byte buffers with minimal copying.
//!
//! `rechunkrs` turns buffers of arbitrary, inconsistent sizes into chunks of
//! exactly one size (the last chunk may be shorter). It is a small, composable
//! primitive for:
//!
//! - multipart and block uploads
//! - fixed-size framing of network or file streams
//! - feeding block-oriented codecs and storage
//!
//! Sources come in three shapes:
//!
//! - one buffer: [`split_buffer`]
//! - an iterator of buffers: [`rechunk`]
//! - a stream of buffers: [`rechunk_async`] (feature = "async")
//!
//! Chunks lying inside a single input buffer are zero-copy slices of it. The
//! rest go through one carry buffer of at most one chunk, so the cost stays
//! linear however many tiny buffers are fed in.
//!
//! The crate intentionally:
//! - does NOT look at, hash or transform chunk contents
//! - does NOT manage concurrency
//! - does NOT do flow control beyond what the source already does
//!
//! # Sync
//!
//! ```
//! use rechunkrs::{rechunk, RechunkError};
//!
//! fn main() -> Result<(), RechunkError> {
//!     let units = vec![vec![0u8; 1000], vec![0u8; 2000]];
//!
//!     for chunk in rechunk(units, 500)? {
//!         let chunk = chunk?;
//!         assert_eq!(chunk.len(), 500);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async")
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use rechunkrs::rechunk_async;
//!
//! async fn demo<S>(body: S) -> Result<(), rechunkrs::RechunkError>
//! where
//!     S: futures_core::Stream<Item = bytes::Bytes> + Unpin,
//! {
//!     let mut chunks = rechunk_async(body, 64 * 1024);
//!
//!     while let Some(chunk) = chunks.next().await {
//!         let chunk = chunk?;
//!         println!("chunk {}", chunk.len());
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chunker;
mod config;
mod error;
mod view;

mod util; // internal helpers

#[cfg(feature = "async")]
mod async_stream;

//
// Public surface (intentionally tiny)
//

pub use chunker::{Rechunk, Rechunker, SplitBuffer, rechunk, split_buffer};
pub use config::{ChunkSize, DEFAULT_CHUNK_SIZE, IntoChunkSize, MAX_SAFE_INTEGER};
pub use error::RechunkError;
pub use view::{BinaryView, TypedView};

#[cfg(feature = "async")]
pub use async_stream::{
    RechunkStream, TryRechunkStream, rechunk_async, rechunk_async_iter, try_rechunk_async,
};
