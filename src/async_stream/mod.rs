//! Async re-chunking support.
//!
//! This module re-chunks a `futures_core::Stream` of input units, making it
//! runtime-agnostic and compatible with tokio, async-std, smol, and other
//! async runtimes.
//!
//! - [`rechunk_async`] - Re-chunks a stream of input units
//! - [`rechunk_async_iter`] - Re-chunks a plain iterator as a stream
//! - [`try_rechunk_async`] - Re-chunks a stream of `Result`s, passing errors through
//!
//! This module requires the `async` feature to be enabled.

mod stream;

pub use stream::{
    RechunkStream, TryRechunkStream, rechunk_async, rechunk_async_iter, try_rechunk_async,
};
