//! Re-chunking engine and its synchronous front ends.
//!
//! - [`Rechunker`] - Carry-buffer engine with `push()`/`finish()` API
//! - [`rechunk`] / [`Rechunk`] - Iterator over a sequence of input units
//! - [`split_buffer`] / [`SplitBuffer`] - Zero-copy splitting of one buffer

mod engine;
mod iter;
mod split;

pub use engine::Rechunker;
pub use iter::{Rechunk, rechunk};
pub use split::{SplitBuffer, split_buffer};
