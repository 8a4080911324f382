//! Synchronous re-chunking over an iterator of input units.
//!
//! [`rechunk`] validates the chunk size up front and returns [`Rechunk`], a
//! lazy iterator that pulls one unit at a time from its source and yields
//! fixed-size chunks.
//!
//! # Example
//!
//! ```
//! use rechunkrs::rechunk;
//!
//! let units = vec![vec![0u8; 100], vec![1u8; 800], vec![2u8; 150]];
//! let lengths = rechunk(units, 500)?
//!     .map(|chunk| chunk.map(|c| c.len()))
//!     .collect::<Result<Vec<_>, _>>()?;
//!
//! assert_eq!(lengths, vec![500, 500, 50]);
//! # Ok::<(), rechunkrs::RechunkError>(())
//! ```

use std::iter::FusedIterator;

use bytes::Bytes;

use super::Rechunker;
use crate::config::IntoChunkSize;
use crate::error::RechunkError;
use crate::view::BinaryView;

/// An iterator that re-chunks the units of another iterator.
///
/// Yields `Ok(chunk)` for every chunk. If the source yields something that is
/// not a recognized binary view, one `Err` is yielded and the iterator ends:
/// the source is not pulled again and pending bytes are discarded.
///
/// Dropping the iterator early stops pulling from the source.
#[derive(Debug)]
pub struct Rechunk<I> {
    source: I,
    engine: Rechunker,
    /// Number of units pulled so far, used to name a rejected item.
    pulled: u64,
    finished: bool,
}

impl<I> Rechunk<I> {
    fn new(source: I, engine: Rechunker) -> Self {
        Self {
            source,
            engine,
            pulled: 0,
            finished: false,
        }
    }

    /// Returns the number of bytes waiting for more input.
    pub fn pending_len(&self) -> usize {
        self.engine.pending_len()
    }

    /// Consumes the iterator, returning the source.
    pub fn into_inner(self) -> I {
        self.source
    }
}

impl<I> Iterator for Rechunk<I>
where
    I: Iterator,
    I::Item: BinaryView,
{
    type Item = Result<Bytes, RechunkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            if let Some(chunk) = self.engine.next_chunk() {
                return Some(Ok(chunk));
            }

            let Some(unit) = self.source.next() else {
                self.finished = true;
                return self.engine.finish().map(Ok);
            };

            let index = self.pulled;
            self.pulled += 1;

            match unit.into_byte_view() {
                Ok(unit) => {
                    if let Some(merged) = self.engine.feed(unit) {
                        return Some(Ok(merged));
                    }
                }
                Err(_) => {
                    log::debug!("rechunk: item {} is not a binary view, aborting", index);
                    self.finished = true;
                    self.engine.reset();
                    return Some(Err(RechunkError::item_not_a_view(index)));
                }
            }
        }
    }
}

impl<I> FusedIterator for Rechunk<I>
where
    I: Iterator,
    I::Item: BinaryView,
{
}

/// Re-chunks a sequence of input units into chunks of `chunk_size` bytes.
///
/// The source is pulled lazily, one unit at a time. Chunks lying entirely
/// inside one unit are zero-copy slices of it; others are assembled through a
/// single carry buffer.
///
/// # Errors
///
/// Returns [`RechunkError::InvalidArgument`] right away if `chunk_size` is not
/// a positive safe integer. Unrecognized items are reported later, by the
/// iterator, when they are reached.
pub fn rechunk<I>(
    source: I,
    chunk_size: impl IntoChunkSize,
) -> Result<Rechunk<I::IntoIter>, RechunkError>
where
    I: IntoIterator,
    I::Item: BinaryView,
{
    let engine = Rechunker::new(chunk_size)?;
    log::trace!("rechunk: sync source, {}", engine.chunk_size());
    Ok(Rechunk::new(source.into_iter(), engine))
}
