//! Carry-buffer re-chunking engine.
//!
//! [`Rechunker`] is the state machine shared by the synchronous iterator and
//! the asynchronous stream. It is also usable directly, push style:
//!
//! - `push()` - Feed one input unit of any size, get back the complete chunks
//! - `finish()` - Flush the short remainder when the input ends
//!
//! # Example
//!
//! ```
//! use rechunkrs::Rechunker;
//! use bytes::Bytes;
//!
//! let mut rechunker = Rechunker::new(4)?;
//!
//! let first = rechunker.push(Bytes::from_static(b"abcdef"))?;
//! let second = rechunker.push(Bytes::from_static(b"gh"))?;
//! let last = rechunker.finish();
//!
//! assert_eq!(first, vec![Bytes::from_static(b"abcd")]);
//! assert_eq!(second, vec![Bytes::from_static(b"efgh")]);
//! assert_eq!(last, None);
//! # Ok::<(), rechunkrs::RechunkError>(())
//! ```

use bytes::Bytes;

use crate::config::{ChunkSize, IntoChunkSize};
use crate::error::RechunkError;
use crate::view::BinaryView;

/// Largest carry buffer reserved up front. For bigger chunk sizes the carry
/// starts at this size and is grown once, to exactly one chunk, when the held
/// bytes outgrow it.
const EAGER_CARRY_LIMIT: usize = 16 * 1024 * 1024;

/// A re-chunker that turns input units of arbitrary sizes into chunks of one
/// fixed size.
///
/// # Copying
///
/// Whenever a whole chunk lies inside one input unit, the chunk is a zero-copy
/// slice of that unit and shares its allocation. Bytes are copied only when a
/// chunk straddles units:
///
/// - a unit's short tail is copied once into the carry buffer,
/// - a chunk completed from the carry buffer is copied once into a fresh buffer.
///
/// No byte is copied twice, so the total work stays linear in the input size
/// however many tiny units are fed in.
///
/// # Memory
///
/// The carry buffer holds at most `chunk_size - 1` bytes and its capacity never
/// exceeds `chunk_size`. It is allocated the first time a remainder has to be
/// kept, with room for one whole chunk, and then reused in place until the
/// re-chunker is finished or dropped.
#[derive(Debug)]
pub struct Rechunker {
    chunk_size: ChunkSize,
    carry: Vec<u8>,
    /// Unread tail of the unit currently being sliced.
    unit: Bytes,
}

impl Rechunker {
    /// Creates a re-chunker emitting chunks of `chunk_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RechunkError::InvalidArgument`] if `chunk_size` is not a
    /// positive integer within [`MAX_SAFE_INTEGER`](crate::MAX_SAFE_INTEGER).
    ///
    /// # Example
    ///
    /// ```
    /// use rechunkrs::Rechunker;
    ///
    /// assert!(Rechunker::new(65536).is_ok());
    /// assert!(Rechunker::new(0).is_err());
    /// assert!(Rechunker::new(1.5).is_err());
    /// ```
    pub fn new(chunk_size: impl IntoChunkSize) -> Result<Self, RechunkError> {
        Ok(Self::with_chunk_size(chunk_size.into_chunk_size()?))
    }

    /// Creates a re-chunker from an already validated size.
    pub fn with_chunk_size(chunk_size: ChunkSize) -> Self {
        Self {
            chunk_size,
            carry: Vec::new(),
            unit: Bytes::new(),
        }
    }

    /// Starts processing a new input unit.
    ///
    /// Returns the chunk completed from the carry buffer, if the unit brought
    /// enough bytes to complete one. The rest of the unit is then available
    /// through [`next_chunk`](Self::next_chunk).
    ///
    /// Must only be called once `next_chunk` has returned `None` for the
    /// previous unit.
    pub(crate) fn feed(&mut self, unit: Bytes) -> Option<Bytes> {
        debug_assert!(self.unit.is_empty(), "previous unit not drained");

        if unit.is_empty() {
            return None;
        }

        if self.carry.is_empty() {
            self.unit = unit;
            return None;
        }

        let needed = self.chunk_size.get() - self.carry.len();
        if unit.len() < needed {
            // Still short of a full chunk; keep accumulating.
            self.stash(&unit);
            return None;
        }

        let merged = crate::util::merge_carry(&self.carry, &unit[..needed]);
        self.carry.clear();
        self.unit = unit.slice(needed..);
        Some(merged)
    }

    /// Returns the next full chunk sliced from the current unit.
    ///
    /// When fewer than `chunk_size` bytes are left, they are moved to the carry
    /// buffer and `None` is returned: the caller should feed the next unit.
    pub(crate) fn next_chunk(&mut self) -> Option<Bytes> {
        let size = self.chunk_size.get();
        if self.unit.len() >= size {
            return Some(self.unit.split_to(size));
        }

        if !self.unit.is_empty() {
            // The carry was drained in `feed` before we got here, so the
            // remainder always starts at offset 0.
            debug_assert!(self.carry.is_empty());
            let tail = std::mem::take(&mut self.unit);
            self.stash(&tail);
        }

        None
    }

    /// Appends bytes to the carry buffer, which must stay below one chunk.
    ///
    /// Capacity is reserved exactly: lazily on first use, then at most once
    /// more up to `chunk_size`, so carried bytes are never moved by amortized
    /// growth.
    fn stash(&mut self, bytes: &[u8]) {
        let size = self.chunk_size.get();
        debug_assert!(self.carry.len() + bytes.len() < size);

        if self.carry.capacity() == 0 {
            self.carry.reserve_exact(size.min(EAGER_CARRY_LIMIT));
        }
        if self.carry.capacity() - self.carry.len() < bytes.len() {
            log::trace!("rechunk: growing carry buffer to {} bytes", size);
            self.carry.reserve_exact(size - self.carry.len());
        }
        self.carry.extend_from_slice(bytes);
    }

    /// Pushes one input unit and returns every chunk it completes.
    ///
    /// Bytes that do not fill a whole chunk stay in the carry buffer until the
    /// next push or [`finish`](Self::finish).
    ///
    /// # Errors
    ///
    /// Returns [`RechunkError::InvalidArgument`] if `unit` is not a recognized
    /// binary view. The re-chunker state is left untouched in that case.
    ///
    /// # Example
    ///
    /// ```
    /// use rechunkrs::Rechunker;
    ///
    /// let mut rechunker = Rechunker::new(500)?;
    /// let chunks = rechunker.push(vec![0u8; 1200])?;
    ///
    /// assert_eq!(chunks.len(), 2);
    /// assert_eq!(rechunker.pending_len(), 200);
    /// # Ok::<(), rechunkrs::RechunkError>(())
    /// ```
    pub fn push(&mut self, unit: impl BinaryView) -> Result<Vec<Bytes>, RechunkError> {
        let unit = unit
            .into_byte_view()
            .map_err(|_| RechunkError::input_not_a_view())?;

        let mut chunks = Vec::with_capacity(unit.len() / self.chunk_size.get() + 1);
        chunks.extend(self.feed(unit));
        while let Some(chunk) = self.next_chunk() {
            chunks.push(chunk);
        }
        Ok(chunks)
    }

    /// Finalizes the input and returns the short trailing chunk, if any.
    ///
    /// The carry buffer is handed over as the chunk without copying. Returns
    /// `None` when the total input was empty or an exact multiple of the chunk
    /// size. The re-chunker can be reused afterwards.
    pub fn finish(&mut self) -> Option<Bytes> {
        debug_assert!(self.unit.is_empty(), "current unit not drained");

        if self.carry.is_empty() {
            return None;
        }

        log::trace!(
            "rechunk: flushing {} carried bytes as final chunk",
            self.carry.len()
        );
        Some(Bytes::from(std::mem::take(&mut self.carry)))
    }

    /// Drops any pending bytes so the re-chunker can start a new input.
    pub fn reset(&mut self) {
        self.carry.clear();
        self.unit = Bytes::new();
    }

    /// Returns the number of bytes taken in but not yet emitted.
    pub fn pending_len(&self) -> usize {
        self.carry.len() + self.unit.len()
    }

    /// Returns the target chunk size.
    pub fn chunk_size(&self) -> ChunkSize {
        self.chunk_size
    }
}
