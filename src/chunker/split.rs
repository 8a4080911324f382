//! Single-buffer splitter.

use std::iter::FusedIterator;

use bytes::Bytes;

use crate::config::{ChunkSize, IntoChunkSize};
use crate::error::RechunkError;
use crate::view::BinaryView;

/// An iterator over fixed-size, zero-copy slices of one buffer.
///
/// Every item shares the buffer's allocation. All items are `chunk_size`
/// bytes long except possibly the last one. A clone continues from the same
/// position, independently of the original.
#[derive(Debug, Clone)]
pub struct SplitBuffer {
    source: Bytes,
    chunk_size: ChunkSize,
}

impl SplitBuffer {
    fn new(source: Bytes, chunk_size: ChunkSize) -> Self {
        Self { source, chunk_size }
    }

    /// Returns the bytes not yet yielded.
    pub fn remaining(&self) -> &Bytes {
        &self.source
    }
}

impl Iterator for SplitBuffer {
    type Item = Bytes;

    fn next(&mut self) -> Option<Self::Item> {
        if self.source.is_empty() {
            return None;
        }
        let n = self.chunk_size.get().min(self.source.len());
        Some(self.source.split_to(n))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.source.len().div_ceil(self.chunk_size.get());
        (n, Some(n))
    }
}

impl ExactSizeIterator for SplitBuffer {}

impl FusedIterator for SplitBuffer {}

/// Splits one buffer into zero-copy chunks of `chunk_size` bytes.
///
/// The buffer is reinterpreted as raw bytes whatever its element type. Each
/// call returns a fresh iterator starting at offset 0; an empty buffer yields
/// no chunks.
///
/// # Errors
///
/// Returns [`RechunkError::InvalidArgument`] if `view` is not a recognized
/// binary view, or else if `chunk_size` is not a positive safe integer. The
/// view is checked first.
///
/// # Example
///
/// ```
/// use rechunkrs::split_buffer;
///
/// let lengths: Vec<usize> = split_buffer(vec![0u8; 200_000], 65536)?
///     .map(|chunk| chunk.len())
///     .collect();
///
/// assert_eq!(lengths, vec![65536, 65536, 65536, 3392]);
/// # Ok::<(), rechunkrs::RechunkError>(())
/// ```
pub fn split_buffer(
    view: impl BinaryView,
    chunk_size: impl IntoChunkSize,
) -> Result<SplitBuffer, RechunkError> {
    let source = view
        .into_byte_view()
        .map_err(|_| RechunkError::input_not_a_view())?;
    let chunk_size = chunk_size.into_chunk_size()?;
    Ok(SplitBuffer::new(source, chunk_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lengths() {
        let chunks: Vec<_> = split_buffer(vec![0u8; 200_000], 65536).unwrap().collect();
        let lengths: Vec<_> = chunks.iter().map(|c| c.len()).collect();
        assert_eq!(lengths, vec![65536, 65536, 65536, 3392]);
    }

    #[test]
    fn test_split_empty() {
        assert_eq!(split_buffer(Bytes::new(), 4).unwrap().count(), 0);
    }

    #[test]
    fn test_split_is_zero_copy() {
        let data = Bytes::from((0u8..=255).collect::<Vec<_>>());
        let chunks: Vec<_> = split_buffer(data.clone(), 100).unwrap().collect();
        assert_eq!(chunks.len(), 3);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.as_ptr(), data[i * 100..].as_ptr());
        }
    }

    #[test]
    fn test_split_multi_byte_elements() {
        let data: Vec<u32> = vec![7; 10];
        let lengths: Vec<_> = split_buffer(data, 16).unwrap().map(|c| c.len()).collect();
        assert_eq!(lengths, vec![16, 16, 8]);
    }

    #[test]
    fn test_split_chunk_larger_than_input() {
        let chunks: Vec<_> = split_buffer(&b"abc"[..], 1024).unwrap().collect();
        assert_eq!(chunks, vec![Bytes::from_static(b"abc")]);
    }

    #[test]
    fn test_exact_size_hint() {
        let iter = split_buffer(vec![0u8; 10], 3).unwrap();
        assert_eq!(iter.len(), 4);
    }

    #[test]
    fn test_input_checked_before_chunk_size() {
        let view: Box<dyn std::any::Any + Send> = Box::new(());
        let err = split_buffer(view, 0).unwrap_err();
        assert_eq!(err.argument(), "input");

        let err = split_buffer(vec![0u8; 4], 0).unwrap_err();
        assert_eq!(err.argument(), "chunk_size");
    }
}
