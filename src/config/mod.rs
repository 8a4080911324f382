//! Chunk size configuration.
//!
//! - [`ChunkSize`] - A validated target chunk length
//! - [`IntoChunkSize`] - Conversions from the integer and float types callers
//!   tend to carry around
//!
//! # Example
//!
//! ```
//! use rechunkrs::{ChunkSize, IntoChunkSize};
//!
//! let size = 65536u64.into_chunk_size()?;
//! assert_eq!(size.get(), 65536);
//!
//! assert!(0usize.into_chunk_size().is_err());
//! assert!(1.5f64.into_chunk_size().is_err());
//! assert!(f64::NAN.into_chunk_size().is_err());
//! # Ok::<(), rechunkrs::RechunkError>(())
//! ```

use std::fmt;
use std::num::NonZeroUsize;

use crate::error::RechunkError;

/// Default chunk size (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Largest accepted chunk size, `2^53 - 1`.
///
/// Sizes above this cannot be represented exactly as an `f64`, so they are
/// rejected for every input type to keep the accepted range identical no
/// matter how the size was expressed.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// A validated chunk size: positive and at most [`MAX_SAFE_INTEGER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkSize(NonZeroUsize);

impl ChunkSize {
    /// Creates a chunk size.
    ///
    /// # Errors
    ///
    /// Returns [`RechunkError::InvalidArgument`] if `size` is zero or greater
    /// than [`MAX_SAFE_INTEGER`].
    pub fn new(size: usize) -> Result<Self, RechunkError> {
        if size as u64 > MAX_SAFE_INTEGER {
            return Err(RechunkError::chunk_size(size));
        }
        NonZeroUsize::new(size)
            .map(Self)
            .ok_or_else(|| RechunkError::chunk_size(size))
    }

    /// Returns the size in bytes.
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        Self(NonZeroUsize::new(DEFAULT_CHUNK_SIZE).unwrap_or(NonZeroUsize::MIN))
    }
}

impl fmt::Display for ChunkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes", self.0)
    }
}

impl From<ChunkSize> for usize {
    fn from(size: ChunkSize) -> usize {
        size.get()
    }
}

/// Conversion into a validated [`ChunkSize`].
///
/// Every entry point of this crate takes `impl IntoChunkSize`, so sizes read
/// from configuration files, CLI flags or foreign callers can be passed as they
/// are and get the same validation.
pub trait IntoChunkSize {
    /// Validates `self` as a chunk size.
    fn into_chunk_size(self) -> Result<ChunkSize, RechunkError>;
}

impl IntoChunkSize for ChunkSize {
    fn into_chunk_size(self) -> Result<ChunkSize, RechunkError> {
        Ok(self)
    }
}

impl IntoChunkSize for NonZeroUsize {
    fn into_chunk_size(self) -> Result<ChunkSize, RechunkError> {
        ChunkSize::new(self.get())
    }
}

impl IntoChunkSize for usize {
    fn into_chunk_size(self) -> Result<ChunkSize, RechunkError> {
        ChunkSize::new(self)
    }
}

impl IntoChunkSize for u32 {
    fn into_chunk_size(self) -> Result<ChunkSize, RechunkError> {
        let size = usize::try_from(self).map_err(|_| RechunkError::chunk_size(self))?;
        ChunkSize::new(size)
    }
}

impl IntoChunkSize for u64 {
    fn into_chunk_size(self) -> Result<ChunkSize, RechunkError> {
        if self > MAX_SAFE_INTEGER {
            return Err(RechunkError::chunk_size(self));
        }
        let size = usize::try_from(self).map_err(|_| RechunkError::chunk_size(self))?;
        ChunkSize::new(size)
    }
}

impl IntoChunkSize for i32 {
    fn into_chunk_size(self) -> Result<ChunkSize, RechunkError> {
        let size = usize::try_from(self).map_err(|_| RechunkError::chunk_size(self))?;
        ChunkSize::new(size)
    }
}

impl IntoChunkSize for i64 {
    fn into_chunk_size(self) -> Result<ChunkSize, RechunkError> {
        let size = u64::try_from(self).map_err(|_| RechunkError::chunk_size(self))?;
        size.into_chunk_size()
    }
}

impl IntoChunkSize for f64 {
    fn into_chunk_size(self) -> Result<ChunkSize, RechunkError> {
        // NaN fails every comparison, so it lands in the error branch too.
        if !(self.is_finite() && self.fract() == 0.0 && self >= 1.0 && self <= MAX_SAFE_INTEGER as f64)
        {
            return Err(RechunkError::chunk_size(self));
        }
        (self as u64).into_chunk_size()
    }
}
