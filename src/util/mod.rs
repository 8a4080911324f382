//! Internal utility functions and helpers.
//!
//! This module contains small helper functions used throughout the crate.
//! It is an implementation detail and not part of the public API.

use bytes::{Bytes, BytesMut};

/// Completes a pending partial chunk.
///
/// Allocates a fresh buffer of exactly `carry.len() + head.len()` bytes, copies
/// the carried bytes to its start and `head` right after them.
pub(crate) fn merge_carry(carry: &[u8], head: &[u8]) -> Bytes {
    let mut merged = BytesMut::with_capacity(carry.len() + head.len());
    merged.extend_from_slice(carry);
    merged.extend_from_slice(head);
    merged.freeze()
}
