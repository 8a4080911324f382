//! Element-typed views over shared storage.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;

use bytes::Bytes;

use super::PodOwner;

/// A window of `T` elements over storage shared with other views.
///
/// This is the Rust counterpart of a typed array view: it records an element
/// offset and an element length over a backing allocation. Converting it into
/// bytes derives the byte offset and byte length from those and the element
/// width, and slices the same allocation; no element is converted or copied.
///
/// # Example
///
/// ```
/// use rechunkrs::{BinaryView, TypedView};
///
/// let samples = TypedView::new(vec![1u16, 2, 3, 4, 5, 6]);
/// let middle = samples.subview(2..5);
///
/// assert_eq!(middle.len(), 3);
/// assert_eq!(middle.byte_offset(), 4);
/// assert_eq!(middle.byte_len(), 6);
///
/// let bytes = middle.into_byte_view().unwrap();
/// assert_eq!(bytes.len(), 6);
/// ```
pub struct TypedView<T> {
    storage: Bytes,
    offset: usize,
    len: usize,
    _element: PhantomData<fn() -> T>,
}

impl<T: bytemuck::Pod + Send> TypedView<T> {
    /// Creates a view covering all of `elements`.
    pub fn new(elements: Vec<T>) -> Self {
        let len = elements.len();
        Self {
            storage: Bytes::from_owner(PodOwner(elements)),
            offset: 0,
            len,
            _element: PhantomData,
        }
    }
}

impl<T> TypedView<T> {
    /// Width of one element in bytes.
    pub const ELEMENT_WIDTH: usize = std::mem::size_of::<T>();

    /// Returns a narrower view sharing the same storage.
    ///
    /// `range` is expressed in elements, relative to this view.
    ///
    /// # Panics
    ///
    /// Panics if `range` is out of bounds or decreasing, like slice indexing.
    pub fn subview(&self, range: Range<usize>) -> Self {
        assert!(
            range.start <= range.end && range.end <= self.len,
            "range {:?} out of bounds for view of {} elements",
            range,
            self.len
        );
        Self {
            storage: self.storage.clone(),
            offset: self.offset + range.start,
            len: range.end - range.start,
            _element: PhantomData,
        }
    }

    /// Number of elements in the view.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the view has no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte offset of the view within its storage.
    pub fn byte_offset(&self) -> usize {
        self.offset * Self::ELEMENT_WIDTH
    }

    /// Length of the view in bytes.
    pub fn byte_len(&self) -> usize {
        self.len * Self::ELEMENT_WIDTH
    }

    /// Returns the viewed bytes, sharing the storage.
    pub fn to_bytes(&self) -> Bytes {
        let start = self.byte_offset();
        self.storage.slice(start..start + self.byte_len())
    }
}

impl<T> Clone for TypedView<T> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            offset: self.offset,
            len: self.len,
            _element: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TypedView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedView")
            .field("element", &std::any::type_name::<T>())
            .field("offset", &self.offset)
            .field("len", &self.len)
            .finish()
    }
}
