//! Input units and their byte reinterpretation.
//!
//! - [`BinaryView`] - Anything that can be seen as a contiguous run of bytes
//! - [`TypedView`] - An element-typed window over shared storage

mod typed;

use std::any::Any;

use bytes::{Bytes, BytesMut};

pub use typed::TypedView;

/// A contiguous byte range over some backing storage.
///
/// Conversion never copies element data: the returned [`Bytes`] shares the
/// allocation of `self` (or points at static memory). Multi-byte element types
/// are reinterpreted by byte length, not element count.
///
/// Returns `Err(self)` when the value is not a binary view, which only happens
/// for type-erased inputs such as `Box<dyn Any + Send>`.
pub trait BinaryView: Sized {
    /// Reinterprets `self` as raw bytes.
    fn into_byte_view(self) -> Result<Bytes, Self>;
}

impl BinaryView for Bytes {
    fn into_byte_view(self) -> Result<Bytes, Self> {
        Ok(self)
    }
}

impl BinaryView for BytesMut {
    fn into_byte_view(self) -> Result<Bytes, Self> {
        Ok(self.freeze())
    }
}

impl BinaryView for String {
    fn into_byte_view(self) -> Result<Bytes, Self> {
        Ok(Bytes::from(self))
    }
}

impl BinaryView for &'static str {
    fn into_byte_view(self) -> Result<Bytes, Self> {
        Ok(Bytes::from_static(self.as_bytes()))
    }
}

impl<T: bytemuck::Pod + Send> BinaryView for Vec<T> {
    fn into_byte_view(self) -> Result<Bytes, Self> {
        Ok(Bytes::from_owner(PodOwner(self)))
    }
}

impl<T: bytemuck::Pod + Send> BinaryView for Box<[T]> {
    fn into_byte_view(self) -> Result<Bytes, Self> {
        Ok(Bytes::from_owner(PodOwner(self.into_vec())))
    }
}

impl<T: bytemuck::Pod> BinaryView for &'static [T] {
    fn into_byte_view(self) -> Result<Bytes, Self> {
        Ok(Bytes::from_static(bytemuck::cast_slice(self)))
    }
}

impl<T> BinaryView for TypedView<T> {
    fn into_byte_view(self) -> Result<Bytes, Self> {
        Ok(self.to_bytes())
    }
}

/// Downcasts a type-erased value against a list of view types.
macro_rules! downcast_view {
    ($value:ident, $($ty:ty),+ $(,)?) => {
        $(
            let $value = match $value.downcast::<$ty>() {
                Ok(view) => {
                    return (*view)
                        .into_byte_view()
                        .map_err(|v| Box::new(v) as Box<dyn Any + Send>);
                }
                Err(other) => other,
            };
        )+
    };
}

/// Recognized erased types: `Bytes`, `BytesMut`, `String`, `&'static str`, and
/// `Vec<T>`, `Box<[T]>`, `&'static [T]` or `TypedView<T>` where `T` is one of
/// the primitive integer or float types. Anything else is handed back.
impl BinaryView for Box<dyn Any + Send> {
    fn into_byte_view(self) -> Result<Bytes, Self> {
        let value = self;
        downcast_view!(
            value,
            Bytes,
            BytesMut,
            String,
            &'static str,
            Vec<u8>,
            Vec<i8>,
            Vec<u16>,
            Vec<i16>,
            Vec<u32>,
            Vec<i32>,
            Vec<u64>,
            Vec<i64>,
            Vec<f32>,
            Vec<f64>,
            Box<[u8]>,
            Box<[i8]>,
            Box<[u16]>,
            Box<[i16]>,
            Box<[u32]>,
            Box<[i32]>,
            Box<[u64]>,
            Box<[i64]>,
            Box<[f32]>,
            Box<[f64]>,
            &'static [u8],
            &'static [i8],
            &'static [u16],
            &'static [i16],
            &'static [u32],
            &'static [i32],
            &'static [u64],
            &'static [i64],
            &'static [f32],
            &'static [f64],
            TypedView<u8>,
            TypedView<i8>,
            TypedView<u16>,
            TypedView<i16>,
            TypedView<u32>,
            TypedView<i32>,
            TypedView<u64>,
            TypedView<i64>,
            TypedView<f32>,
            TypedView<f64>,
        );
        Err(value)
    }
}

/// Owner handed to [`Bytes::from_owner`] so a `Vec<T>` of any plain-old-data
/// element type can back a byte view without copying.
struct PodOwner<T>(Vec<T>);

impl<T: bytemuck::Pod> AsRef<[u8]> for PodOwner<T> {
    fn as_ref(&self) -> &[u8] {
        bytemuck::cast_slice(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_u8_shares_storage() {
        let data = vec![1u8, 2, 3, 4];
        let ptr = data.as_ptr();
        let bytes = data.into_byte_view().unwrap();
        assert_eq!(bytes.as_ptr(), ptr);
        assert_eq!(&bytes[..], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_multi_byte_elements_use_byte_length() {
        let data: Vec<u32> = vec![0x0102_0304, 0x0506_0708];
        let ptr = data.as_ptr() as *const u8;
        let bytes = data.into_byte_view().unwrap();
        assert_eq!(bytes.len(), 8);
        assert_eq!(bytes.as_ptr(), ptr);
        assert_eq!(&bytes[..4], &0x0102_0304u32.to_ne_bytes());
    }

    #[test]
    fn test_static_slices() {
        static WORDS: [u16; 3] = [1, 2, 3];
        let bytes = (&WORDS[..]).into_byte_view().unwrap();
        assert_eq!(bytes.len(), 6);
        assert_eq!("abc".into_byte_view().unwrap(), Bytes::from_static(b"abc"));
    }

    #[test]
    fn test_boxed_any_recognized() {
        let value: Box<dyn Any + Send> = Box::new(vec![7u16; 4]);
        let bytes = value.into_byte_view().unwrap();
        assert_eq!(bytes.len(), 8);

        let value: Box<dyn Any + Send> = Box::new(Bytes::from_static(b"xyz"));
        assert_eq!(&value.into_byte_view().unwrap()[..], b"xyz");
    }

    #[test]
    fn test_boxed_any_wide_slices_recognized() {
        static SAMPLES: [f64; 2] = [0.5, -1.0];

        let value: Box<dyn Any + Send> = Box::new(&SAMPLES[..]);
        let bytes = value.into_byte_view().unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes.as_ptr(), SAMPLES.as_ptr() as *const u8);

        let value: Box<dyn Any + Send> = Box::new(vec![1u32, 2, 3].into_boxed_slice());
        assert_eq!(value.into_byte_view().unwrap().len(), 12);

        let value: Box<dyn Any + Send> = Box::new(vec![-1i16; 5].into_boxed_slice());
        assert_eq!(value.into_byte_view().unwrap().len(), 10);
    }

    #[test]
    fn test_boxed_any_rejected() {
        let value: Box<dyn Any + Send> = Box::new(42u32);
        let rejected = value.into_byte_view().unwrap_err();
        assert_eq!(rejected.downcast_ref::<u32>(), Some(&42));
    }
}
