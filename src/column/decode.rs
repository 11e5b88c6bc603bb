//! Little-endian element decoding.
//!
//! Two interchangeable paths turn a raw column buffer into typed values:
//! [`decode_portable`] assembles every element with explicit little-endian
//! reads and works on any target, while [`decode_native`] reinterprets the
//! buffer memory directly and only exists where the native byte order is
//! little-endian. Building with the `portable` feature removes the native
//! path; [`configure`] can also disable it at startup.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};

use bytemuck::Pod;
use log::debug;

use crate::conf::DecodeStrategy;

/// A fixed-width numeric type with a little-endian wire encoding.
pub trait Primitive: Pod + Default + PartialEq + Debug + Send + Sync + 'static {
    /// Wire type name, e.g. `Float32`.
    const TYPE_NAME: &'static str;

    /// Decode one element from exactly `size_of::<Self>()` bytes.
    fn from_le_slice(raw: &[u8]) -> Self;

    /// Append the little-endian encoding of `self`.
    fn put_le(self, buf: &mut Vec<u8>);
}

macro_rules! impl_primitive {
    ($ty:ty, $name:literal) => {
        impl Primitive for $ty {
            const TYPE_NAME: &'static str = $name;

            #[inline]
            fn from_le_slice(raw: &[u8]) -> Self {
                let mut arr = [0u8; std::mem::size_of::<$ty>()];
                arr.copy_from_slice(raw);
                <$ty>::from_le_bytes(arr)
            }

            #[inline]
            fn put_le(self, buf: &mut Vec<u8>) {
                buf.extend_from_slice(&self.to_le_bytes());
            }
        }
    };
}

impl_primitive!(u8, "UInt8");
impl_primitive!(u16, "UInt16");
impl_primitive!(u32, "UInt32");
impl_primitive!(u64, "UInt64");
impl_primitive!(i8, "Int8");
impl_primitive!(i16, "Int16");
impl_primitive!(i32, "Int32");
impl_primitive!(i64, "Int64");
impl_primitive!(f32, "Float32");
impl_primitive!(f64, "Float64");

static FORCE_PORTABLE: AtomicBool = AtomicBool::new(false);

/// Select the decode path used by [`decode`] for the rest of the process.
pub fn configure(strategy: DecodeStrategy) {
    let portable = strategy == DecodeStrategy::Portable;
    FORCE_PORTABLE.store(portable, Ordering::Relaxed);
    debug!(
        "Configured column decoder: {:?} (native path available: {})",
        strategy,
        native_available()
    );
}

/// Whether this build carries the memory-reinterpreting decoder.
pub const fn native_available() -> bool {
    cfg!(all(target_endian = "little", not(feature = "portable")))
}

/// Whether [`decode`] currently dispatches to the native path.
pub fn native_active() -> bool {
    native_available() && !FORCE_PORTABLE.load(Ordering::Relaxed)
}

/// Decode every whole element of `raw` and append to `out`.
#[inline]
pub fn decode<T: Primitive>(raw: &[u8], out: &mut Vec<T>) {
    if native_active() {
        decode_fast(raw, out)
    } else {
        decode_portable(raw, out)
    }
}

/// Reference decoder: one explicit little-endian read per element.
pub fn decode_portable<T: Primitive>(raw: &[u8], out: &mut Vec<T>) {
    let size = std::mem::size_of::<T>();
    out.reserve(raw.len() / size);
    out.extend(raw.chunks_exact(size).map(T::from_le_slice));
}

/// Reinterpret `raw` as `[T]`. Falls back to unaligned element copies when
/// the buffer is not aligned for `T`.
#[cfg(all(target_endian = "little", not(feature = "portable")))]
pub fn decode_native<T: Primitive>(raw: &[u8], out: &mut Vec<T>) {
    let size = std::mem::size_of::<T>();
    let whole = raw.len() - raw.len() % size;
    match bytemuck::try_cast_slice::<u8, T>(&raw[..whole]) {
        Ok(values) => out.extend_from_slice(values),
        Err(_) => {
            out.reserve(whole / size);
            out.extend(
                raw[..whole]
                    .chunks_exact(size)
                    .map(bytemuck::pod_read_unaligned::<T>),
            );
        }
    }
}

#[cfg(all(target_endian = "little", not(feature = "portable")))]
#[inline]
fn decode_fast<T: Primitive>(raw: &[u8], out: &mut Vec<T>) {
    decode_native(raw, out)
}

#[cfg(not(all(target_endian = "little", not(feature = "portable"))))]
#[inline]
fn decode_fast<T: Primitive>(raw: &[u8], out: &mut Vec<T>) {
    decode_portable(raw, out)
}

/// Decode the element at `row` of a buffer holding `T`s.
#[inline]
pub(crate) fn decode_at<T: Primitive>(raw: &[u8], row: usize) -> T {
    let size = std::mem::size_of::<T>();
    T::from_le_slice(&raw[row * size..(row + 1) * size])
}
