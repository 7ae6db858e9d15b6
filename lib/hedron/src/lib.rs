#![doc = include_str!("../README.md")]

pub mod attribute;
pub use attribute::*;

mod vertex;
pub use vertex::*;

/// View a slice of plain-old-data (vertices, indices) as raw bytes, ready for upload.
#[inline]
pub fn as_bytes<T: bytemuck::Pod>(data: &[T]) -> &[u8] {
    bytemuck::cast_slice(data)
}
