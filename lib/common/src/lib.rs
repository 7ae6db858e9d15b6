use num_traits::{AsPrimitive, PrimInt};

/// Trait for types which can act as indices within an array (or an array-like structure), such as
/// the elements of an index buffer.
pub trait ArrayIndex: PrimInt + AsPrimitive<usize> + std::hash::Hash + std::fmt::Debug + 'static {}
impl<P> ArrayIndex for P where
    P: PrimInt + AsPrimitive<usize> + std::hash::Hash + std::fmt::Debug + 'static
{
}

/// Convert an array length or position into an index type, if it fits.
#[inline]
pub fn to_index<Idx: ArrayIndex>(n: usize) -> Option<Idx> {
    <Idx as num_traits::NumCast>::from(n)
}
