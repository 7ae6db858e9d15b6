use collate_common::ArrayIndex;

/// Errors related to collating a [Geometry](crate::Geometry)'s vertex array.
#[derive(Debug, thiserror::Error)]
pub enum Error<Idx: ArrayIndex> {
    #[error("Model vertex {index} cannot be addressed by an index no greater than {max:?}")]
    IndexOverflow { index: usize, max: Idx },
    #[error("Model index count {0} exceeds the range of a shape offset (0..={max})", max = u32::MAX)]
    OffsetOverflow(usize),
}
