use std::collections::{hash_map::Entry, HashMap};

use collate_common::{to_index, ArrayIndex};
use hedron::Vertex;

use crate::Error;

/// Accumulates a deduplicated vertex buffer and the index buffer referencing it.
#[derive(Debug)]
pub(crate) struct Collator<V, Idx> {
    pub(crate) vertices: Vec<V>,
    pub(crate) indices: Vec<Idx>,
    lookup: HashMap<V, Idx>,
}

impl<V: Vertex, Idx: ArrayIndex> Collator<V, Idx> {
    pub(crate) fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Number of indices pushed so far, as a shape offset.
    pub(crate) fn offset(&self) -> Result<u32, Error<Idx>> {
        u32::try_from(self.indices.len()).map_err(|_| Error::OffsetOverflow(self.indices.len()))
    }

    /// Append the index of `vertex`, adding it to the vertex buffer if no identical vertex is
    /// there yet.
    pub(crate) fn push(&mut self, vertex: &V) -> Result<(), Error<Idx>> {
        let idx = match self.lookup.entry(vertex.clone()) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let index = self.vertices.len();
                let idx = to_index(index).ok_or(Error::IndexOverflow {
                    index,
                    max: Idx::max_value(),
                })?;
                self.vertices.push(e.key().clone());
                e.insert(idx);
                idx
            }
        };
        self.indices.push(idx);
        Ok(())
    }
}
