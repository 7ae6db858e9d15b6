mod collator;

use std::sync::atomic::{AtomicU64, Ordering};

use collate_common::{to_index, ArrayIndex};
use hedron::{ModelVertex, Position, Vertex};
use num_traits::AsPrimitive;

use crate::{
    shape::{center_of, BuildStamp},
    Error, Shape, ShapeRef,
};

use collator::Collator;

static NEXT_GEOMETRY_ID: AtomicU64 = AtomicU64::new(0);

/// All of the geometry for a single model.
///
/// Shapes are loaded with raw primitives of any [Topology](crate::Topology);
/// [build_vertex_array](Self::build_vertex_array) then collates them into one vertex buffer and
/// one index buffer, so the whole model can be uploaded at once and each shape drawn as a range
/// of the index buffer.
#[derive(Debug)]
pub struct Geometry<V = ModelVertex, Idx: ArrayIndex = u32> {
    shapes: Vec<ShapeRef<V>>,
    /// Every vertex index in the model, grouped by shape
    model_indices: Vec<Idx>,
    /// Every distinct vertex in the model
    model_vertices: Vec<V>,
    id: u64,
    /// Number of times the buffers have been replaced
    generation: u64,
}

impl<V, Idx: ArrayIndex> Default for Geometry<V, Idx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, Idx: ArrayIndex> Geometry<V, Idx> {
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            model_indices: Vec::new(),
            model_vertices: Vec::new(),
            id: NEXT_GEOMETRY_ID.fetch_add(1, Ordering::Relaxed),
            generation: 0,
        }
    }

    /// The stamp given to shapes collated by the current buffers.
    #[inline]
    fn stamp(&self) -> BuildStamp {
        BuildStamp {
            geometry: self.id,
            generation: self.generation,
        }
    }

    #[inline]
    pub fn shapes(&self) -> &[ShapeRef<V>] {
        &self.shapes
    }

    #[inline]
    pub fn shapes_mut(&mut self) -> &mut Vec<ShapeRef<V>> {
        &mut self.shapes
    }

    /// Take ownership of a shape, returning a handle to it.
    pub fn add_shape(&mut self, shape: Shape<V>) -> ShapeRef<V> {
        let shape = shape.into_ref();
        self.shapes.push(shape.clone());
        shape
    }

    /// Add a handle to a shape which may also be referenced elsewhere.
    #[inline]
    pub fn push_shape(&mut self, shape: ShapeRef<V>) {
        self.shapes.push(shape);
    }

    #[inline]
    pub fn model_indices(&self) -> &[Idx] {
        &self.model_indices
    }

    #[inline]
    pub fn model_vertices(&self) -> &[V] {
        &self.model_vertices
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.model_indices.len() / 3
    }

    /// The slice of the model index buffer belonging to `shape`, if it lies within the buffer.
    pub fn indices_of(&self, shape: &Shape<V>) -> Option<&[Idx]> {
        self.model_indices.get(shape.index_range())
    }

    /// `(offset, count)` of every visible shape, in shape order.
    pub fn draw_ranges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.shapes.iter().filter_map(|shape| {
            let shape = shape.read();
            shape.is_visible().then(|| shape.vertex_offset_and_count())
        })
    }

    /// Discard the vertex and index buffers along with every shape's primitives, and reset every
    /// shape's index range.
    pub fn clear_vertex_array(&mut self) {
        self.model_vertices = Vec::new();
        self.model_indices = Vec::new();
        self.generation += 1;
        for shape in &self.shapes {
            let mut shape = shape.write();
            drop(shape.take_primitives());
            shape.set_vertex_offset(0);
            shape.set_vertex_count(0);
            shape.set_collated_by(None);
        }
    }
}

impl<V: Vertex, Idx: ArrayIndex> Geometry<V, Idx> {
    /// Append vertices to the model vertex buffer as-is, returning the index of the first one.
    ///
    /// These vertices are neither deduplicated nor owned by any shape, so they do not survive
    /// the next [build_vertex_array](Self::build_vertex_array).
    pub fn add_vertices(
        &mut self,
        vertices: impl IntoIterator<Item = V>,
    ) -> Result<Idx, Error<Idx>> {
        let vertices: Vec<V> = vertices.into_iter().collect();
        let start = self.model_vertices.len();
        let last = start + vertices.len().saturating_sub(1);
        let overflow = |index| Error::IndexOverflow {
            index,
            max: Idx::max_value(),
        };
        let first = to_index(start).ok_or_else(|| overflow(start))?;
        to_index::<Idx>(last).ok_or_else(|| overflow(last))?;
        self.model_vertices.extend(vertices);
        Ok(first)
    }

    /// Triangulate every shape's primitives and collate them into the model vertex and index
    /// buffers, replacing whatever the buffers held before.
    ///
    /// Identical vertices are stored once, no matter which primitives or shapes they come from.
    /// Each shape's index range, and its center of mass, are updated, and its primitives are
    /// dropped; a shape collated by this geometry's last build contributes its previous index
    /// range (followed by any primitives added since), so rebuilding unchanged geometry reproduces
    /// the same buffers. A range assigned by another geometry, or by an earlier build whose buffers
    /// have since been replaced, is ignored.
    ///
    /// # Errors
    ///
    /// If the collated buffers can't be addressed by `Idx` (or shape offsets by `u32`), nothing is
    /// changed apart from the primitives having been triangulated.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self), fields(shapes = self.shapes.len()))
    )]
    pub fn build_vertex_array(&mut self) -> Result<(), Error<Idx>> {
        let mut collator = Collator::<V, Idx>::new();
        let mut bookkeeping: Vec<(u32, u32, Position)> = Vec::with_capacity(self.shapes.len());

        for shape in &self.shapes {
            let mut shape = shape.write();
            for primitive in shape.primitives_mut() {
                primitive.triangulate();
            }

            let previous = self.previous_slice(&shape);
            let working = previous.iter().copied().map(|i| &self.model_vertices[i.as_()]).chain(
                shape
                    .primitives()
                    .iter()
                    .flat_map(|p| p.vertices().iter()),
            );

            let offset = collator.offset()?;
            for vertex in working.clone() {
                collator.push(vertex)?;
            }
            let count = collator.offset()? - offset;
            bookkeeping.push((offset, count, center_of(working)));
        }

        self.generation += 1;
        let stamp = self.stamp();
        for (shape, (offset, count, center)) in self.shapes.iter().zip(bookkeeping) {
            let mut shape = shape.write();
            shape.set_collated_by(Some(stamp));
            drop(shape.take_primitives());
            shape.set_vertex_offset(offset);
            shape.set_vertex_count(count);
            shape.set_center_of_mass(center);
        }
        self.model_vertices = collator.vertices;
        self.model_indices = collator.indices;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            vertices = self.model_vertices.len(),
            indices = self.model_indices.len(),
            "collated vertex array"
        );
        Ok(())
    }

    /// The indices `shape` was given by the last build, or nothing if they don't refer to this
    /// geometry's current buffers.
    fn previous_slice(&self, shape: &Shape<V>) -> &[Idx] {
        match shape.collated_by() {
            None => return &[],
            Some(stamp) if stamp != self.stamp() => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    ?stamp,
                    current = ?self.stamp(),
                    "shape was collated into other buffers; ignoring its index range"
                );
                return &[];
            }
            Some(_) => {}
        }
        let range = shape.index_range();
        match self.model_indices.get(range.clone()) {
            Some(slice)
                if slice
                    .iter()
                    .all(|i| AsPrimitive::<usize>::as_(*i) < self.model_vertices.len()) =>
            {
                slice
            }
            _ => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    start = range.start,
                    end = range.end,
                    indices = self.model_indices.len(),
                    "shape index range lies outside of the model index buffer; ignoring it"
                );
                &[]
            }
        }
    }
}
