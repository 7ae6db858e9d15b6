use std::{any::Any, ops::Range, sync::Arc};

use hedron::{AttributeTable, Position, Vertex};
use nalgebra::Vector3;
use parking_lot::RwLock;

use crate::Primitive;

/// A handle to a [Shape] which may be held by more than one owner.
pub type ShapeRef<V> = Arc<RwLock<Shape<V>>>;

/// Arbitrary data attached to a [Shape] by its owner.
pub type UserData = Box<dyn Any + Send + Sync>;

/// Identifies one build pass of one [Geometry](crate::Geometry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BuildStamp {
    pub(crate) geometry: u64,
    pub(crate) generation: u64,
}

/// A set of primitives sharing the same [AttributeTable].
///
/// Once the owning [Geometry](crate::Geometry) has collated its vertex array, the shape's
/// primitives are gone and it is described by a range of the model-wide index buffer instead.
#[derive(Debug)]
pub struct Shape<V> {
    attribute_table: AttributeTable,
    primitives: Vec<Primitive<V>>,
    /// Offset of this shape's first index in the model index buffer
    first_vertex_offset: u32,
    /// Number of indices belonging to this shape in the model index buffer
    vertex_count: u32,
    center_of_mass: Position,
    /// The geometry and build pass which assigned the current index range
    collated_by: Option<BuildStamp>,
    visible: bool,
    user_data: Option<UserData>,
}

impl<V> Default for Shape<V> {
    fn default() -> Self {
        Self::new(AttributeTable::default())
    }
}

impl<V> Shape<V> {
    pub fn new(attribute_table: AttributeTable) -> Self {
        Self {
            attribute_table,
            primitives: Vec::new(),
            first_vertex_offset: 0,
            vertex_count: 0,
            center_of_mass: Position::origin(),
            collated_by: None,
            visible: true,
            user_data: None,
        }
    }

    /// Wrap `self` in a shareable handle.
    #[inline]
    pub fn into_ref(self) -> ShapeRef<V> {
        Arc::new(RwLock::new(self))
    }

    #[inline]
    pub fn attribute_table(&self) -> &AttributeTable {
        &self.attribute_table
    }

    #[inline]
    pub fn attribute_table_mut(&mut self) -> &mut AttributeTable {
        &mut self.attribute_table
    }

    #[inline]
    pub fn primitives(&self) -> &[Primitive<V>] {
        &self.primitives
    }

    #[inline]
    pub fn primitives_mut(&mut self) -> &mut Vec<Primitive<V>> {
        &mut self.primitives
    }

    #[inline]
    pub fn push_primitive(&mut self, primitive: Primitive<V>) {
        self.primitives.push(primitive);
    }

    /// Remove every primitive from this shape, returning them.
    #[inline]
    pub fn take_primitives(&mut self) -> Vec<Primitive<V>> {
        std::mem::take(&mut self.primitives)
    }

    /// Total number of vertices across this shape's primitives.
    pub fn primitive_vertex_count(&self) -> usize {
        self.primitives.iter().map(|p| p.vertices().len()).sum()
    }

    #[inline]
    pub fn center_of_mass(&self) -> &Position {
        &self.center_of_mass
    }

    #[inline]
    pub(crate) fn set_center_of_mass(&mut self, center: Position) {
        self.center_of_mass = center;
    }

    #[inline]
    pub fn set_vertex_offset(&mut self, offset: u32) {
        self.first_vertex_offset = offset;
    }

    #[inline]
    pub(crate) fn set_vertex_count(&mut self, count: u32) {
        self.vertex_count = count;
    }

    #[inline]
    pub(crate) fn collated_by(&self) -> Option<BuildStamp> {
        self.collated_by
    }

    #[inline]
    pub(crate) fn set_collated_by(&mut self, stamp: Option<BuildStamp>) {
        self.collated_by = stamp;
    }

    /// The offset of this shape's first index within the model index buffer, and the number of
    /// indices belonging to it.
    ///
    /// Only meaningful once the owning [Geometry](crate::Geometry) has built its vertex array.
    #[inline]
    pub fn vertex_offset_and_count(&self) -> (u32, u32) {
        (self.first_vertex_offset, self.vertex_count)
    }

    /// [Self::vertex_offset_and_count], as a range of the model index buffer.
    #[inline]
    pub fn index_range(&self) -> Range<usize> {
        let start = self.first_vertex_offset as usize;
        start..start + self.vertex_count as usize
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[inline]
    pub fn has_user_data(&self) -> bool {
        self.user_data.is_some()
    }

    /// Get the attached user data, if there is any and it is a `T`.
    pub fn user_data<T: Any>(&self) -> Option<&T> {
        self.user_data.as_ref()?.downcast_ref()
    }

    pub fn user_data_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.user_data.as_mut()?.downcast_mut()
    }

    /// Attach data to this shape, returning whatever was attached before.
    ///
    /// The data is owned by the shape from here on, and dropped with it.
    pub fn set_user_data<T: Any + Send + Sync>(&mut self, data: T) -> Option<UserData> {
        self.user_data.replace(Box::new(data))
    }

    #[inline]
    pub fn take_user_data(&mut self) -> Option<UserData> {
        self.user_data.take()
    }
}

impl<V: Vertex> Shape<V> {
    /// Set this shape's center of mass to the mean position of every vertex in its primitives,
    /// as they will be once triangulated.
    ///
    /// Strip and fan vertices shared by several triangles are counted once per triangle, which
    /// matches the center a [Geometry](crate::Geometry) build assigns. Shapes without vertices
    /// are centered at the origin.
    pub fn calculate_center_of_mass(&mut self) {
        let triangulated: Vec<_> = self.primitives.iter().map(Primitive::triangulated).collect();
        self.center_of_mass = center_of(triangulated.iter().flat_map(|t| t.iter()));
    }
}

/// Unweighted mean of the positions of `vertices`; the origin if there are none.
pub(crate) fn center_of<'v, V: Vertex + 'v>(vertices: impl IntoIterator<Item = &'v V>) -> Position {
    let mut sum = Vector3::<f32>::zeros();
    let mut count = 0usize;
    for v in vertices {
        sum += v.position().coords;
        count += 1;
    }
    if count == 0 {
        return Position::origin();
    }
    Position::from(sum / count as f32)
}
