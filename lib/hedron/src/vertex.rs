use std::{
    hash::{Hash, Hasher},
    mem::{offset_of, size_of},
};

use crate::{
    AttributeComponent, AttributeDescriptor, AttributeType, AttributeUsage, Normal, Position, Rgba,
    Texcoord,
};

/// Number of color channels stored in a [ModelVertex].
pub const COLOR_CHANNELS: usize = 2;
/// Number of texture coordinate channels stored in a [ModelVertex].
pub const TEXCOORD_CHANNELS: usize = 8;

/// Trait for vertex types which can be collated into a model-wide vertex buffer.
///
/// Equality (and therefore hashing) must consider every attribute value, so that two vertices
/// compare equal only if they would be indistinguishable to the GPU.
pub trait Vertex: Clone + Eq + Hash {
    fn position(&self) -> Position;
}

/// A vertex with storage for every attribute a model may enable.
///
/// Attributes a shape doesn't enable are left zeroed. Equality is bitwise: `-0.0 != 0.0`, and a
/// NaN equals a NaN with the same bit pattern.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub colors: [[f32; 4]; COLOR_CHANNELS],
    pub texcoords: [[f32; 2]; TEXCOORD_CHANNELS],
    pub matrix_index: u32,
}

static_assertions::const_assert_eq!(
    size_of::<ModelVertex>(),
    AttributeDescriptor::layout_size(ModelVertex::LAYOUT)
);

impl Default for ModelVertex {
    fn default() -> Self {
        bytemuck::Zeroable::zeroed()
    }
}

const fn texcoord(channel: u32) -> AttributeDescriptor {
    AttributeDescriptor {
        usage: AttributeUsage::Texcoord(channel),
        ty: AttributeType::Vec2,
        comp: AttributeComponent::F32,
        offset: offset_of!(ModelVertex, texcoords) + channel as usize * size_of::<[f32; 2]>(),
    }
}

const fn color(channel: u32) -> AttributeDescriptor {
    AttributeDescriptor {
        usage: AttributeUsage::Color(channel),
        ty: AttributeType::Vec4,
        comp: AttributeComponent::F32,
        offset: offset_of!(ModelVertex, colors) + channel as usize * size_of::<[f32; 4]>(),
    }
}

impl ModelVertex {
    /// Byte layout of every attribute, in memory order.
    pub const LAYOUT: &'static [AttributeDescriptor] = &[
        AttributeDescriptor {
            usage: AttributeUsage::Position,
            ty: AttributeType::Vec3,
            comp: AttributeComponent::F32,
            offset: offset_of!(ModelVertex, position),
        },
        AttributeDescriptor {
            usage: AttributeUsage::Normal,
            ty: AttributeType::Vec3,
            comp: AttributeComponent::F32,
            offset: offset_of!(ModelVertex, normal),
        },
        color(0),
        color(1),
        texcoord(0),
        texcoord(1),
        texcoord(2),
        texcoord(3),
        texcoord(4),
        texcoord(5),
        texcoord(6),
        texcoord(7),
        AttributeDescriptor {
            usage: AttributeUsage::MatrixIndex,
            ty: AttributeType::Scalar,
            comp: AttributeComponent::U32,
            offset: offset_of!(ModelVertex, matrix_index),
        },
    ];

    /// Size in bytes of one vertex within a vertex buffer.
    pub const STRIDE: usize = size_of::<Self>();

    #[inline]
    pub fn new(position: Position) -> Self {
        Self {
            position: position.into(),
            ..Default::default()
        }
    }

    /// Find the storage descriptor of an attribute, if this layout stores it.
    pub fn attribute(usage: AttributeUsage) -> Option<&'static AttributeDescriptor> {
        Self::LAYOUT.iter().find(|d| d.usage == usage)
    }

    #[inline]
    pub fn with_normal(mut self, normal: Normal) -> Self {
        self.normal = normal.into();
        self
    }

    /// # Panics
    ///
    /// * `channel` >= [COLOR_CHANNELS]
    #[inline]
    pub fn with_color(mut self, channel: usize, color: Rgba) -> Self {
        self.colors[channel] = color.into();
        self
    }

    /// # Panics
    ///
    /// * `channel` >= [TEXCOORD_CHANNELS]
    #[inline]
    pub fn with_texcoord(mut self, channel: usize, uv: Texcoord) -> Self {
        self.texcoords[channel] = uv.into();
        self
    }

    #[inline]
    pub fn with_matrix_index(mut self, index: u32) -> Self {
        self.matrix_index = index;
        self
    }

    #[inline]
    pub fn normal(&self) -> Normal {
        self.normal.into()
    }

    #[inline]
    pub fn color(&self, channel: usize) -> Option<Rgba> {
        self.colors.get(channel).map(|c| Rgba::from(*c))
    }

    #[inline]
    pub fn texcoord(&self, channel: usize) -> Option<Texcoord> {
        self.texcoords.get(channel).map(|t| Texcoord::from(*t))
    }
}

impl PartialEq for ModelVertex {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        bytemuck::bytes_of(self) == bytemuck::bytes_of(other)
    }
}

impl Eq for ModelVertex {}

impl Hash for ModelVertex {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        bytemuck::bytes_of(self).hash(state);
    }
}

impl Vertex for ModelVertex {
    #[inline]
    fn position(&self) -> Position {
        self.position.into()
    }
}

impl From<Position> for ModelVertex {
    #[inline]
    fn from(position: Position) -> Self {
        Self::new(position)
    }
}
