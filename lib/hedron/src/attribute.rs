use nalgebra::{Point2, Point3, Point4, Vector3};

mod table;
pub use table::*;

/// What a vertex attribute is used for.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeUsage {
    /// Index of the matrix used to transform this vertex's position
    MatrixIndex,
    Position,
    Normal,
    Tangent,
    Color(u32),
    Texcoord(u32),
    Joints(u32),
    Weights(u32),
}

impl AttributeUsage {
    /// Whether [ModelVertex](crate::ModelVertex) has storage for this attribute.
    pub const fn is_stored(self) -> bool {
        match self {
            Self::MatrixIndex | Self::Position | Self::Normal => true,
            Self::Color(c) => (c as usize) < crate::COLOR_CHANNELS,
            Self::Texcoord(c) => (c as usize) < crate::TEXCOORD_CHANNELS,
            Self::Tangent | Self::Joints(_) | Self::Weights(_) => false,
        }
    }
}

/// The inner components of an [AttributeType]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeComponent {
    U8,
    U16,
    U32,
    I8,
    I16,
    F32,
}

impl AttributeComponent {
    pub const fn alignment(self) -> usize {
        use std::mem::align_of;
        match self {
            AttributeComponent::U8 => align_of::<u8>(),
            AttributeComponent::U16 => align_of::<u16>(),
            AttributeComponent::U32 => align_of::<u32>(),
            AttributeComponent::I8 => align_of::<i8>(),
            AttributeComponent::I16 => align_of::<i16>(),
            AttributeComponent::F32 => align_of::<f32>(),
        }
    }

    pub const fn size(self) -> usize {
        use std::mem::size_of;
        match self {
            AttributeComponent::U8 => size_of::<u8>(),
            AttributeComponent::U16 => size_of::<u16>(),
            AttributeComponent::U32 => size_of::<u32>(),
            AttributeComponent::I8 => size_of::<i8>(),
            AttributeComponent::I16 => size_of::<i16>(),
            AttributeComponent::F32 => size_of::<f32>(),
        }
    }
}

/// The shape of a single attribute value.
///
/// Values taken from the [glTF specification](https://registry.khronos.org/glTF/specs/2.0/glTF-2.0.html#accessor-data-types).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl AttributeType {
    #[inline]
    pub const fn alignment(self, comp: AttributeComponent) -> usize {
        // arrays have the same alignment as their component type
        comp.alignment()
    }

    pub const fn size_elements(self) -> usize {
        match self {
            AttributeType::Scalar => 1,
            AttributeType::Vec2 => 2,
            AttributeType::Vec3 => 3,
            AttributeType::Vec4 => 4,
            AttributeType::Mat2 => 4,
            AttributeType::Mat3 => 9,
            AttributeType::Mat4 => 16,
        }
    }

    pub const fn size_bytes(self, comp: AttributeComponent) -> usize {
        comp.size() * self.size_elements()
    }
}

/// Where and how one attribute is stored within a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeDescriptor {
    pub usage: AttributeUsage,
    pub ty: AttributeType,
    pub comp: AttributeComponent,
    /// Byte offset of the attribute from the start of the vertex
    pub offset: usize,
}

impl AttributeDescriptor {
    #[inline]
    pub const fn size(&self) -> usize {
        self.ty.size_bytes(self.comp)
    }

    /// Total size in bytes of every attribute in `layout`.
    pub const fn layout_size(layout: &[Self]) -> usize {
        let mut i = 0;
        let mut size = 0;
        while i < layout.len() {
            size += layout[i].size();
            i += 1;
        }
        size
    }
}

pub type Position = Point3<f32>;
pub type Normal = Vector3<f32>;

pub type Texcoord = Point2<f32>;
pub type Rgba = Point4<f32>;
