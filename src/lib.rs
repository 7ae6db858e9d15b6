//! Collation of a model's mixed-topology primitives into one vertex buffer and one index buffer.
//!
//! A [Geometry] holds [Shapes](Shape), each owning [Primitives](Primitive) as loaded from some
//! model format: triangle lists, strips, fans or quads, each a flat run of vertices.
//! [Geometry::build_vertex_array] triangulates all of them, merges identical vertices across the
//! whole model, and records each shape's range of the resulting index buffer, so that every shape
//! can be drawn with a single indexed draw call against one bound vertex/index buffer pair.
//!
//! ```
//! use collate::{Geometry, Primitive, Shape, Topology};
//! use hedron::ModelVertex;
//! use nalgebra::point;
//!
//! let quad = [
//!     point![0.0, 0.0, 0.0],
//!     point![1.0, 0.0, 0.0],
//!     point![0.0, 1.0, 0.0],
//!     point![1.0, 1.0, 0.0],
//! ];
//!
//! let mut shape = Shape::default();
//! shape.push_primitive(Primitive::with_vertices(
//!     Topology::TriangleStrip,
//!     quad.into_iter().map(ModelVertex::new).collect(),
//! ));
//!
//! let mut geometry: Geometry = Geometry::new();
//! let shape = geometry.add_shape(shape);
//! geometry.build_vertex_array().unwrap();
//!
//! assert_eq!(geometry.model_vertices().len(), 4);
//! assert_eq!(geometry.model_indices(), &[0, 1, 2, 2, 1, 3]);
//! assert_eq!(shape.read().vertex_offset_and_count(), (0, 6));
//! ```
#![cfg_attr(not(debug_assertions), warn(missing_docs))]

mod error;
pub use error::*;

mod geometry;
pub use geometry::*;

mod primitive;
pub use primitive::*;

mod shape;
pub use shape::{Shape, ShapeRef, UserData};

pub use collate_common::ArrayIndex;
pub use hedron::{ModelVertex, Position, Vertex};
