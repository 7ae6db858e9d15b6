//! Turn glTF meshes into [Shapes](Shape).
//!
//! Each glTF mesh becomes one shape, named by its user data; each of its triangle primitives
//! becomes one [Primitive], with indexed primitives expanded into plain vertex runs.

use std::path::Path;

use collate::{ArrayIndex, Geometry, Primitive, Shape, Topology};
use gltf::{mesh::Mode, Semantic};
use hedron::{AttributeUsage, ModelVertex, COLOR_CHANNELS, TEXCOORD_CHANNELS};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Gltf(#[from] gltf::Error),
    #[error("primitive {primitive} of mesh {mesh} has no positions")]
    MissingPositions { mesh: usize, primitive: usize },
    #[error("primitive {primitive} of mesh {mesh} refers to vertex {index}, but has only {count}")]
    IndexOutOfRange {
        mesh: usize,
        primitive: usize,
        index: u32,
        count: usize,
    },
    #[error("failed to collate vertex array: {0}")]
    Collate(#[source] Box<dyn std::error::Error + Send + Sync>),
}

fn usage_of(semantic: &Semantic) -> Option<AttributeUsage> {
    Some(match semantic {
        Semantic::Positions => AttributeUsage::Position,
        Semantic::Normals => AttributeUsage::Normal,
        Semantic::Tangents => AttributeUsage::Tangent,
        Semantic::Colors(c) => AttributeUsage::Color(*c),
        Semantic::TexCoords(c) => AttributeUsage::Texcoord(*c),
        Semantic::Joints(c) => AttributeUsage::Joints(*c),
        Semantic::Weights(c) => AttributeUsage::Weights(*c),
        #[allow(unreachable_patterns)]
        _ => return None,
    })
}

fn topology_of(mode: Mode) -> Option<Topology> {
    match mode {
        Mode::Triangles => Some(Topology::TriangleList),
        Mode::TriangleStrip => Some(Topology::TriangleStrip),
        Mode::TriangleFan => Some(Topology::TriangleFan),
        Mode::Points | Mode::Lines | Mode::LineLoop | Mode::LineStrip => None,
    }
}

/// Load every mesh in a glTF file into a new [Geometry], without building its vertex array.
#[tracing::instrument(skip_all, fields(path = ?path.as_ref()))]
pub fn load<Idx: ArrayIndex>(
    path: impl AsRef<Path>,
) -> Result<Geometry<ModelVertex, Idx>, LoadError> {
    let (doc, buffers, _) = gltf::import(path.as_ref())?;
    let mut geometry = Geometry::new();

    for mesh in doc.meshes() {
        let mut shape = Shape::default();
        if let Some(name) = mesh.name() {
            shape.set_user_data(name.to_owned());
        }

        for prim in mesh.primitives() {
            let Some(topology) = topology_of(prim.mode()) else {
                tracing::warn!(
                    mesh = mesh.index(),
                    primitive = prim.index(),
                    mode = ?prim.mode(),
                    "skipping non-triangle primitive"
                );
                continue;
            };
            shape
                .attribute_table_mut()
                .extend(prim.attributes().filter_map(|(sem, _)| usage_of(&sem)));

            let reader = prim.reader(|buffer| Some(buffers[buffer.index()].0.as_slice()));
            let mut vertices: Vec<ModelVertex> = reader
                .read_positions()
                .ok_or(LoadError::MissingPositions {
                    mesh: mesh.index(),
                    primitive: prim.index(),
                })?
                .map(|p| ModelVertex::new(p.into()))
                .collect();
            if let Some(normals) = reader.read_normals() {
                for (v, n) in vertices.iter_mut().zip(normals) {
                    v.normal = n;
                }
            }
            for channel in 0..COLOR_CHANNELS {
                if let Some(colors) = reader.read_colors(channel as u32) {
                    for (v, c) in vertices.iter_mut().zip(colors.into_rgba_f32()) {
                        v.colors[channel] = c;
                    }
                }
            }
            for channel in 0..TEXCOORD_CHANNELS {
                if let Some(uvs) = reader.read_tex_coords(channel as u32) {
                    for (v, uv) in vertices.iter_mut().zip(uvs.into_f32()) {
                        v.texcoords[channel] = uv;
                    }
                }
            }

            if let Some(indices) = reader.read_indices() {
                vertices = indices
                    .into_u32()
                    .map(|i| {
                        vertices
                            .get(i as usize)
                            .copied()
                            .ok_or(LoadError::IndexOutOfRange {
                                mesh: mesh.index(),
                                primitive: prim.index(),
                                index: i,
                                count: vertices.len(),
                            })
                    })
                    .collect::<Result<_, _>>()?;
            }

            tracing::trace!(
                mesh = mesh.index(),
                primitive = prim.index(),
                ?topology,
                vertices = vertices.len(),
                "loaded primitive"
            );
            shape.push_primitive(Primitive::with_vertices(topology, vertices));
        }

        geometry.add_shape(shape);
    }

    Ok(geometry)
}
