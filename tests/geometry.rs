//! Collation of shapes into model-wide vertex & index buffers.

use std::collections::HashSet;

use collate::{Error, Geometry, Primitive, Shape, Topology};
use hedron::{ModelVertex, Vertex};
use nalgebra::{point, vector};
use quickcheck_macros::quickcheck;

fn v(x: f32, y: f32, z: f32) -> ModelVertex {
    ModelVertex::new(point![x, y, z])
}

fn shape_of(primitives: impl IntoIterator<Item = Primitive<ModelVertex>>) -> Shape<ModelVertex> {
    let mut shape = Shape::default();
    shape.primitives_mut().extend(primitives);
    shape
}

fn list(vertices: &[ModelVertex]) -> Primitive<ModelVertex> {
    Primitive::with_vertices(Topology::TriangleList, vertices.to_vec())
}

/// Two triangles sharing the edge `b -> c`, each in its own shape.
fn two_shapes() -> Geometry {
    let (a, b, c, d) = (v(0., 0., 0.), v(1., 0., 0.), v(0., 1., 0.), v(1., 1., 0.));
    let mut geom: Geometry = Geometry::new();
    geom.add_shape(shape_of([list(&[a, b, c])]));
    geom.add_shape(shape_of([list(&[c, b, d])]));
    geom
}

/// Re-expand each shape's range of the index buffer into its vertices.
fn expand(geom: &Geometry) -> Vec<Vec<ModelVertex>> {
    geom.shapes()
        .iter()
        .map(|s| {
            geom.indices_of(&s.read())
                .unwrap()
                .iter()
                .map(|i| geom.model_vertices()[*i as usize])
                .collect()
        })
        .collect()
}

#[test]
fn shared_vertices_stored_once() {
    let mut geom = two_shapes();
    geom.build_vertex_array().unwrap();

    assert_eq!(geom.model_vertices().len(), 4);
    assert_eq!(geom.model_indices(), &[0, 1, 2, 2, 1, 3]);
    let set: HashSet<_> = geom.model_vertices().iter().collect();
    assert_eq!(set.len(), geom.model_vertices().len());
}

#[test]
fn shape_ranges_follow_shape_order() {
    let (a, b, c) = (v(0., 0., 0.), v(2., 0., 0.), v(1., 3., 0.));
    let mut geom: Geometry = Geometry::new();
    let first = geom.add_shape(shape_of([list(&[a, b, c]), list(&[c, b, a])]));
    let second = geom.add_shape(shape_of([Primitive::with_vertices(
        Topology::TriangleFan,
        vec![a, b, c, v(5., 5., 5.)],
    )]));
    geom.build_vertex_array().unwrap();

    assert_eq!(first.read().vertex_offset_and_count(), (0, 6));
    assert_eq!(second.read().vertex_offset_and_count(), (6, 6));
    let total: u32 = geom
        .shapes()
        .iter()
        .map(|s| s.read().vertex_offset_and_count().1)
        .sum();
    assert_eq!(total as usize, geom.model_indices().len());
}

#[test]
fn ranges_reproduce_triangulated_shapes() {
    let verts: Vec<_> = (0..6).map(|i| v(i as f32, (i % 2) as f32, 0.)).collect();
    let strip = Primitive::with_vertices(Topology::TriangleStrip, verts.clone());
    let mut expected = strip.clone();
    expected.triangulate();

    let mut geom: Geometry = Geometry::new();
    geom.add_shape(shape_of([list(&verts[..3])]));
    geom.add_shape(shape_of([strip]));
    geom.build_vertex_array().unwrap();

    let shapes = expand(&geom);
    assert_eq!(shapes[0], &verts[..3]);
    assert_eq!(shapes[1], expected.vertices());
}

#[test]
fn primitives_are_consumed() {
    let mut geom = two_shapes();
    geom.build_vertex_array().unwrap();
    for shape in geom.shapes() {
        assert!(shape.read().primitives().is_empty());
    }
}

#[test]
fn rebuild_is_idempotent() {
    let mut geom = two_shapes();
    geom.build_vertex_array().unwrap();
    let vertices = geom.model_vertices().to_vec();
    let indices = geom.model_indices().to_vec();
    let ranges: Vec<_> = geom.draw_ranges().collect();

    geom.build_vertex_array().unwrap();
    assert_eq!(geom.model_vertices(), vertices.as_slice());
    assert_eq!(geom.model_indices(), indices.as_slice());
    assert_eq!(geom.draw_ranges().collect::<Vec<_>>(), ranges);
}

#[test]
fn rebuild_appends_new_primitives() {
    let mut geom = two_shapes();
    geom.build_vertex_array().unwrap();
    let first = geom.shapes()[0].clone();
    first
        .write()
        .push_primitive(list(&[v(0., 0., 0.), v(9., 9., 9.), v(1., 1., 0.)]));
    geom.build_vertex_array().unwrap();

    assert_eq!(first.read().vertex_offset_and_count(), (0, 6));
    assert_eq!(geom.shapes()[1].read().vertex_offset_and_count(), (6, 3));
    assert_eq!(geom.model_vertices().len(), 5);
    assert_eq!(geom.model_indices(), &[0, 1, 2, 0, 3, 4, 2, 1, 4]);
}

#[test]
fn empty_shapes_contribute_nothing() {
    let mut geom: Geometry = Geometry::new();
    let empty = geom.add_shape(Shape::default());
    let degenerate = geom.add_shape(shape_of([Primitive::with_vertices(
        Topology::TriangleStrip,
        vec![v(0., 0., 0.), v(1., 0., 0.)],
    )]));
    geom.build_vertex_array().unwrap();

    assert!(geom.model_vertices().is_empty());
    assert!(geom.model_indices().is_empty());
    assert_eq!(empty.read().vertex_offset_and_count(), (0, 0));
    assert_eq!(degenerate.read().vertex_offset_and_count(), (0, 0));
    assert_eq!(*degenerate.read().center_of_mass(), point![0., 0., 0.]);
}

#[test]
fn build_computes_center_of_mass() {
    let mut geom: Geometry = Geometry::new();
    let shape = geom.add_shape(shape_of([list(&[
        v(0., 0., 0.),
        v(2., 0., 0.),
        v(1., 3., 0.),
    ])]));
    geom.build_vertex_array().unwrap();
    assert_eq!(*shape.read().center_of_mass(), point![1., 1., 0.]);

    // still known after the primitives are gone
    geom.build_vertex_array().unwrap();
    assert_eq!(*shape.read().center_of_mass(), point![1., 1., 0.]);
}

#[test]
fn attributes_keep_vertices_apart() {
    let a = v(0., 0., 0.);
    let lit = a.with_normal(vector![0., 0., 1.]);
    let mut geom: Geometry = Geometry::new();
    geom.add_shape(shape_of([list(&[a, v(1., 0., 0.), v(0., 1., 0.)])]));
    geom.add_shape(shape_of([list(&[lit, v(1., 0., 0.), v(0., 1., 0.)])]));
    geom.build_vertex_array().unwrap();

    assert_eq!(geom.model_vertices().len(), 4);
    assert_eq!(geom.model_indices(), &[0, 1, 2, 3, 1, 2]);
}

#[test]
fn hidden_shapes_stay_collated() {
    let mut geom = two_shapes();
    geom.shapes()[0].write().set_visible(false);
    geom.build_vertex_array().unwrap();

    assert_eq!(geom.model_indices().len(), 6);
    assert_eq!(geom.draw_ranges().collect::<Vec<_>>(), [(3, 3)]);
}

#[test]
fn shared_shape_outlives_geometry() {
    let mut geom = two_shapes();
    geom.build_vertex_array().unwrap();
    let kept = geom.shapes()[1].clone();
    drop(geom);
    assert_eq!(kept.read().vertex_offset_and_count(), (3, 3));
}

#[test]
fn clear_vertex_array() {
    let mut geom = two_shapes();
    geom.build_vertex_array().unwrap();
    geom.shapes()[0]
        .write()
        .push_primitive(list(&[v(0., 0., 0.), v(1., 0., 0.), v(0., 1., 0.)]));
    geom.clear_vertex_array();

    assert!(geom.model_vertices().is_empty());
    assert!(geom.model_indices().is_empty());
    for shape in geom.shapes() {
        let shape = shape.read();
        assert!(shape.primitives().is_empty());
        assert_eq!(shape.vertex_offset_and_count(), (0, 0));
    }

    geom.build_vertex_array().unwrap();
    assert!(geom.model_indices().is_empty());
}

#[test]
fn add_vertices_appends_run() {
    let mut geom = two_shapes();
    geom.build_vertex_array().unwrap();
    let start = geom.add_vertices([v(0., 0., 0.), v(7., 7., 7.)]).unwrap();
    assert_eq!(start, 4);
    assert_eq!(geom.model_vertices().len(), 6);
    assert_eq!(geom.model_vertices()[5].position(), point![7., 7., 7.]);

    // standalone runs belong to no shape
    geom.build_vertex_array().unwrap();
    assert_eq!(geom.model_vertices().len(), 4);
}

#[test]
fn narrow_indices_overflow() {
    let mut geom: Geometry<ModelVertex, u8> = Geometry::new();
    let verts: Vec<_> = (0..300).map(|i| v(i as f32, 0., 0.)).collect();
    let shape = geom.add_shape(shape_of([Primitive::with_vertices(
        Topology::TriangleFan,
        verts,
    )]));

    match geom.build_vertex_array() {
        Err(Error::IndexOverflow { index, max }) => {
            assert_eq!(index, 256);
            assert_eq!(max, u8::MAX);
        }
        other => panic!("expected overflow, got {other:?}"),
    }
    // nothing was collated; the (now triangulated) primitives are still there
    assert!(geom.model_vertices().is_empty());
    let shape = shape.read();
    assert_eq!(shape.vertex_offset_and_count(), (0, 0));
    assert_eq!(shape.primitives().len(), 1);
    assert_eq!(shape.primitives()[0].topology(), Topology::TriangleList);
}

#[test]
fn narrow_indices_in_range() {
    let mut geom: Geometry<ModelVertex, u16> = Geometry::new();
    geom.add_shape(shape_of([list(&[
        v(0., 0., 0.),
        v(1., 0., 0.),
        v(0., 1., 0.),
    ])]));
    geom.build_vertex_array().unwrap();
    assert_eq!(geom.model_indices(), &[0u16, 1, 2]);
}

#[quickcheck]
fn indices_cover_every_shape(shapes: Vec<Vec<(u8, u8)>>) -> bool {
    // small coordinate space so that vertices repeat often
    let mut geom: Geometry = Geometry::new();
    for tris in &shapes {
        let vertices = tris
            .iter()
            .map(|(x, y)| v((x % 4) as f32, (y % 4) as f32, 0.))
            .collect();
        geom.add_shape(shape_of([Primitive::with_vertices(Topology::TriangleStrip, vertices)]));
    }
    if geom.build_vertex_array().is_err() {
        return false;
    }

    let unique: HashSet<_> = geom.model_vertices().iter().collect();
    let total: usize = geom
        .shapes()
        .iter()
        .map(|s| s.read().vertex_offset_and_count().1 as usize)
        .sum();
    let valid = geom
        .model_indices()
        .iter()
        .all(|i| (*i as usize) < geom.model_vertices().len());

    unique.len() == geom.model_vertices().len()
        && total == geom.model_indices().len()
        && valid
        && unique.len() <= 16
}

/// The x coordinate of every vertex in `shape`'s range of `geom`'s index buffer.
fn xs_of(geom: &Geometry, shape: &Shape<ModelVertex>) -> Vec<f32> {
    geom.indices_of(shape)
        .unwrap()
        .iter()
        .map(|i| geom.model_vertices()[*i as usize].position[0])
        .collect()
}

#[test]
fn range_from_another_geometry_is_ignored() {
    let at = |x: f32| list(&[v(x, 0., 0.), v(x, 1., 0.), v(x, 0., 1.)]);

    let mut first: Geometry = Geometry::new();
    let shared = first.add_shape(shape_of([at(5.)]));
    first.build_vertex_array().unwrap();
    assert_eq!(shared.read().vertex_offset_and_count(), (0, 3));

    let mut second: Geometry = Geometry::new();
    let local = second.add_shape(shape_of([at(100.)]));
    second.build_vertex_array().unwrap();

    // (0, 3) is in bounds for `second` too, but was never written by it
    shared.write().push_primitive(at(5.));
    second.push_shape(shared.clone());
    second.build_vertex_array().unwrap();

    assert_eq!(local.read().vertex_offset_and_count(), (0, 3));
    assert_eq!(shared.read().vertex_offset_and_count(), (3, 3));
    assert_eq!(xs_of(&second, &shared.read()), [5., 5., 5.]);
    assert_eq!(shared.read().center_of_mass().x, 5.);
    assert_eq!(second.model_vertices().len(), 6);

    // once collated by `second`, its range is carried through rebuilds of `second`
    second.build_vertex_array().unwrap();
    assert_eq!(xs_of(&second, &shared.read()), [5., 5., 5.]);
}

#[test]
fn range_from_replaced_buffers_is_ignored() {
    let mut geom = two_shapes();
    geom.build_vertex_array().unwrap();

    let removed = geom.shapes_mut().remove(0);
    geom.build_vertex_array().unwrap();
    assert_eq!(geom.model_indices().len(), 3);

    // its old range (0, 3) now holds the other shape's indices
    geom.shapes_mut().insert(0, removed.clone());
    geom.build_vertex_array().unwrap();
    assert_eq!(removed.read().vertex_offset_and_count(), (0, 0));
    assert_eq!(geom.shapes()[1].read().vertex_offset_and_count(), (0, 3));
    assert_eq!(geom.model_indices().len(), 3);
}

#[test]
fn strip_winding_restarts_per_primitive() {
    let strip = |x: f32| {
        Primitive::with_vertices(
            Topology::TriangleStrip,
            (0..4).map(|i| v(x + i as f32, (i % 2) as f32, 0.)).collect(),
        )
    };
    let mut geom: Geometry = Geometry::new();
    let shape = geom.add_shape(shape_of([strip(0.), strip(10.)]));
    geom.build_vertex_array().unwrap();

    assert_eq!(
        xs_of(&geom, &shape.read()),
        [0., 1., 2., 2., 1., 3., 10., 11., 12., 12., 11., 13.]
    );
}

#[test]
fn center_of_mass_agrees_before_and_after_build() {
    // the apex is shared by every triangle of the fan
    let fan = Primitive::with_vertices(
        Topology::TriangleFan,
        vec![
            v(0., 0., 0.),
            v(9., 0., 0.),
            v(0., 9., 0.),
            v(0., 0., 9.),
            v(0., 0., 0.),
        ],
    );
    let mut geom: Geometry = Geometry::new();
    let shape = geom.add_shape(shape_of([fan]));

    shape.write().calculate_center_of_mass();
    let before = *shape.read().center_of_mass();
    geom.build_vertex_array().unwrap();
    let after = *shape.read().center_of_mass();

    assert_eq!(before, point![1., 2., 2.]);
    assert_eq!(before, after);
}
