use std::borrow::Cow;

use hedron::Vertex;

/// How the vertices of a [Primitive] are interpreted as triangles.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Every 3 vertices form an independent triangle.
    #[default]
    TriangleList,
    /// Each vertex after the second forms a triangle with the two before it, with winding
    /// alternating every triangle.
    TriangleStrip,
    /// Each vertex after the second forms a triangle with the one before it and the first vertex.
    TriangleFan,
    /// Every 4 vertices form an independent quad, split along the `a -> c` diagonal.
    Quads,
}

impl Topology {
    /// The number of triangles described by `n` vertices with this topology.
    pub const fn triangle_count(self, n: usize) -> usize {
        match self {
            Topology::TriangleList => n / 3,
            Topology::TriangleStrip | Topology::TriangleFan => n.saturating_sub(2),
            Topology::Quads => (n / 4) * 2,
        }
    }
}

/// A run of vertices sharing a single [Topology].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Primitive<V> {
    topology: Topology,
    vertices: Vec<V>,
}

impl<V> Default for Primitive<V> {
    fn default() -> Self {
        Self::new(Topology::default())
    }
}

impl<V> Primitive<V> {
    #[inline]
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            vertices: Vec::new(),
        }
    }

    #[inline]
    pub fn with_vertices(topology: Topology, vertices: Vec<V>) -> Self {
        Self { topology, vertices }
    }

    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[inline]
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    #[inline]
    pub fn vertices_mut(&mut self) -> &mut Vec<V> {
        &mut self.vertices
    }

    #[inline]
    pub fn into_vertices(self) -> Vec<V> {
        self.vertices
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.topology.triangle_count(self.vertices.len())
    }

    #[inline]
    pub fn is_triangulated(&self) -> bool {
        self.topology == Topology::TriangleList
    }
}

impl<V: Vertex> Primitive<V> {
    /// Rewrite this primitive's vertices as an equivalent [Topology::TriangleList].
    ///
    /// Strips and fans with fewer than 3 vertices (and quads with fewer than 4) become empty.
    /// Vertices that don't complete a triangle (or a quad) are dropped. Calling this on a
    /// primitive that is already a triangle list does nothing.
    pub fn triangulate(&mut self) {
        if self.is_triangulated() {
            return;
        }
        let tris = to_list(self.topology, &self.vertices);
        #[cfg(feature = "tracing")]
        if tris.is_empty() && !self.vertices.is_empty() {
            tracing::trace!(
                topology = ?self.topology,
                vertices = self.vertices.len(),
                "degenerate primitive"
            );
        }
        self.vertices = tris;
        self.topology = Topology::TriangleList;
    }

    /// This primitive's vertices as a [Topology::TriangleList], without modifying it.
    pub fn triangulated(&self) -> Cow<'_, [V]> {
        if self.is_triangulated() {
            Cow::Borrowed(&self.vertices)
        } else {
            Cow::Owned(to_list(self.topology, &self.vertices))
        }
    }
}

fn to_list<V: Clone>(topology: Topology, vertices: &[V]) -> Vec<V> {
    match topology {
        Topology::TriangleList => vertices.to_vec(),
        Topology::TriangleStrip => strip_to_list(vertices),
        Topology::TriangleFan => fan_to_list(vertices),
        Topology::Quads => quads_to_list(vertices),
    }
}

fn strip_to_list<V: Clone>(strip: &[V]) -> Vec<V> {
    let mut res = Vec::with_capacity(Topology::TriangleStrip.triangle_count(strip.len()) * 3);
    for (i, tri) in strip.windows(3).enumerate() {
        // odd triangles swap their first two vertices to keep the strip's facing
        let (a, b) = if i % 2 == 0 { (0, 1) } else { (1, 0) };
        res.extend([tri[a].clone(), tri[b].clone(), tri[2].clone()]);
    }
    res
}

fn fan_to_list<V: Clone>(fan: &[V]) -> Vec<V> {
    let Some((apex, rim)) = fan.split_first() else {
        return Vec::new();
    };
    let mut res = Vec::with_capacity(Topology::TriangleFan.triangle_count(fan.len()) * 3);
    for edge in rim.windows(2) {
        res.extend([apex.clone(), edge[0].clone(), edge[1].clone()]);
    }
    res
}

fn quads_to_list<V: Clone>(quads: &[V]) -> Vec<V> {
    let mut res = Vec::with_capacity(Topology::Quads.triangle_count(quads.len()) * 3);
    for q in quads.chunks_exact(4) {
        res.extend([q[0].clone(), q[1].clone(), q[2].clone()]);
        res.extend([q[0].clone(), q[2].clone(), q[3].clone()]);
    }
    res
}
