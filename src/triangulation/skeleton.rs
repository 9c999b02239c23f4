// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Derived skeleton of a triangulation.
//!
//! Vertices and edges are equivalence classes of tetrahedron corners and
//! tetrahedron edges under the face gluings; both are found with a
//! union-find. The edge union-find carries a parity bit so that an edge glued
//! to itself in reverse is detected as invalid.

use super::triangulation::{FacetSpec, Triangulation};
use super::{EDGE_NUMBER, EDGE_VERTICES};

/// Topological type of a vertex link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexLink {
    Sphere,
    Disc,
    Torus,
    KleinBottle,
    /// Closed, but neither a sphere, torus nor Klein bottle.
    NonStandardCusp,
    /// Has boundary, but is not a disc.
    Invalid,
}

#[derive(Debug, Clone)]
pub struct Vertex {
    /// `(tet, vertex)` pairs.
    embeddings: Vec<(usize, usize)>,
    link: VertexLink,
    link_euler_char: i64,
    link_orientable: bool,
    boundary_component: Option<usize>,
}

impl Vertex {
    pub fn embeddings(&self) -> &[(usize, usize)] {
        &self.embeddings
    }

    pub fn degree(&self) -> usize {
        self.embeddings.len()
    }

    pub fn link(&self) -> VertexLink {
        self.link
    }

    pub fn link_euler_char(&self) -> i64 {
        self.link_euler_char
    }

    pub fn is_link_orientable(&self) -> bool {
        self.link_orientable
    }

    pub fn is_ideal(&self) -> bool {
        matches!(
            self.link,
            VertexLink::Torus | VertexLink::KleinBottle | VertexLink::NonStandardCusp
        )
    }

    pub fn is_boundary(&self) -> bool {
        self.boundary_component.is_some()
    }

    pub fn boundary_component(&self) -> Option<usize> {
        self.boundary_component
    }
}

/// One appearance of an edge inside a tetrahedron.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeEmbedding {
    pub tet: usize,
    pub edge: usize,
    /// Whether the tetrahedron's edge runs against the edge class orientation.
    pub reversed: bool,
}

#[derive(Debug, Clone)]
pub struct Edge {
    embeddings: Vec<EdgeEmbedding>,
    boundary: bool,
    valid: bool,
}

impl Edge {
    pub fn embeddings(&self) -> &[EdgeEmbedding] {
        &self.embeddings
    }

    pub fn degree(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_boundary(&self) -> bool {
        self.boundary
    }

    /// False if the edge is identified with itself in reverse.
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

#[derive(Debug, Clone)]
pub struct Triangle {
    /// One entry for a boundary triangle, two for an internal one; the first
    /// is the lexicographically smaller face.
    embeddings: Vec<FacetSpec>,
}

impl Triangle {
    pub fn embeddings(&self) -> &[FacetSpec] {
        &self.embeddings
    }

    pub fn is_boundary(&self) -> bool {
        self.embeddings.len() == 1
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoundaryComponent {
    triangles: Vec<usize>,
    ideal_vertex: Option<usize>,
}

impl BoundaryComponent {
    pub fn triangles(&self) -> &[usize] {
        &self.triangles
    }

    pub fn is_ideal(&self) -> bool {
        self.ideal_vertex.is_some()
    }

    pub fn ideal_vertex(&self) -> Option<usize> {
        self.ideal_vertex
    }
}

#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    triangles: Vec<Triangle>,
    tet_vertices: Vec<[usize; 4]>,
    tet_edges: Vec<[usize; 6]>,
    tet_triangles: Vec<[usize; 4]>,
    component: Vec<usize>,
    n_components: usize,
    orientation: Vec<i8>,
    orientable: bool,
    boundary_components: Vec<BoundaryComponent>,
}

/// Union-find with a parity bit relative to the root.
struct UnionFind {
    parent: Vec<usize>,
    parity: Vec<bool>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            parity: vec![false; n],
        }
    }

    fn find(&mut self, x: usize) -> (usize, bool) {
        let p = self.parent[x];
        if p == x {
            return (x, false);
        }
        let (root, par) = self.find(p);
        self.parent[x] = root;
        self.parity[x] ^= par;
        (root, self.parity[x])
    }

    /// Joins the classes of `a` and `b` with relative parity `flip`. Returns
    /// false if they were already joined with the opposite parity.
    fn union(&mut self, a: usize, b: usize, flip: bool) -> bool {
        let (ra, pa) = self.find(a);
        let (rb, pb) = self.find(b);
        if ra == rb {
            return pa ^ pb == flip;
        }
        self.parent[rb] = ra;
        self.parity[rb] = pa ^ pb ^ flip;
        true
    }
}

/// Numbers the roots of a union-find in order of first appearance.
fn number_classes(uf: &mut UnionFind, n: usize) -> (Vec<usize>, usize) {
    let mut label = vec![usize::MAX; n];
    let mut of = vec![0; n];
    let mut count = 0;
    for x in 0..n {
        let (root, _) = uf.find(x);
        if label[root] == usize::MAX {
            label[root] = count;
            count += 1;
        }
        of[x] = label[root];
    }
    (of, count)
}

impl Skeleton {
    pub(crate) fn compute(tri: &Triangulation) -> Self {
        let n = tri.size();
        let mut sk = Skeleton {
            tet_vertices: vec![[0; 4]; n],
            tet_edges: vec![[0; 6]; n],
            tet_triangles: vec![[0; 4]; n],
            ..Default::default()
        };
        sk.compute_triangles(tri);
        sk.compute_edges(tri);
        sk.compute_vertices(tri);
        sk.compute_components(tri);
        sk.compute_boundary_components();
        sk
    }

    fn compute_triangles(&mut self, tri: &Triangulation) {
        for t in 0..tri.size() {
            for f in 0..4 {
                match tri.adjacent(t, f) {
                    None => {
                        self.tet_triangles[t][f] = self.triangles.len();
                        self.triangles.push(Triangle {
                            embeddings: vec![FacetSpec::new(t, f)],
                        });
                    }
                    Some((u, g)) => {
                        let other = FacetSpec::new(u, g.apply(f));
                        if FacetSpec::new(t, f) < other {
                            let index = self.triangles.len();
                            self.tet_triangles[t][f] = index;
                            self.tet_triangles[u][other.facet] = index;
                            self.triangles.push(Triangle {
                                embeddings: vec![FacetSpec::new(t, f), other],
                            });
                        }
                    }
                }
            }
        }
    }

    fn compute_edges(&mut self, tri: &Triangulation) {
        let n = tri.size();
        let mut uf = UnionFind::new(6 * n);
        let mut valid = vec![true; 6 * n];
        for t in 0..n {
            for f in 0..4 {
                let Some((u, g)) = tri.adjacent(t, f) else {
                    continue;
                };
                for (e, [a, b]) in EDGE_VERTICES.iter().copied().enumerate() {
                    if a == f || b == f {
                        continue;
                    }
                    let (ga, gb) = (g.apply(a), g.apply(b));
                    let e2 = EDGE_NUMBER[ga][gb];
                    if !uf.union(6 * t + e, 6 * u + e2, ga > gb) {
                        valid[6 * t + e] = false;
                    }
                }
            }
        }
        let (class_of, count) = number_classes(&mut uf, 6 * n);
        self.edges = (0..count)
            .map(|_| Edge {
                embeddings: Vec::new(),
                boundary: false,
                valid: true,
            })
            .collect();
        for t in 0..n {
            for e in 0..6 {
                let class = class_of[6 * t + e];
                let (_, reversed) = uf.find(6 * t + e);
                self.tet_edges[t][e] = class;
                let edge = &mut self.edges[class];
                edge.embeddings.push(EdgeEmbedding { tet: t, edge: e, reversed });
                if !valid[6 * t + e] {
                    edge.valid = false;
                }
                let [a, b] = EDGE_VERTICES[e];
                if (0..4).any(|f| f != a && f != b && tri.adjacent(t, f).is_none()) {
                    edge.boundary = true;
                }
            }
        }
    }

    fn compute_vertices(&mut self, tri: &Triangulation) {
        let n = tri.size();
        let mut uf = UnionFind::new(4 * n);
        // Corners (t, v, w): the end at v of tetrahedron edge vw. These are
        // the vertices of the vertex links.
        let mut corners = UnionFind::new(16 * n);
        for t in 0..n {
            for f in 0..4 {
                let Some((u, g)) = tri.adjacent(t, f) else {
                    continue;
                };
                for v in 0..4 {
                    if v == f {
                        continue;
                    }
                    uf.union(4 * t + v, 4 * u + g.apply(v), false);
                    for w in 0..4 {
                        if w != v && w != f {
                            corners.union(16 * t + 4 * v + w, 16 * u + 4 * g.apply(v) + g.apply(w), false);
                        }
                    }
                }
            }
        }
        let (class_of, count) = number_classes(&mut uf, 4 * n);
        let mut embeddings: Vec<Vec<(usize, usize)>> = vec![Vec::new(); count];
        for t in 0..n {
            for v in 0..4 {
                let class = class_of[4 * t + v];
                self.tet_vertices[t][v] = class;
                embeddings[class].push((t, v));
            }
        }

        self.vertices = embeddings
            .into_iter()
            .map(|emb| {
                let triangles = emb.len() as i64;
                let mut unglued = 0i64;
                let mut glued = 0i64;
                let mut link_vertices: Vec<usize> = Vec::new();
                for &(t, v) in &emb {
                    for f in 0..4 {
                        if f == v {
                            continue;
                        }
                        if tri.adjacent(t, f).is_some() {
                            glued += 1;
                        } else {
                            unglued += 1;
                        }
                        link_vertices.push(corners.find(16 * t + 4 * v + f).0);
                    }
                }
                link_vertices.sort_unstable();
                link_vertices.dedup();
                let link_edges = unglued + glued / 2;
                let chi = link_vertices.len() as i64 - link_edges + triangles;
                let orientable = link_orientable(tri, &emb);
                let link = match (unglued == 0, chi, orientable) {
                    (true, 2, _) => VertexLink::Sphere,
                    (true, 0, true) => VertexLink::Torus,
                    (true, 0, false) => VertexLink::KleinBottle,
                    (true, _, _) => VertexLink::NonStandardCusp,
                    (false, 1, _) => VertexLink::Disc,
                    (false, _, _) => VertexLink::Invalid,
                };
                Vertex {
                    embeddings: emb,
                    link,
                    link_euler_char: chi,
                    link_orientable: orientable,
                    boundary_component: None,
                }
            })
            .collect();
    }

    fn compute_components(&mut self, tri: &Triangulation) {
        let n = tri.size();
        self.component = vec![usize::MAX; n];
        self.orientation = vec![0; n];
        self.orientable = true;
        let mut stack = Vec::new();
        for start in 0..n {
            if self.component[start] != usize::MAX {
                continue;
            }
            let c = self.n_components;
            self.n_components += 1;
            self.component[start] = c;
            self.orientation[start] = 1;
            stack.push(start);
            while let Some(t) = stack.pop() {
                for f in 0..4 {
                    let Some((u, g)) = tri.adjacent(t, f) else {
                        continue;
                    };
                    let want = -(g.sign() as i8) * self.orientation[t];
                    if self.component[u] == usize::MAX {
                        self.component[u] = c;
                        self.orientation[u] = want;
                        stack.push(u);
                    } else if self.orientation[u] != want {
                        self.orientable = false;
                    }
                }
            }
        }
    }

    fn compute_boundary_components(&mut self) {
        let boundary: Vec<usize> = (0..self.triangles.len())
            .filter(|&i| self.triangles[i].is_boundary())
            .collect();
        let mut uf = UnionFind::new(boundary.len());
        let mut by_edge: Vec<Option<usize>> = vec![None; self.edges.len()];
        for (k, &tri_index) in boundary.iter().enumerate() {
            let spec = self.triangles[tri_index].embeddings[0];
            for (e, [a, b]) in EDGE_VERTICES.iter().copied().enumerate() {
                if a == spec.facet || b == spec.facet {
                    continue;
                }
                let edge = self.tet_edges[spec.simp][e];
                match by_edge[edge] {
                    None => by_edge[edge] = Some(k),
                    Some(other) => {
                        uf.union(other, k, false);
                    }
                }
            }
        }
        let (class_of, count) = number_classes(&mut uf, boundary.len());
        self.boundary_components = vec![BoundaryComponent::default(); count];
        for (k, &tri_index) in boundary.iter().enumerate() {
            let bc = class_of[k];
            self.boundary_components[bc].triangles.push(tri_index);
            let spec = self.triangles[tri_index].embeddings[0];
            for v in 0..4 {
                if v != spec.facet {
                    let vertex = self.tet_vertices[spec.simp][v];
                    self.vertices[vertex].boundary_component = Some(bc);
                }
            }
        }
        for (i, v) in self.vertices.iter_mut().enumerate() {
            if v.is_ideal() {
                v.boundary_component = Some(self.boundary_components.len());
                self.boundary_components.push(BoundaryComponent {
                    triangles: Vec::new(),
                    ideal_vertex: Some(i),
                });
            }
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Index of the vertex at corner `vertex` of `tet`.
    pub fn tet_vertex(&self, tet: usize, vertex: usize) -> usize {
        self.tet_vertices[tet][vertex]
    }

    /// Index of the edge numbered `edge` within `tet`.
    pub fn tet_edge(&self, tet: usize, edge: usize) -> usize {
        self.tet_edges[tet][edge]
    }

    /// Index of the triangle opposite `vertex` in `tet`.
    pub fn tet_triangle(&self, tet: usize, face: usize) -> usize {
        self.tet_triangles[tet][face]
    }

    pub fn component_of(&self, tet: usize) -> usize {
        self.component[tet]
    }

    pub fn count_components(&self) -> usize {
        self.n_components
    }

    /// Tetrahedra grouped by connected component.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut out = vec![Vec::new(); self.n_components];
        for (t, &c) in self.component.iter().enumerate() {
            out[c].push(t);
        }
        out
    }

    pub fn is_orientable(&self) -> bool {
        self.orientable
    }

    /// +1 or -1 for each tetrahedron; consistent across gluings whenever the
    /// triangulation is orientable.
    pub fn orientation(&self, tet: usize) -> i8 {
        self.orientation[tet]
    }

    pub fn boundary_components(&self) -> &[BoundaryComponent] {
        &self.boundary_components
    }

    pub fn count_boundary_components(&self) -> usize {
        self.boundary_components.len()
    }

    pub fn is_valid(&self) -> bool {
        self.edges.iter().all(Edge::is_valid) && self.vertices.iter().all(|v| v.link != VertexLink::Invalid)
    }

    pub fn is_ideal(&self) -> bool {
        self.vertices.iter().any(Vertex::is_ideal)
    }
}

/// Whether the link triangles `(tet, vertex)` can be coherently oriented.
fn link_orientable(tri: &Triangulation, embeddings: &[(usize, usize)]) -> bool {
    let mut sign = std::collections::HashMap::with_capacity(embeddings.len());
    let mut stack = vec![(embeddings[0], 1i32)];
    while let Some(((t, v), s)) = stack.pop() {
        match sign.get(&(t, v)) {
            Some(&existing) => {
                if existing != s {
                    return false;
                }
                continue;
            }
            None => {
                sign.insert((t, v), s);
            }
        }
        for f in 0..4 {
            if f == v {
                continue;
            }
            if let Some((u, g)) = tri.adjacent(t, f) {
                stack.push(((u, g.apply(v)), -g.sign() * s));
            }
        }
    }
    true
}
