//! Half-edge mesh used while the hull is under construction
//!
//! Faces and half-edges live in two flat arenas and refer to each other by
//! index, so the `next`/`prev`/`twin` cycles never need shared ownership.
//! Deleting a face only flips its mark; nothing is ever removed from the
//! arenas during a build.

use crate::geometry::plane_from_points;
use crate::types::Vertex;

/// Index of a face in [`HalfEdgeMesh::faces`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct FaceId(pub usize);

/// Index of a half-edge in [`HalfEdgeMesh::edges`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct EdgeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FaceMark {
    Visible,
    Deleted,
}

#[derive(Debug, Clone)]
pub(crate) struct HalfEdge {
    /// Point index this edge points to
    pub head: usize,
    pub face: FaceId,
    pub next: EdgeId,
    pub prev: EdgeId,
    pub twin: Option<EdgeId>,
}

#[derive(Debug, Clone)]
pub(crate) struct HullFace {
    /// Outward unit normal
    pub normal: Vertex,
    /// Plane constant: `normal.dot(p) + offset` is the signed distance of `p`
    pub offset: f64,
    pub area: f64,
    pub centroid: Vertex,
    pub mark: FaceMark,
    /// Representative edge, the one whose head is the first vertex
    pub edge: EdgeId,
    /// First vertex of this face's run in the assigned list
    pub outside: Option<usize>,
}

impl HullFace {
    /// Fast signed distance from point to plane (positive = outside)
    #[inline]
    pub fn signed_distance(&self, point: &Vertex) -> f64 {
        crate::geometry::signed_distance(point, &self.normal, self.offset)
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.mark == FaceMark::Visible
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct HalfEdgeMesh {
    pub faces: Vec<HullFace>,
    pub edges: Vec<HalfEdge>,
}

impl HalfEdgeMesh {
    pub fn with_capacity(faces: usize) -> Self {
        Self {
            faces: Vec::with_capacity(faces),
            edges: Vec::with_capacity(3 * faces),
        }
    }

    #[inline]
    pub fn face(&self, id: FaceId) -> &HullFace {
        &self.faces[id.0]
    }

    #[inline]
    pub fn face_mut(&mut self, id: FaceId) -> &mut HullFace {
        &mut self.faces[id.0]
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &HalfEdge {
        &self.edges[id.0]
    }

    /// Append a face whose half-edges point to `v0`, `v1`, `v2` in that order
    ///
    /// Geometry is left zeroed until [`HalfEdgeMesh::compute_face_geometry`].
    pub fn create_face(&mut self, v0: usize, v1: usize, v2: usize) -> FaceId {
        let face = FaceId(self.faces.len());
        let base = self.edges.len();
        let e = [EdgeId(base), EdgeId(base + 1), EdgeId(base + 2)];

        for (i, head) in [v0, v1, v2].into_iter().enumerate() {
            self.edges.push(HalfEdge {
                head,
                face,
                next: e[(i + 1) % 3],
                prev: e[(i + 2) % 3],
                twin: None,
            });
        }

        self.faces.push(HullFace {
            normal: Vertex::new(0.0, 0.0, 0.0),
            offset: 0.0,
            area: 0.0,
            centroid: Vertex::new(0.0, 0.0, 0.0),
            mark: FaceMark::Visible,
            edge: e[0],
            outside: None,
        });
        face
    }

    /// Derive normal, offset, area and centroid from the face's vertices
    ///
    /// The plane passes through the centroid. A degenerate triangle keeps the
    /// `(0, 0, 1)` / `0` plane of [`plane_from_points`].
    pub fn compute_face_geometry(&mut self, face: FaceId, points: &[f64]) {
        let [a, b, c] = self
            .face_vertices(face)
            .map(|i| Vertex::from_flat(points, i));

        let cross = b.sub(&a).cross(&c.sub(&a));
        let centroid = a.add(&b).add(&c).scale(1.0 / 3.0);

        let f = self.face_mut(face);
        f.centroid = centroid;
        f.area = cross.magnitude() / 2.0;
        match cross.try_normalize() {
            Some(normal) => {
                f.normal = normal;
                f.offset = -normal.dot(&f.centroid);
            }
            None => {
                (f.normal, f.offset) = plane_from_points(&a, &b, &c);
            }
        }
    }

    /// Make `a` and `b` twins of each other
    pub fn set_twin(&mut self, a: EdgeId, b: EdgeId) {
        self.edges[a.0].twin = Some(b);
        self.edges[b.0].twin = Some(a);
    }

    /// Edge `i` steps away from the face's representative edge
    ///
    /// Positive steps follow `next`, negative ones follow `prev`.
    pub fn edge_at(&self, face: FaceId, i: isize) -> EdgeId {
        let mut edge = self.face(face).edge;
        if i >= 0 {
            for _ in 0..i {
                edge = self.edge(edge).next;
            }
        } else {
            for _ in 0..i.unsigned_abs() {
                edge = self.edge(edge).prev;
            }
        }
        edge
    }

    /// Point index the edge starts from
    #[inline]
    pub fn tail(&self, edge: EdgeId) -> usize {
        self.edge(self.edge(edge).prev).head
    }

    /// Head vertices of the face's edge cycle, starting at the representative edge
    pub fn face_vertices(&self, face: FaceId) -> [usize; 3] {
        let e0 = self.face(face).edge;
        let e1 = self.edge(e0).next;
        let e2 = self.edge(e1).next;
        [self.edge(e0).head, self.edge(e1).head, self.edge(e2).head]
    }
}
