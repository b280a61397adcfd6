//! Quickhull algorithm implementation for 3D convex hulls
//!
//! Based on:
//! - Barber, C.B., Dobkin, D.P., and Huhdanpaa, H.T., "The Quickhull algorithm
//!   for convex hulls," ACM Trans. on Mathematical Software, 22(4):469-483, 1996.
//!
//! The hull is kept as a half-edge mesh of triangles. Points that are still
//! outside the hull sit in the `assigned` conflict list, grouped in one
//! contiguous run per face. Each iteration takes the farthest point of the
//! first run (the eye vertex), deletes every face it can see, and closes the
//! hole with a fan of triangles from the eye vertex to the horizon.

use crate::config::HullConfig;
use crate::conflict::{VertexList, VertexNode, new_registry};
use crate::geometry::{
    compute_tolerance, find_extreme_points, plane_from_points, signed_distance,
    squared_distance_to_segment,
};
use crate::mesh::{EdgeId, FaceId, FaceMark, HalfEdgeMesh};
use crate::types::Vertex;

/// Compute the convex hull of a flat `x, y, z` point slice
///
/// Returns a flat list of point indices, three per triangle, wound
/// counter-clockwise when seen from outside the hull. Fewer than 4 points, or
/// points that are all collinear or coplanar, give an empty list. A trailing
/// partial coordinate triple is ignored.
pub fn quickhull3(points: &[f64]) -> Vec<usize> {
    quickhull3_with_config(points, &HullConfig::default())
}

/// [`quickhull3`] with an explicit configuration
pub fn quickhull3_with_config(points: &[f64], config: &HullConfig) -> Vec<usize> {
    let count = points.len() / 3;
    if count < 4 {
        log::debug!("quickhull3: {count} points, at least 4 are needed");
        return Vec::new();
    }

    let mut builder = HullBuilder::new(&points[..3 * count], config);
    if !builder.compute_initial_hull() {
        return Vec::new();
    }
    builder.run();
    builder.triangles()
}

/// Pending work of the horizon walk: the next edge to cross and how many
/// edges of its face are left
#[derive(Debug, Clone, Copy)]
struct HorizonFrame {
    edge: EdgeId,
    remaining: usize,
}

/// State of one hull construction
struct HullBuilder<'a> {
    points: &'a [f64],
    config: &'a HullConfig,
    tolerance: f64,
    nodes: Vec<VertexNode>,
    /// Points outside at least one face, one contiguous run per face
    assigned: VertexList,
    /// Points orphaned by deleted faces during the current insertion
    unassigned: VertexList,
    mesh: HalfEdgeMesh,
    // Scratch buffers reused across insertions
    horizon: Vec<EdgeId>,
    new_faces: Vec<FaceId>,
    stack: Vec<HorizonFrame>,
}

impl<'a> HullBuilder<'a> {
    fn new(points: &'a [f64], config: &'a HullConfig) -> Self {
        let count = points.len() / 3;
        Self {
            points,
            config,
            tolerance: 0.0,
            nodes: new_registry(count),
            assigned: VertexList::new(),
            unassigned: VertexList::new(),
            mesh: HalfEdgeMesh::with_capacity(2 * count),
            horizon: Vec::with_capacity(64),
            new_faces: Vec::with_capacity(64),
            stack: Vec::with_capacity(64),
        }
    }

    #[inline]
    fn count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    fn point(&self, index: usize) -> Vertex {
        Vertex::from_flat(self.points, index)
    }

    /// Build the seed tetrahedron and assign every other point to it
    ///
    /// Returns `false` when the points are collinear or coplanar.
    fn compute_initial_hull(&mut self) -> bool {
        let (min, max) = find_extreme_points(self.points);
        self.tolerance = compute_tolerance(self.points, &min, &max, self.config.tolerance_scale);

        // Seed line: the axis with the greatest 1D separation
        let mut max_separation = 0.0;
        let mut axis = 0;
        for i in 0..3 {
            let separation = self.point(max[i]).axis(i) - self.point(min[i]).axis(i);
            if separation > max_separation {
                max_separation = separation;
                axis = i;
            }
        }
        let v0 = min[axis];
        let v1 = max[axis];
        let p0 = self.point(v0);
        let p1 = self.point(v1);

        // Seed triangle: the point farthest from the line v0-v1
        let mut max_distance = 0.0;
        let mut v2 = None;
        for i in (0..self.count()).filter(|&i| i != v0 && i != v1) {
            let distance = squared_distance_to_segment(&self.point(i), &p0, &p1);
            if distance > max_distance {
                max_distance = distance;
                v2 = Some(i);
            }
        }
        let Some(v2) = v2 else {
            log::debug!("quickhull3: all {} points are collinear", self.count());
            return false;
        };

        // Seed tetrahedron: the point farthest from the plane v0-v1-v2
        let p2 = self.point(v2);
        if p1.sub(&p0).cross(&p2.sub(&p0)).try_normalize().is_none() {
            log::debug!("quickhull3: all {} points are collinear", self.count());
            return false;
        }
        let (normal, offset) = plane_from_points(&p0, &p1, &p2);
        let mut max_distance = 0.0;
        let mut v3 = None;
        for i in (0..self.count()).filter(|&i| i != v0 && i != v1 && i != v2) {
            let distance = signed_distance(&self.point(i), &normal, offset).abs();
            if distance > max_distance {
                max_distance = distance;
                v3 = Some(i);
            }
        }
        let Some(v3) = v3 else {
            log::debug!("quickhull3: all {} points are coplanar", self.count());
            return false;
        };

        let faces = if signed_distance(&self.point(v3), &normal, offset) < 0.0 {
            // v3 is behind the base plane, so v0-v1-v2 already faces outward
            let faces = [
                self.mesh.create_face(v0, v1, v2),
                self.mesh.create_face(v3, v1, v0),
                self.mesh.create_face(v3, v2, v1),
                self.mesh.create_face(v3, v0, v2),
            ];
            for i in 0..3 {
                let j = (i + 1) % 3;
                let base = self.mesh.edge_at(faces[0], j as isize);
                let bottom = self.mesh.edge_at(faces[i + 1], 2);
                self.mesh.set_twin(bottom, base);
                let left = self.mesh.edge_at(faces[i + 1], 1);
                let right = self.mesh.edge_at(faces[j + 1], 0);
                self.mesh.set_twin(left, right);
            }
            faces
        } else {
            let faces = [
                self.mesh.create_face(v0, v2, v1),
                self.mesh.create_face(v3, v0, v1),
                self.mesh.create_face(v3, v1, v2),
                self.mesh.create_face(v3, v2, v0),
            ];
            for i in 0..3 {
                let j = (i + 1) % 3;
                let base = self.mesh.edge_at(faces[0], ((3 - i) % 3) as isize);
                let bottom = self.mesh.edge_at(faces[i + 1], 2);
                self.mesh.set_twin(bottom, base);
                let right = self.mesh.edge_at(faces[i + 1], 0);
                let left = self.mesh.edge_at(faces[j + 1], 1);
                self.mesh.set_twin(right, left);
            }
            faces
        };
        for &face in &faces {
            self.mesh.compute_face_geometry(face, self.points);
        }

        if self.config.verbosity > 0 {
            log::info!(
                "Initial tetrahedron [{v0}, {v1}, {v2}, {v3}], tolerance {:.3e}",
                self.tolerance
            );
        }

        // Initial assignment: each point goes to the face it is farthest outside of
        for i in 0..self.count() {
            if i == v0 || i == v1 || i == v2 || i == v3 {
                continue;
            }
            let point = self.point(i);
            let mut max_distance = self.tolerance;
            let mut max_face = None;
            for &face in &faces {
                let distance = self.mesh.face(face).signed_distance(&point);
                if distance > max_distance {
                    max_distance = distance;
                    max_face = Some(face);
                }
            }
            if let Some(face) = max_face {
                self.add_vertex_to_face(i, face);
            }
        }

        true
    }

    /// Insert eye vertices until no face has outside points left
    fn run(&mut self) {
        let mut iterations = 0;
        while let Some((eye, eye_face)) = self.next_vertex_to_add() {
            iterations += 1;
            self.add_vertex_to_hull(eye, eye_face);

            if self.config.verbosity > 1 {
                log::debug!(
                    "Iteration {}: eye vertex {}, {} horizon edges, {} faces allocated",
                    iterations,
                    eye,
                    self.horizon.len(),
                    self.mesh.faces.len()
                );
            }
        }

        if self.config.verbosity > 0 {
            let (visible, area) = self
                .mesh
                .faces
                .iter()
                .filter(|f| f.is_visible())
                .fold((0, 0.0), |(n, area), f| (n + 1, area + f.area));
            log::info!(
                "Hull complete after {} iterations: {} faces, surface area {:.6}",
                iterations,
                visible,
                area
            );
        }
    }

    /// Farthest outside point of the face owning the head of `assigned`
    fn next_vertex_to_add(&self) -> Option<(usize, FaceId)> {
        let first = self.assigned.first()?;
        let eye_face = self.nodes[first].face?;
        let face = self.mesh.face(eye_face);

        // The run of the head vertex's face starts at the head of the list
        let mut max_distance = 0.0;
        let mut eye = None;
        for v in self
            .assigned
            .iter(&self.nodes)
            .take_while(|&v| self.nodes[v].face == Some(eye_face))
        {
            let distance = face.signed_distance(&self.point(v));
            if distance > max_distance {
                max_distance = distance;
                eye = Some(v);
            }
        }

        eye.map(|v| (v, eye_face))
    }

    fn add_vertex_to_hull(&mut self, eye: usize, eye_face: FaceId) {
        self.remove_vertex_from_face(eye, eye_face);
        let eye_point = self.point(eye);
        self.compute_horizon(&eye_point, eye_face);
        self.add_new_faces(eye);
        self.resolve_unassigned_points();
        debug_assert!(self.unassigned.is_empty());
    }

    fn add_vertex_to_face(&mut self, vertex: usize, face: FaceId) {
        self.nodes[vertex].face = Some(face);
        match self.mesh.face(face).outside {
            Some(first) => self.assigned.insert_before(&mut self.nodes, first, vertex),
            None => self.assigned.append(&mut self.nodes, vertex),
        }
        self.mesh.face_mut(face).outside = Some(vertex);
    }

    fn remove_vertex_from_face(&mut self, vertex: usize, face: FaceId) {
        if self.mesh.face(face).outside == Some(vertex) {
            let next = self.nodes[vertex]
                .next
                .filter(|&n| self.nodes[n].face == Some(face));
            self.mesh.face_mut(face).outside = next;
        }
        self.assigned.remove(&mut self.nodes, vertex);
        self.nodes[vertex].face = None;
    }

    /// Unlink the whole outside run of `face` from `assigned`, returning its head
    fn remove_all_vertices_from_face(&mut self, face: FaceId) -> Option<usize> {
        let start = self.mesh.face(face).outside?;
        let mut end = start;
        while let Some(next) = self.nodes[end].next {
            if self.nodes[next].face != Some(face) {
                break;
            }
            end = next;
        }
        self.assigned.remove_range(&mut self.nodes, start, end);
        self.mesh.face_mut(face).outside = None;
        Some(start)
    }

    /// Mark `face` deleted and orphan its outside points
    fn delete_face(&mut self, face: FaceId) {
        if let Some(start) = self.remove_all_vertices_from_face(face) {
            self.unassigned.append_chain(&mut self.nodes, start);
        }
        self.mesh.face_mut(face).mark = FaceMark::Deleted;
    }

    /// Delete every face visible from `eye_point` and collect the horizon
    ///
    /// Depth-first over twin faces starting at `start`. The start face is
    /// walked from its representative edge; a face entered through an edge is
    /// walked from the edge after it, skipping the edge it was entered by. The
    /// resulting horizon edges form one closed loop in walk order.
    fn compute_horizon(&mut self, eye_point: &Vertex, start: FaceId) {
        self.horizon.clear();
        let mut stack = std::mem::take(&mut self.stack);
        stack.clear();

        self.delete_face(start);
        stack.push(HorizonFrame {
            edge: self.mesh.face(start).edge,
            remaining: 3,
        });

        while let Some(frame) = stack.last_mut() {
            if frame.remaining == 0 {
                stack.pop();
                continue;
            }
            let edge = frame.edge;
            frame.remaining -= 1;
            frame.edge = self.mesh.edge(edge).next;

            let Some(twin) = self.mesh.edge(edge).twin else {
                continue;
            };
            let opposite = self.mesh.edge(twin).face;
            if !self.mesh.face(opposite).is_visible() {
                continue;
            }

            if self.mesh.face(opposite).signed_distance(eye_point) > self.tolerance {
                self.delete_face(opposite);
                stack.push(HorizonFrame {
                    edge: self.mesh.edge(twin).next,
                    remaining: 2,
                });
            } else {
                self.horizon.push(edge);
            }
        }

        self.stack = stack;
    }

    /// Close the hole left by the deleted faces with a fan around `eye`
    fn add_new_faces(&mut self, eye: usize) {
        self.new_faces.clear();
        let mut first_side = None;
        let mut previous_side = None;

        for i in 0..self.horizon.len() {
            let side = self.add_adjoining_face(eye, self.horizon[i]);
            match previous_side {
                None => first_side = Some(side),
                Some(previous) => {
                    let next = self.mesh.edge(side).next;
                    self.mesh.set_twin(next, previous);
                }
            }
            self.new_faces.push(self.mesh.edge(side).face);
            previous_side = Some(side);
        }

        if let (Some(first), Some(last)) = (first_side, previous_side) {
            let next = self.mesh.edge(first).next;
            self.mesh.set_twin(next, last);
        }
    }

    /// Create the triangle `eye, tail, head` over one horizon edge
    ///
    /// Returns the new face's edge running from the horizon edge's head to
    /// `eye`; its `next` runs from `eye` to the horizon edge's tail.
    fn add_adjoining_face(&mut self, eye: usize, horizon_edge: EdgeId) -> EdgeId {
        let tail = self.mesh.tail(horizon_edge);
        let head = self.mesh.edge(horizon_edge).head;
        let face = self.mesh.create_face(eye, tail, head);
        self.mesh.compute_face_geometry(face, self.points);

        let outer = self.mesh.edge_at(face, -1);
        if let Some(twin) = self.mesh.edge(horizon_edge).twin {
            self.mesh.set_twin(outer, twin);
        }
        self.mesh.edge_at(face, 0)
    }

    /// Reassign orphaned points to the new faces, dropping interior ones
    fn resolve_unassigned_points(&mut self) {
        let early_accept = self.config.early_accept_factor * self.tolerance;

        while let Some(vertex) = self.unassigned.first() {
            self.unassigned.remove(&mut self.nodes, vertex);
            let point = self.point(vertex);

            let mut max_distance = self.tolerance;
            let mut max_face = None;
            for &face in &self.new_faces {
                let distance = self.mesh.face(face).signed_distance(&point);
                if distance > max_distance {
                    max_distance = distance;
                    max_face = Some(face);
                    if distance > early_accept {
                        break;
                    }
                }
            }

            if let Some(face) = max_face {
                self.add_vertex_to_face(vertex, face);
            }
        }
    }

    /// Flat triangle list of the faces still on the hull
    fn triangles(&self) -> Vec<usize> {
        self.mesh
            .faces
            .iter()
            .enumerate()
            .filter(|(_, face)| face.is_visible())
            .flat_map(|(i, _)| self.mesh.face_vertices(FaceId(i)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TETRAHEDRON: [f64; 12] = [
        0.0, 1.0, 0.0, //
        1.0, -1.0, 1.0, //
        -1.0, -1.0, 1.0, //
        0.0, -1.0, -1.0,
    ];

    /// Twin symmetry, 3-cycles and outward orientation of every live face
    fn assert_mesh_invariants(builder: &HullBuilder<'_>) {
        let mesh = &builder.mesh;
        for (i, face) in mesh.faces.iter().enumerate() {
            if !face.is_visible() {
                continue;
            }
            let id = FaceId(i);
            let e0 = face.edge;
            let e3 = mesh.edge_at(id, 3);
            assert_eq!(e0, e3, "face {i} is not a 3-cycle");

            for k in 0..3 {
                let edge = mesh.edge_at(id, k);
                assert_eq!(mesh.edge(edge).face, id);
                let twin = mesh.edge(edge).twin.expect("closed mesh edge without twin");
                assert_eq!(mesh.edge(twin).twin, Some(edge));
                assert_ne!(mesh.edge(twin).face, id);
                assert!(mesh.face(mesh.edge(twin).face).is_visible());
                assert_eq!(mesh.tail(twin), mesh.edge(edge).head);
                assert_eq!(mesh.edge(twin).head, mesh.tail(edge));
            }

            for p in 0..builder.count() {
                let distance = face.signed_distance(&builder.point(p));
                assert!(distance <= 1e-9, "point {p} outside face {i} by {distance}");
            }
        }
    }

    /// Every assigned vertex lies outside the face it is assigned to, and
    /// each face's outside run is contiguous
    fn assert_conflict_invariants(builder: &HullBuilder<'_>) {
        let mut seen_faces = Vec::new();
        let mut current = None;
        for v in builder.assigned.iter(&builder.nodes) {
            let face = builder.nodes[v].face.expect("assigned vertex without face");
            let f = builder.mesh.face(face);
            assert!(f.is_visible());
            assert!(f.signed_distance(&builder.point(v)) > builder.tolerance);
            if current != Some(face) {
                assert!(!seen_faces.contains(&face), "run of face {face:?} is split");
                assert_eq!(f.outside, Some(v));
                seen_faces.push(face);
                current = Some(face);
            }
        }
    }

    #[test]
    fn test_tetrahedron() {
        let triangles = quickhull3(&TETRAHEDRON);
        assert_eq!(triangles.len(), 12);
        assert!(triangles.iter().all(|&i| i < 4));
    }

    #[test]
    fn test_initial_hull_wiring() {
        let config = HullConfig::default();
        for points in [TETRAHEDRON, {
            // v3 on the other side of the base plane
            let mut mirrored = TETRAHEDRON;
            for z in mirrored.iter_mut().skip(2).step_by(3) {
                *z = -*z;
            }
            mirrored
        }] {
            let mut builder = HullBuilder::new(&points, &config);
            assert!(builder.compute_initial_hull());
            assert_eq!(builder.mesh.faces.len(), 4);
            assert!(builder.assigned.is_empty());
            assert_mesh_invariants(&builder);
        }
    }

    #[test]
    fn test_initial_assignment() {
        let points = [
            0.0, 0.0, 0.0, //
            4.0, 0.0, 0.0, //
            0.0, 4.0, 0.0, //
            0.0, 0.0, 4.0, //
            1.5, 1.5, 2.0, // outside the slanted face
            0.5, 0.5, 0.5, // interior
            2.0, 2.0, 1.0, // outside the slanted face
        ];
        // the extra points stay closer to the seed edge and base than points 2 and 3
        let config = HullConfig::default();
        let mut builder = HullBuilder::new(&points, &config);
        assert!(builder.compute_initial_hull());

        let mut assigned: Vec<usize> = builder.assigned.iter(&builder.nodes).collect();
        assigned.sort_unstable();
        assert_eq!(assigned, vec![4, 6]);
        assert!(builder.nodes[5].face.is_none());
        assert_conflict_invariants(&builder);
    }

    #[test]
    fn test_horizon_is_closed_loop() {
        let points = [
            0.0, 0.0, 0.0, //
            4.0, 0.0, 0.0, //
            0.0, 4.0, 0.0, //
            0.0, 0.0, 4.0, //
            1.5, 1.5, 1.5,
        ];
        let config = HullConfig::default();
        let mut builder = HullBuilder::new(&points, &config);
        assert!(builder.compute_initial_hull());

        let (eye, eye_face) = builder.next_vertex_to_add().unwrap();
        assert_eq!(eye, 4);
        builder.remove_vertex_from_face(eye, eye_face);
        builder.compute_horizon(&builder.point(eye), eye_face);

        let horizon = builder.horizon.clone();
        assert_eq!(horizon.len(), 3);
        for (k, &edge) in horizon.iter().enumerate() {
            let next = horizon[(k + 1) % horizon.len()];
            assert_eq!(builder.mesh.edge(edge).head, builder.mesh.tail(next));
            assert!(!builder.mesh.face(builder.mesh.edge(edge).face).is_visible());
        }

        builder.add_new_faces(eye);
        builder.resolve_unassigned_points();
        assert_eq!(builder.new_faces.len(), 3);
        assert_mesh_invariants(&builder);
        // one face replaced by a fan of three
        assert_eq!(builder.triangles().len(), 3 * 6);
    }

    /// Insert the first eye vertex and return the sorted vertices of the new
    /// face that point 5 ends up assigned to
    fn retriaged_face(points: &[f64], early_accept_factor: f64) -> [usize; 3] {
        let config = HullConfig {
            early_accept_factor,
            ..HullConfig::default()
        };
        let mut builder = HullBuilder::new(points, &config);
        assert!(builder.compute_initial_hull());

        let (eye, eye_face) = builder.next_vertex_to_add().unwrap();
        assert_eq!(eye, 4);
        assert_eq!(builder.nodes[5].face, Some(eye_face));
        builder.add_vertex_to_hull(eye, eye_face);
        assert_conflict_invariants(&builder);

        let face = builder.nodes[5].face.expect("point 5 outside");
        assert!(builder.new_faces.contains(&face));
        let mut vertices = builder.mesh.face_vertices(face);
        vertices.sort_unstable();
        vertices
    }

    #[test]
    fn test_retriage_early_accept() {
        let points = [
            0.0, 0.0, 0.0, //
            4.0, 0.0, 0.0, //
            0.0, 4.0, 0.0, //
            0.0, 0.0, 4.0, //
            1.5, 1.5, 1.5, // eye
            3.9, 0.3, 0.15, // near corner 1, outside two faces of the fan
        ];
        // fan order is (4, 2, 3), (4, 3, 1), (4, 1, 2); point 5 is farther
        // outside the last one

        // full scan picks the farthest face
        assert_eq!(retriaged_face(&points, f64::INFINITY), [1, 2, 4]);
        // stopping at the first face past tolerance
        assert_eq!(retriaged_face(&points, 1.0), [1, 3, 4]);
        assert_eq!(
            retriaged_face(&points, HullConfig::default().early_accept_factor),
            [1, 3, 4]
        );
    }

    #[test]
    fn test_run_keeps_invariants() {
        let points: Vec<f64> = crate::testdata::random_sphere_points(200, 1.0, 7)
            .iter()
            .flat_map(|v| [v.x, v.y, v.z])
            .collect();
        let config = HullConfig::default();
        let mut builder = HullBuilder::new(&points, &config);
        assert!(builder.compute_initial_hull());
        assert_conflict_invariants(&builder);

        while let Some((eye, face)) = builder.next_vertex_to_add() {
            builder.add_vertex_to_hull(eye, face);
            assert!(builder.unassigned.is_empty());
            assert_conflict_invariants(&builder);
        }
        assert_mesh_invariants(&builder);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(quickhull3(&[]).is_empty());
        assert!(quickhull3(&TETRAHEDRON[..9]).is_empty());

        // spacing chosen so the segment projection is exact
        let collinear: Vec<f64> = (0..=8).flat_map(|i| [i as f64, i as f64, 1.0]).collect();
        assert!(quickhull3(&collinear).is_empty());

        let coplanar: Vec<f64> = (0..5)
            .flat_map(|i| [i as f64, (i * i) as f64, 3.0])
            .collect();
        assert!(quickhull3(&coplanar).is_empty());

        let identical = [1.5; 15];
        assert!(quickhull3(&identical).is_empty());
    }

    #[test]
    fn test_trailing_coordinates_ignored() {
        let mut points = TETRAHEDRON.to_vec();
        points.extend([9.0, 9.0]);
        assert_eq!(quickhull3(&points), quickhull3(&TETRAHEDRON));
    }

    #[test]
    fn test_duplicate_points() {
        let mut points = TETRAHEDRON.to_vec();
        points.extend_from_slice(&TETRAHEDRON);
        let triangles = quickhull3(&points);
        assert_eq!(triangles.len(), 12);
    }

    #[test]
    fn test_large_coordinates() {
        let scaled: Vec<f64> = TETRAHEDRON.iter().map(|c| c * 1.0e9 + 5.0e9).collect();
        let triangles = quickhull3(&scaled);
        assert_eq!(triangles.len(), 12);
    }
}
