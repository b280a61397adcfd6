//! Core data types for 3D convex hull computation

use crate::{ConvexHullError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A 3D vertex/point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vertex {
    /// Create a new vertex
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Read point `index` out of a flat `x, y, z, x, y, z, ...` slice
    #[inline]
    pub fn from_flat(points: &[f64], index: usize) -> Self {
        let i = 3 * index;
        Self {
            x: points[i],
            y: points[i + 1],
            z: points[i + 2],
        }
    }

    /// Create a vertex from spherical coordinates (azimuth, elevation in radians, radius)
    pub fn from_spherical(azimuth: f64, elevation: f64, radius: f64) -> Self {
        let x = radius * elevation.cos() * azimuth.cos();
        let y = radius * elevation.cos() * azimuth.sin();
        let z = radius * elevation.sin();
        Self { x, y, z }
    }

    /// Coordinate along `axis` (0 = x, 1 = y, 2 = z)
    #[inline]
    pub fn axis(&self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    #[inline]
    pub fn dot(&self, other: &Vertex) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(&self, other: &Vertex) -> Vertex {
        Vertex {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    #[inline]
    pub fn sub(&self, other: &Vertex) -> Vertex {
        Vertex {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    #[inline]
    pub fn add(&self, other: &Vertex) -> Vertex {
        Vertex {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    #[inline]
    pub fn scale(&self, s: f64) -> Vertex {
        Vertex {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Squared length
    #[inline]
    pub fn magnitude_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Compute the magnitude/length
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Normalize to unit length, or `None` when the length is zero or not finite
    pub fn try_normalize(&self) -> Option<Vertex> {
        let mag = self.magnitude();
        (mag > 0.0 && mag.is_finite()).then(|| self.scale(1.0 / mag))
    }

    /// Squared distance to another vertex
    pub fn distance_squared(&self, other: &Vertex) -> f64 {
        self.sub(other).magnitude_squared()
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6}, {:.6})", self.x, self.y, self.z)
    }
}

/// A face of the convex hull (triangle defined by 3 vertex indices,
/// counter-clockwise when seen from outside)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
}

impl Face {
    /// Create a new face from three vertex indices
    pub fn new(v0: usize, v1: usize, v2: usize) -> Self {
        Self { v0, v1, v2 }
    }

    /// Get vertex indices as an array
    pub fn indices(&self) -> [usize; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Check if this face contains a vertex index
    pub fn contains(&self, v: usize) -> bool {
        self.v0 == v || self.v1 == v || self.v2 == v
    }

    /// Outward unit normal of this face
    pub fn normal(&self, vertices: &[Vertex]) -> Vertex {
        let (normal, _) = crate::geometry::plane_from_points(
            &vertices[self.v0],
            &vertices[self.v1],
            &vertices[self.v2],
        );
        normal
    }

    /// Signed distance of `point` from this face's plane (positive = outside)
    pub fn signed_distance(&self, point: &Vertex, vertices: &[Vertex]) -> f64 {
        let (normal, offset) = crate::geometry::plane_from_points(
            &vertices[self.v0],
            &vertices[self.v1],
            &vertices[self.v2],
        );
        crate::geometry::signed_distance(point, &normal, offset)
    }
}

/// The result of a convex hull computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvexHull3D {
    /// Input vertices, indexed by the faces
    vertices: Vec<Vertex>,
    /// Faces of the convex hull (each face is a triangle)
    faces: Vec<Face>,
}

impl ConvexHull3D {
    /// Build a convex hull from vertices using the Quickhull algorithm
    ///
    /// Unlike [`crate::quickhull3`], degenerate input is reported as an error.
    pub fn build(vertices: &[Vertex]) -> Result<Self> {
        let flat: Vec<f64> = vertices.iter().flat_map(|v| [v.x, v.y, v.z]).collect();
        Self::from_flat(&flat)
    }

    /// Build a convex hull from a flat `x, y, z` coordinate slice
    pub fn from_flat(points: &[f64]) -> Result<Self> {
        Self::from_flat_with_config(points, &crate::HullConfig::default())
    }

    /// Build a convex hull from a flat coordinate slice with a custom configuration
    pub fn from_flat_with_config(points: &[f64], config: &crate::HullConfig) -> Result<Self> {
        if !points.len().is_multiple_of(3) {
            return Err(ConvexHullError::InvalidInput { len: points.len() });
        }
        let count = points.len() / 3;
        if count < 4 {
            return Err(ConvexHullError::InsufficientVertices { count });
        }

        let indices = crate::quickhull::quickhull3_with_config(points, config);
        if indices.is_empty() {
            return Err(ConvexHullError::DegenerateConfiguration);
        }

        let vertices = (0..count).map(|i| Vertex::from_flat(points, i)).collect();
        let faces = indices
            .chunks_exact(3)
            .map(|t| Face::new(t[0], t[1], t[2]))
            .collect();
        Ok(Self { vertices, faces })
    }

    /// Get the vertices
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Get the faces
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Get the number of faces
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get the number of input vertices
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Sorted indices of the vertices that lie on the hull
    pub fn hull_vertex_indices(&self) -> Vec<usize> {
        let used: BTreeSet<usize> = self.faces.iter().flat_map(|f| f.indices()).collect();
        used.into_iter().collect()
    }

    /// Flat triangle index list, three indices per face
    pub fn to_flat_indices(&self) -> Vec<usize> {
        self.faces.iter().flat_map(|f| f.indices()).collect()
    }

    /// Compute the volume of the convex hull
    pub fn volume(&self) -> f64 {
        let mut volume = 0.0;

        for face in &self.faces {
            let v0 = &self.vertices[face.v0];
            let v1 = &self.vertices[face.v1];
            let v2 = &self.vertices[face.v2];

            // Signed volume of the tetrahedron formed by the origin and the face
            volume += v0.dot(&v1.cross(v2)) / 6.0;
        }

        volume.abs()
    }

    /// Compute the surface area of the convex hull
    pub fn surface_area(&self) -> f64 {
        self.faces
            .iter()
            .map(|face| {
                let v0 = &self.vertices[face.v0];
                let e1 = self.vertices[face.v1].sub(v0);
                let e2 = self.vertices[face.v2].sub(v0);
                e1.cross(&e2).magnitude() / 2.0
            })
            .sum()
    }
}
