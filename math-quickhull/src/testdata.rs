//! Test data for convex hull tests
//!
//! Point-set generators shared by the unit tests, the integration tests and
//! the benchmarks. Random generators take a seed so that every run sees the
//! same points.

use crate::types::Vertex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Flatten vertices into the `x, y, z, x, y, z, ...` layout used by [`crate::quickhull3`]
pub fn flatten(vertices: &[Vertex]) -> Vec<f64> {
    vertices.iter().flat_map(|v| [v.x, v.y, v.z]).collect()
}

/// Generate random points near a sphere (radius varies by ±10%)
pub fn random_sphere_points(n: usize, radius: f64, seed: u64) -> Vec<Vertex> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut vertices = Vec::with_capacity(n);

    for _ in 0..n {
        let azimuth = rng.random::<f64>() * 2.0 * std::f64::consts::PI;
        let elevation = (rng.random::<f64>() * 2.0 - 1.0).asin();
        let r = radius * (0.9 + 0.2 * rng.random::<f64>());

        vertices.push(Vertex::from_spherical(azimuth, elevation, r));
    }

    vertices
}

/// Generate uniformly distributed points on a sphere using Fibonacci lattice
pub fn fibonacci_sphere_points(n: usize, radius: f64) -> Vec<Vertex> {
    let golden_ratio = (1.0 + 5.0_f64.sqrt()) / 2.0;

    (0..n)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * (i as f64) / golden_ratio;
            let phi = ((2 * i + 1) as f64 / n as f64 - 1.0).acos();
            Vertex::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            )
        })
        .collect()
}

/// Corners of the unit cube `[0, 1]^3`
pub fn unit_cube_vertices() -> Vec<Vertex> {
    vec![
        Vertex::new(0.0, 0.0, 0.0),
        Vertex::new(1.0, 0.0, 0.0),
        Vertex::new(1.0, 1.0, 0.0),
        Vertex::new(0.0, 1.0, 0.0),
        Vertex::new(0.0, 0.0, 1.0),
        Vertex::new(1.0, 0.0, 1.0),
        Vertex::new(1.0, 1.0, 1.0),
        Vertex::new(0.0, 1.0, 1.0),
    ]
}

/// Unit cube corners (indices 0..8) followed by points strictly inside it
///
/// Interior points keep a margin of 0.01 from every face.
pub fn unit_cube_with_interior_points(n_interior: usize, seed: u64) -> Vec<Vertex> {
    let mut vertices = unit_cube_vertices();
    let mut rng = StdRng::seed_from_u64(seed);

    for _ in 0..n_interior {
        let x = rng.random_range(0.01..0.99);
        let y = rng.random_range(0.01..0.99);
        let z = rng.random_range(0.01..0.99);
        vertices.push(Vertex::new(x, y, z));
    }

    vertices
}

/// Generate a regular tetrahedron
pub fn tetrahedron_vertices() -> Vec<Vertex> {
    vec![
        Vertex::new(0.0, 0.0, 0.0),
        Vertex::new(1.0, 0.0, 0.0),
        Vertex::new(0.5, (3.0_f64).sqrt() / 2.0, 0.0),
        Vertex::new(0.5, (3.0_f64).sqrt() / 6.0, (2.0 / 3.0_f64).sqrt()),
    ]
}

/// Generate vertices for an octahedron
pub fn octahedron_vertices() -> Vec<Vertex> {
    vec![
        Vertex::new(1.0, 0.0, 0.0),
        Vertex::new(0.0, 1.0, 0.0),
        Vertex::new(0.0, 0.0, 1.0),
        Vertex::new(-1.0, 0.0, 0.0),
        Vertex::new(0.0, -1.0, 0.0),
        Vertex::new(0.0, 0.0, -1.0),
    ]
}

/// Generate vertices for an icosahedron
pub fn icosahedron_vertices() -> Vec<Vertex> {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0; // Golden ratio

    vec![
        Vertex::new(-1.0, phi, 0.0),
        Vertex::new(1.0, phi, 0.0),
        Vertex::new(-1.0, -phi, 0.0),
        Vertex::new(1.0, -phi, 0.0),
        Vertex::new(0.0, -1.0, phi),
        Vertex::new(0.0, 1.0, phi),
        Vertex::new(0.0, -1.0, -phi),
        Vertex::new(0.0, 1.0, -phi),
        Vertex::new(phi, 0.0, -1.0),
        Vertex::new(phi, 0.0, 1.0),
        Vertex::new(-phi, 0.0, -1.0),
        Vertex::new(-phi, 0.0, 1.0),
    ]
}
