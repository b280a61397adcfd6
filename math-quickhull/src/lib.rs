//! 3D Convex Hull Library
//!
//! This library implements the incremental Quickhull algorithm for computing
//! convex hulls of 3D point sets. The hull is grown one "eye" point at a time
//! on a half-edge mesh, with a floating-point tolerance scaled to the
//! magnitude of the input.
//!
//! The core entry point, [`quickhull3`], works on flat coordinate slices and
//! never fails: degenerate input (fewer than 4 points, collinear or coplanar
//! points) yields an empty triangle list. [`ConvexHull3D`] wraps it with typed
//! vertices and reports those cases as [`ConvexHullError`]s.
//!
//! # Flat API
//! ```
//! use math_audio_quickhull::quickhull3;
//!
//! let points = [
//!     0.0, 1.0, 0.0, //
//!     1.0, -1.0, 1.0, //
//!     -1.0, -1.0, 1.0, //
//!     0.0, -1.0, -1.0,
//! ];
//! let triangles = quickhull3(&points);
//! assert_eq!(triangles.len(), 12);
//! ```
//!
//! # Typed API
//! ```
//! use math_audio_quickhull::{ConvexHull3D, Vertex};
//!
//! let vertices = vec![
//!     Vertex::new(0.0, 0.0, 0.0),
//!     Vertex::new(1.0, 0.0, 0.0),
//!     Vertex::new(0.0, 1.0, 0.0),
//!     Vertex::new(0.0, 0.0, 1.0),
//! ];
//!
//! let hull = ConvexHull3D::build(&vertices).unwrap();
//! println!("Number of faces: {}", hull.num_faces());
//! ```

mod config;
mod conflict;
mod export;
mod geometry;
mod mesh;
mod quickhull;
mod types;

// Make testdata publicly available for tests
pub mod testdata;

pub use config::HullConfig;
pub use export::{export_obj, load_obj_vertices, write_obj};
pub use geometry::{
    compute_tolerance, find_extreme_points, plane_from_points, signed_distance,
    squared_distance_to_segment,
};
pub use quickhull::{quickhull3, quickhull3_with_config};
pub use types::{ConvexHull3D, Face, Vertex};

/// Error types for convex hull operations
#[derive(Debug, thiserror::Error)]
pub enum ConvexHullError {
    /// Fewer than 4 points were given.
    #[error("not enough vertices to form a hull: got {count}, need at least 4")]
    InsufficientVertices {
        /// Number of points provided
        count: usize,
    },

    /// All points are collinear or coplanar.
    #[error("vertices are coplanar or collinear")]
    DegenerateConfiguration,

    /// A flat coordinate slice whose length is not a multiple of 3.
    #[error("invalid coordinate slice: length {len} is not a multiple of 3")]
    InvalidInput {
        /// Length of the slice
        len: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConvexHullError>;

impl ConvexHullError {
    /// Returns `true` if no hull could be formed from the input points.
    ///
    /// This includes `InsufficientVertices` and `DegenerateConfiguration`.
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            ConvexHullError::InsufficientVertices { .. } | ConvexHullError::DegenerateConfiguration
        )
    }

    /// Returns `true` if this error comes from reading or writing a file.
    pub fn is_io_error(&self) -> bool {
        matches!(self, ConvexHullError::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConvexHullError::InsufficientVertices { count: 2 };
        assert_eq!(
            err.to_string(),
            "not enough vertices to form a hull: got 2, need at least 4"
        );
        let err = ConvexHullError::InvalidInput { len: 7 };
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn test_error_categories() {
        assert!(ConvexHullError::DegenerateConfiguration.is_degenerate());
        assert!(!ConvexHullError::InvalidInput { len: 1 }.is_degenerate());

        let io = ConvexHullError::from(std::io::Error::other("disk"));
        assert!(io.is_io_error());
        assert!(!io.is_degenerate());
    }
}
