//! Core data structures and traits for planarmesh
//!
//! This crate provides the fundamental types for polygon mesh planarization:
//! points and vectors, best-fit planes and the geometry kernel built on them,
//! a polygon mesh with arbitrary face valence, and the [`MeshAccessor`] trait
//! through which algorithms read and write vertex positions.

pub mod point;
pub mod geometry;
pub mod mesh;
pub mod traits;
pub mod error;

pub use point::*;
pub use geometry::*;
pub use mesh::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, Matrix3, Unit};

// Type aliases for easier imports
pub type Point = Point3d;
pub type Mesh = PolygonMesh;
