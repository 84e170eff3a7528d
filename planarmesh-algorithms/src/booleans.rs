//! Boolean operations on meshes
//!
//! planarmesh has no boolean engine of its own. Engines plug in by
//! implementing [`MeshBoolean`]; every operation works on a raw vertex and
//! face list rather than a full mesh.

use planarmesh_core::{Error, Point3d, PolygonMesh, Result};

/// A mesh as plain vertex positions and faces of vertex indices
pub type RawMesh = (Vec<Point3d>, Vec<Vec<usize>>);

/// Boolean operations provided by an external engine
pub trait MeshBoolean {
    /// Union of `a` and `b`
    fn union(&self, _a: &RawMesh, _b: &RawMesh) -> Result<RawMesh> {
        Err(Error::NotImplemented("Boolean union".to_string()))
    }

    /// `a` minus `b`
    fn difference(&self, _a: &RawMesh, _b: &RawMesh) -> Result<RawMesh> {
        Err(Error::NotImplemented("Boolean difference".to_string()))
    }

    /// Intersection of `a` and `b`
    fn intersection(&self, _a: &RawMesh, _b: &RawMesh) -> Result<RawMesh> {
        Err(Error::NotImplemented("Boolean intersection".to_string()))
    }
}

/// Placeholder used when no boolean engine is installed
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBooleanEngine;

impl MeshBoolean for NoBooleanEngine {}

/// Split a polygon mesh into its raw vertex and face lists
pub fn to_raw_mesh(mesh: &PolygonMesh) -> RawMesh {
    (mesh.vertices().to_vec(), mesh.faces().to_vec())
}

/// Build a polygon mesh from raw lists, validating the faces
pub fn from_raw_mesh(raw: RawMesh) -> Result<PolygonMesh> {
    let (vertices, faces) = raw;
    PolygonMesh::from_vertices_and_faces(vertices, faces)
}
