//! Core traits for planarmesh

use crate::{AttributeValue, Point3d, Result};
use std::fmt::Debug;
use std::hash::Hash;

/// Read/write access to the vertices and faces of a polygon mesh.
///
/// Algorithms in planarmesh only ever move vertices through this trait; they
/// never add or remove vertices or faces. Keys are opaque handles that stay
/// valid for the lifetime of a call.
pub trait MeshAccessor {
    /// Handle identifying a vertex
    type VertexKey: Copy + Eq + Hash + Debug + Send + Sync;

    /// Handle identifying a face
    type FaceKey: Copy + Eq + Hash + Debug + Send + Sync;

    /// All vertex keys, in a stable order
    fn vertex_keys(&self) -> Vec<Self::VertexKey>;

    /// All face keys, in a stable order
    fn face_keys(&self) -> Vec<Self::FaceKey>;

    /// Ordered vertex keys around a face
    fn face_vertices(&self, face: Self::FaceKey) -> Result<Vec<Self::VertexKey>>;

    /// Current position of a vertex
    fn vertex_position(&self, vertex: Self::VertexKey) -> Result<Point3d>;

    /// Move a vertex to a new position
    fn set_vertex_position(&mut self, vertex: Self::VertexKey, position: Point3d) -> Result<()>;

    /// Read a named per-vertex attribute
    fn vertex_attribute(&self, vertex: Self::VertexKey, name: &str) -> Option<AttributeValue>;

    /// Write a named per-vertex attribute
    fn set_vertex_attribute(
        &mut self,
        vertex: Self::VertexKey,
        name: &str,
        value: AttributeValue,
    ) -> Result<()>;

    /// Ordered corner positions of a face
    fn face_coordinates(&self, face: Self::FaceKey) -> Result<Vec<Point3d>> {
        self.face_vertices(face)?
            .into_iter()
            .map(|vertex| self.vertex_position(vertex))
            .collect()
    }

    /// Number of vertices
    fn vertex_total(&self) -> usize {
        self.vertex_keys().len()
    }

    /// Number of faces
    fn face_total(&self) -> usize {
        self.face_keys().len()
    }
}
