//! Mesh data structures and functionality

use crate::{Error, MeshAccessor, Point3d, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A value stored in a per-vertex attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

/// A polygon mesh with faces of arbitrary valence.
///
/// Vertices and faces are keyed by their index. Every face is a closed
/// polygon of at least 3 existing vertices with no repeated consecutive
/// vertex (the last and first vertex count as consecutive). Deserialized
/// meshes are validated the same way.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "PolygonMeshData")]
pub struct PolygonMesh {
    vertices: Vec<Point3d>,
    faces: Vec<Vec<usize>>,
    attributes: HashMap<usize, HashMap<String, AttributeValue>>,
}

/// Unvalidated serialized form of [`PolygonMesh`]
#[derive(Deserialize)]
struct PolygonMeshData {
    vertices: Vec<Point3d>,
    faces: Vec<Vec<usize>>,
    #[serde(default)]
    attributes: HashMap<usize, HashMap<String, AttributeValue>>,
}

impl TryFrom<PolygonMeshData> for PolygonMesh {
    type Error = Error;

    fn try_from(data: PolygonMeshData) -> Result<Self> {
        let mut mesh = Self::from_vertices_and_faces(data.vertices, data.faces)?;
        for (vertex, attributes) in data.attributes {
            mesh.check_vertex(vertex)?;
            mesh.attributes.insert(vertex, attributes);
        }
        Ok(mesh)
    }
}

impl PolygonMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from vertices and faces, validating every face
    pub fn from_vertices_and_faces(vertices: Vec<Point3d>, faces: Vec<Vec<usize>>) -> Result<Self> {
        let mut mesh = Self {
            vertices,
            faces: Vec::with_capacity(faces.len()),
            attributes: HashMap::new(),
        };
        for face in faces {
            mesh.add_face(face)?;
        }
        Ok(mesh)
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Vertex positions, indexed by vertex key
    pub fn vertices(&self) -> &[Point3d] {
        &self.vertices
    }

    /// Faces as ordered vertex index lists, indexed by face key
    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    /// Add a vertex to the mesh
    pub fn add_vertex(&mut self, vertex: Point3d) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a face to the mesh
    pub fn add_face(&mut self, face: Vec<usize>) -> Result<usize> {
        self.validate_face(&face)?;
        let index = self.faces.len();
        self.faces.push(face);
        Ok(index)
    }

    fn validate_face(&self, face: &[usize]) -> Result<()> {
        if face.len() < 3 {
            return Err(Error::InvalidData(format!(
                "A face needs at least 3 vertices, got {}",
                face.len()
            )));
        }

        if let Some(&missing) = face.iter().find(|&&v| v >= self.vertices.len()) {
            return Err(Error::UnknownVertex(format!(
                "Face references vertex {} but the mesh has {} vertices",
                missing,
                self.vertices.len()
            )));
        }

        for (i, &v) in face.iter().enumerate() {
            if v == face[(i + 1) % face.len()] {
                return Err(Error::InvalidData(format!(
                    "Face repeats vertex {} consecutively",
                    v
                )));
            }
        }

        Ok(())
    }

    /// Indices of the faces incident to a vertex
    pub fn vertex_faces(&self, vertex: usize) -> Vec<usize> {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, face)| face.contains(&vertex))
            .map(|(i, _)| i)
            .collect()
    }

    /// Vertices sharing a face edge with `vertex`, in ascending order
    pub fn vertex_neighbors(&self, vertex: usize) -> Vec<usize> {
        let mut neighbors = BTreeSet::new();
        for face in &self.faces {
            let n = face.len();
            for (i, &v) in face.iter().enumerate() {
                if v == vertex {
                    neighbors.insert(face[(i + n - 1) % n]);
                    neighbors.insert(face[(i + 1) % n]);
                }
            }
        }
        neighbors.into_iter().collect()
    }

    /// Number of distinct edge neighbours of a vertex
    pub fn vertex_degree(&self, vertex: usize) -> usize {
        self.vertex_neighbors(vertex).len()
    }

    /// Vertices whose attribute `name` equals `value`
    pub fn vertices_where(&self, name: &str, value: &AttributeValue) -> Vec<usize> {
        (0..self.vertices.len())
            .filter(|vertex| {
                self.attributes
                    .get(vertex)
                    .and_then(|attributes| attributes.get(name))
                    == Some(value)
            })
            .collect()
    }

    fn check_vertex(&self, vertex: usize) -> Result<()> {
        if vertex < self.vertices.len() {
            Ok(())
        } else {
            Err(Error::UnknownVertex(format!(
                "Vertex {} does not exist (mesh has {} vertices)",
                vertex,
                self.vertices.len()
            )))
        }
    }

    /// Clear the mesh
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
        self.attributes.clear();
    }
}

impl MeshAccessor for PolygonMesh {
    type VertexKey = usize;
    type FaceKey = usize;

    fn vertex_keys(&self) -> Vec<usize> {
        (0..self.vertices.len()).collect()
    }

    fn face_keys(&self) -> Vec<usize> {
        (0..self.faces.len()).collect()
    }

    fn face_vertices(&self, face: usize) -> Result<Vec<usize>> {
        self.faces.get(face).cloned().ok_or_else(|| {
            Error::UnknownFace(format!(
                "Face {} does not exist (mesh has {} faces)",
                face,
                self.faces.len()
            ))
        })
    }

    fn vertex_position(&self, vertex: usize) -> Result<Point3d> {
        self.check_vertex(vertex)?;
        Ok(self.vertices[vertex])
    }

    fn set_vertex_position(&mut self, vertex: usize, position: Point3d) -> Result<()> {
        self.check_vertex(vertex)?;
        self.vertices[vertex] = position;
        Ok(())
    }

    fn vertex_attribute(&self, vertex: usize, name: &str) -> Option<AttributeValue> {
        self.attributes
            .get(&vertex)
            .and_then(|attributes| attributes.get(name))
            .cloned()
    }

    fn set_vertex_attribute(&mut self, vertex: usize, name: &str, value: AttributeValue) -> Result<()> {
        self.check_vertex(vertex)?;
        self.attributes
            .entry(vertex)
            .or_default()
            .insert(name.to_string(), value);
        Ok(())
    }

    fn vertex_total(&self) -> usize {
        self.vertices.len()
    }

    fn face_total(&self) -> usize {
        self.faces.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_quads() -> PolygonMesh {
        let vertices = vec![
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(2.0, 0.0, 0.0),
            Point3d::new(0.0, 1.0, 0.0),
            Point3d::new(1.0, 1.0, 0.0),
            Point3d::new(2.0, 1.0, 0.0),
        ];
        PolygonMesh::from_vertices_and_faces(vertices, vec![vec![0, 1, 4, 3], vec![1, 2, 5, 4]])
            .unwrap()
    }

    #[test]
    fn test_counts() {
        let mesh = two_quads();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.face_count(), 2);
        assert!(!mesh.is_empty());
        assert!(PolygonMesh::new().is_empty());
    }

    #[test]
    fn test_reject_short_face() {
        let mut mesh = two_quads();
        assert!(matches!(mesh.add_face(vec![0, 1]), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_reject_unknown_vertex() {
        let mut mesh = two_quads();
        assert!(matches!(mesh.add_face(vec![0, 1, 9]), Err(Error::UnknownVertex(_))));
    }

    #[test]
    fn test_reject_repeated_consecutive_vertex() {
        let mut mesh = two_quads();
        assert!(mesh.add_face(vec![0, 1, 1, 3]).is_err());
        // wrap-around pair
        assert!(mesh.add_face(vec![0, 1, 4, 0]).is_err());
        assert_eq!(mesh.face_count(), 2);
    }

    #[test]
    fn test_adjacency() {
        let mesh = two_quads();
        assert_eq!(mesh.vertex_faces(1), vec![0, 1]);
        assert_eq!(mesh.vertex_faces(0), vec![0]);
        assert_eq!(mesh.vertex_neighbors(1), vec![0, 2, 4]);
        assert_eq!(mesh.vertex_degree(0), 2);
        assert_eq!(mesh.vertex_degree(4), 3);
    }

    #[test]
    fn test_accessor_positions() {
        let mut mesh = two_quads();
        assert_eq!(mesh.face_coordinates(1).unwrap()[1], Point3d::new(2.0, 0.0, 0.0));

        mesh.set_vertex_position(2, Point3d::new(2.0, 0.0, 1.0)).unwrap();
        assert_eq!(mesh.vertex_position(2).unwrap(), Point3d::new(2.0, 0.0, 1.0));

        assert!(matches!(mesh.vertex_position(6), Err(Error::UnknownVertex(_))));
        assert!(matches!(mesh.face_vertices(2), Err(Error::UnknownFace(_))));
    }

    #[test]
    fn test_attributes() {
        let mut mesh = two_quads();
        for vertex in 0..mesh.vertex_count() {
            let corner = mesh.vertex_degree(vertex) == 2;
            mesh.set_vertex_attribute(vertex, "is_fixed", corner.into()).unwrap();
        }

        assert_eq!(mesh.vertex_attribute(0, "is_fixed"), Some(AttributeValue::Bool(true)));
        assert_eq!(mesh.vertex_attribute(0, "missing"), None);
        assert_eq!(
            mesh.vertices_where("is_fixed", &AttributeValue::Bool(true)),
            vec![0, 2, 3, 5]
        );
        assert!(mesh.set_vertex_attribute(10, "is_fixed", true.into()).is_err());
    }

    #[test]
    fn test_serde_round_trip_keeps_attributes() {
        let mut mesh = two_quads();
        mesh.set_vertex_attribute(4, "is_fixed", true.into()).unwrap();

        let json = serde_json::to_string(&mesh).unwrap();
        let restored: PolygonMesh = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.vertices(), mesh.vertices());
        assert_eq!(restored.faces(), mesh.faces());
        assert_eq!(restored.vertex_attribute(4, "is_fixed"), Some(AttributeValue::Bool(true)));
    }

    #[test]
    fn test_deserialize_rejects_invalid_faces() {
        let unknown_vertex = r#"{"vertices":[[0,0,0],[1,0,0],[0,1,0]],"faces":[[0,1,7]]}"#;
        assert!(serde_json::from_str::<PolygonMesh>(unknown_vertex).is_err());

        let repeated = r#"{"vertices":[[0,0,0],[1,0,0],[0,1,0]],"faces":[[0,1,0]]}"#;
        assert!(serde_json::from_str::<PolygonMesh>(repeated).is_err());

        let stray_attribute = r#"{"vertices":[[0,0,0],[1,0,0],[0,1,0]],"faces":[[0,1,2]],"attributes":{"9":{"is_fixed":{"Bool":true}}}}"#;
        assert!(serde_json::from_str::<PolygonMesh>(stray_attribute).is_err());

        let valid = r#"{"vertices":[[0,0,0],[1,0,0],[0,1,0]],"faces":[[0,1,2]]}"#;
        let mesh: PolygonMesh = serde_json::from_str(valid).unwrap();
        assert_eq!(mesh.face_count(), 1);
    }
}
