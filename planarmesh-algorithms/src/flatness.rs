//! Face flatness metrics
//!
//! The primary metric measures, for every face, the mean angle between the
//! normal at each corner and the normal of the face's best-fit plane. A value
//! of 0 means the face is planar.

use itertools::Itertools;
use planarmesh_core::{angle_between, best_fit_plane, Error, MeshAccessor, Point3d, Result};
use std::collections::HashMap;
use tracing::debug;

/// Acceptable ratio of diagonal distance to mean edge length for a quad
pub const DIAGONAL_FLATNESS_TOLERANCE: f64 = 0.02;

/// Aggregate statistics of a flatness map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatnessSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub face_count: usize,
}

/// Compute the deviation from flatness of every face, in radians.
///
/// For each consecutive corner triple `(a, b, c)` around the face (wrapping,
/// so there are as many triples as corners) the corner normal is
/// `(a - b) × (c - b)`. The best-fit normal is flipped into the hemisphere of
/// that corner normal before the angle between them is taken, and the face
/// deviation is the mean over all corners.
///
/// # Errors
/// * [`Error::DegenerateInput`] if a face has no best-fit plane or a corner
///   normal vanishes (three consecutive collinear corners).
pub fn compute_flatness<M: MeshAccessor>(mesh: &M) -> Result<HashMap<M::FaceKey, f64>> {
    mesh.face_keys()
        .into_iter()
        .map(|face| -> Result<(M::FaceKey, f64)> {
            let points = mesh.face_coordinates(face)?;
            Ok((face, face_flatness(&points)?))
        })
        .collect()
}

/// Flatness deviation of a single polygon given its ordered corners
pub fn face_flatness(points: &[Point3d]) -> Result<f64> {
    let plane = best_fit_plane(points)?;

    // Any three non-collinear points are coplanar
    if points.len() == 3 {
        return Ok(0.0);
    }

    let normal = plane.normal();
    let mut total = 0.0;
    for (a, b, c) in points.iter().circular_tuple_windows() {
        let corner = (a - b).cross(&(c - b));
        let reference = if corner.dot(&normal) > 0.0 { normal } else { -normal };
        total += angle_between(&corner, &reference)?;
    }

    Ok(total / points.len() as f64)
}

/// Mean, minimum and maximum face flatness over the whole mesh
pub fn flatness_summary<M: MeshAccessor>(mesh: &M) -> Result<FlatnessSummary> {
    let flatness = compute_flatness(mesh)?;
    let summary = summarize(flatness.values().copied())?;

    debug!(
        faces = summary.face_count,
        mean = summary.mean,
        max = summary.max,
        "Computed mesh flatness"
    );

    Ok(summary)
}

fn summarize(values: impl Iterator<Item = f64>) -> Result<FlatnessSummary> {
    let (count, sum, min, max) = values.fold(
        (0usize, 0.0, f64::INFINITY, f64::NEG_INFINITY),
        |(count, sum, min, max), value| (count + 1, sum + value, min.min(value), max.max(value)),
    );

    if count == 0 {
        return Err(Error::EmptyInput("Mesh has no faces to measure".to_string()));
    }

    Ok(FlatnessSummary {
        mean: sum / count as f64,
        min,
        max,
        face_count: count,
    })
}

/// Distance between the diagonals of every quad, relative to its mean edge length.
///
/// A planar quad has intersecting diagonals and scores 0. Faces that are not
/// quads are skipped. Compare against [`DIAGONAL_FLATNESS_TOLERANCE`].
pub fn quad_diagonal_flatness<M: MeshAccessor>(mesh: &M) -> Result<HashMap<M::FaceKey, f64>> {
    let mut result = HashMap::new();

    for face in mesh.face_keys() {
        let points = mesh.face_coordinates(face)?;
        if let [a, b, c, d] = points.as_slice() {
            result.insert(face, diagonal_ratio(a, b, c, d)?);
        }
    }

    Ok(result)
}

fn diagonal_ratio(a: &Point3d, b: &Point3d, c: &Point3d, d: &Point3d) -> Result<f64> {
    let edge_length = ((b - a).norm() + (c - b).norm() + (d - c).norm() + (a - d).norm()) / 4.0;
    let u = c - a;
    let v = d - b;

    if edge_length <= 0.0 || u.norm_squared() == 0.0 || v.norm_squared() == 0.0 {
        return Err(Error::DegenerateInput(
            "Quad has a zero-length edge or diagonal".to_string(),
        ));
    }

    let w = u.cross(&v);
    let distance = if w.norm() > f64::EPSILON * u.norm() * v.norm() {
        (b - a).dot(&w).abs() / w.norm()
    } else {
        // Parallel diagonals: distance from b to the line through a and c
        (b - a).cross(&u).norm() / u.norm()
    };

    Ok(distance / edge_length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use planarmesh_core::PolygonMesh;

    fn single_face(points: Vec<Point3d>) -> PolygonMesh {
        let face = (0..points.len()).collect();
        PolygonMesh::from_vertices_and_faces(points, vec![face]).unwrap()
    }

    fn twisted_quad() -> PolygonMesh {
        single_face(vec![
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(1.0, 0.0, 0.5),
            Point3d::new(1.0, 1.0, 0.0),
            Point3d::new(0.0, 1.0, 0.5),
        ])
    }

    #[test]
    fn test_planar_square_is_flat() {
        let mesh = single_face(vec![
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(1.0, 1.0, 0.0),
            Point3d::new(0.0, 1.0, 0.0),
        ]);
        let flatness = compute_flatness(&mesh).unwrap();
        assert_eq!(flatness.len(), 1);
        assert!(flatness[&0].abs() < 1e-9);
    }

    #[test]
    fn test_triangle_is_exactly_flat() {
        let mesh = single_face(vec![
            Point3d::new(0.3, -1.2, 4.0),
            Point3d::new(2.0, 0.7, -1.0),
            Point3d::new(-0.5, 3.1, 0.25),
        ]);
        assert_eq!(compute_flatness(&mesh).unwrap()[&0], 0.0);
    }

    #[test]
    fn test_collinear_triangle_is_rejected() {
        let mesh = single_face(vec![
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(1.0, 1.0, 1.0),
            Point3d::new(2.0, 2.0, 2.0),
        ]);
        assert!(matches!(compute_flatness(&mesh), Err(Error::DegenerateInput(_))));
    }

    #[test]
    fn test_twisted_quad_deviates() {
        let flatness = compute_flatness(&twisted_quad()).unwrap();
        let deviation = flatness[&0];
        assert!(deviation > 0.1, "Twisted quad should not be flat: {}", deviation);
        assert!(deviation < std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn test_flatness_is_orientation_independent() {
        let mut reversed: Vec<Point3d> = twisted_quad().vertices().to_vec();
        reversed.reverse();
        let forward = compute_flatness(&twisted_quad()).unwrap()[&0];
        let backward = compute_flatness(&single_face(reversed)).unwrap()[&0];
        assert_relative_eq!(forward, backward, epsilon = 1e-12);
    }

    #[test]
    fn test_flatness_summary() {
        let mut mesh = twisted_quad();
        let extra = mesh.add_vertex(Point3d::new(2.0, 0.5, 0.0));
        mesh.add_face(vec![1, extra, 2]).unwrap();

        let summary = flatness_summary(&mesh).unwrap();
        assert_eq!(summary.face_count, 2);
        assert_eq!(summary.min, 0.0);
        assert!(summary.max > 0.1);
        assert_relative_eq!(summary.mean, summary.max / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_flatness_summary_empty_mesh() {
        assert!(matches!(
            flatness_summary(&PolygonMesh::new()),
            Err(Error::EmptyInput(_))
        ));
    }

    #[test]
    fn test_quad_diagonal_flatness() {
        // diagonals (0,0,0)-(1,1,0) and (1,0,0.5)-(0,1,0.5) are 0.5 apart
        let ratios = quad_diagonal_flatness(&twisted_quad()).unwrap();
        let edge = (1.0f64 + 0.25).sqrt();
        assert_relative_eq!(ratios[&0], 0.5 / edge, epsilon = 1e-12);
        assert!(ratios[&0] > DIAGONAL_FLATNESS_TOLERANCE);
    }

    #[test]
    fn test_quad_diagonal_flatness_skips_other_faces() {
        let mesh = single_face(vec![
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(0.0, 1.0, 0.0),
        ]);
        assert!(quad_diagonal_flatness(&mesh).unwrap().is_empty());
    }
}
