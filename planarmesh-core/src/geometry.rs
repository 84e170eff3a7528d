//! Geometry kernel
//!
//! Pure numerical routines shared by the flatness metric and the planarization
//! iterator: centroids, least-squares planes, orthogonal projection and angles
//! between vectors. None of these functions touch a mesh.

use crate::{Error, Point3d, Result, Vector3d};
use nalgebra::{Matrix3, Unit};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Ratio of the second to the first principal variance below which a point
/// set is treated as collinear.
pub const RANK_TOLERANCE: f64 = 1e-12;

/// A plane through `origin` with a unit `normal`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    origin: Point3d,
    normal: Unit<Vector3d>,
}

impl Plane {
    /// Create a plane from a point on it and a (not necessarily unit) normal
    pub fn new(origin: Point3d, normal: Vector3d) -> Result<Self> {
        let length = normal.norm();
        if !length.is_finite() || length <= 0.0 {
            return Err(Error::DegenerateInput(
                "Plane normal must be a finite, non-zero vector".to_string(),
            ));
        }

        Ok(Self {
            origin,
            normal: Unit::new_unchecked(normal / length),
        })
    }

    /// A point on the plane
    pub fn origin(&self) -> Point3d {
        self.origin
    }

    /// The unit normal of the plane
    pub fn normal(&self) -> Vector3d {
        self.normal.into_inner()
    }

    pub fn unit_normal(&self) -> Unit<Vector3d> {
        self.normal
    }

    /// The same plane with the opposite orientation
    pub fn flipped(&self) -> Self {
        Self {
            origin: self.origin,
            normal: Unit::new_unchecked(-self.normal.into_inner()),
        }
    }

    /// Signed distance from `point` to the plane, positive on the normal side
    pub fn signed_distance(&self, point: &Point3d) -> f64 {
        self.normal.dot(&(point - self.origin))
    }

    /// Calculate the distance from a point to the plane
    pub fn distance_to_point(&self, point: &Point3d) -> f64 {
        self.signed_distance(point).abs()
    }

    /// Orthogonal projection of `point` onto the plane
    pub fn project_point(&self, point: &Point3d) -> Point3d {
        point - self.normal() * self.signed_distance(point)
    }
}

/// Arithmetic mean of a set of points
pub fn centroid(points: &[Point3d]) -> Result<Point3d> {
    if points.is_empty() {
        return Err(Error::EmptyInput(
            "Cannot compute the centroid of an empty point set".to_string(),
        ));
    }

    let sum = points
        .iter()
        .fold(Vector3d::zeros(), |acc, point| acc + point.coords);
    Ok(Point3d::from(sum / points.len() as f64))
}

/// Least-squares plane through a set of points.
///
/// The plane passes through the centroid; its normal is the eigenvector of the
/// covariance matrix with the smallest eigenvalue. The normal is oriented to
/// agree with the winding of the points (counter-clockwise points give a normal
/// facing the viewer), so identical input always yields the same plane.
///
/// # Errors
/// * [`Error::DegenerateInput`] for fewer than 3 points, or points that are
///   coincident or collinear.
pub fn best_fit_plane(points: &[Point3d]) -> Result<Plane> {
    if points.len() < 3 {
        return Err(Error::DegenerateInput(format!(
            "Need at least 3 points for a best-fit plane, got {}",
            points.len()
        )));
    }

    let origin = centroid(points)?;

    let mut covariance = Matrix3::zeros();
    for point in points {
        let diff = point - origin;
        covariance += diff * diff.transpose();
    }

    let eigen = covariance.symmetric_eigen();

    // Sort by eigenvalue in descending order
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[b]
            .partial_cmp(&eigen.eigenvalues[a])
            .unwrap_or(Ordering::Equal)
    });

    let largest = eigen.eigenvalues[order[0]];
    let middle = eigen.eigenvalues[order[1]];

    // Spread indistinguishable from rounding of the coordinates themselves
    let magnitude = points
        .iter()
        .map(|point| point.coords.norm())
        .fold(0.0, f64::max);
    let noise = 4.0 * f64::EPSILON * magnitude;
    let floor = points.len() as f64 * noise * noise;

    if !(largest > floor) || middle <= RANK_TOLERANCE * largest {
        return Err(Error::DegenerateInput(
            "Points are coincident or collinear, the plane normal is undefined".to_string(),
        ));
    }

    let mut normal: Vector3d = eigen.eigenvectors.column(order[2]).into_owned();

    let winding = newell_normal(points, &origin);
    let alignment = normal.dot(&winding);
    let flip = if alignment != 0.0 {
        alignment < 0.0
    } else {
        normal
            .iter()
            .find(|component| component.abs() > f64::EPSILON)
            .map_or(false, |component| *component < 0.0)
    };
    if flip {
        normal = -normal;
    }

    Plane::new(origin, normal)
}

/// Area-weighted normal of a closed polygon (Newell's method), taken about `center`
fn newell_normal(points: &[Point3d], center: &Point3d) -> Vector3d {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .fold(Vector3d::zeros(), |acc, (a, b)| {
            acc + (a - center).cross(&(b - center))
        })
}

/// Project every point orthogonally onto `plane`, preserving order and count
pub fn project_points_to_plane(points: &[Point3d], plane: &Plane) -> Vec<Point3d> {
    points.iter().map(|point| plane.project_point(point)).collect()
}

/// The smaller angle between two vectors, in `[0, π]`.
///
/// # Errors
/// * [`Error::DegenerateInput`] if either vector has zero length.
pub fn angle_between(u: &Vector3d, v: &Vector3d) -> Result<f64> {
    if u.norm_squared() == 0.0 || v.norm_squared() == 0.0 {
        return Err(Error::DegenerateInput(
            "Angle is undefined for a zero-length vector".to_string(),
        ));
    }

    // atan2 keeps precision near 0 and π where acos does not
    Ok(u.cross(v).norm().atan2(u.dot(v)))
}
