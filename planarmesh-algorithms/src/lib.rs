//! # planarmesh Algorithms
//!
//! Algorithms that drive the faces of a polygon mesh towards planarity and
//! measure how far they are from it.
//!
//! - [`planarize()`]: fixed-iteration projection onto per-face best-fit planes
//!   followed by per-vertex centroid averaging
//! - [`compute_flatness`]: per-face mean angle between corner normals and the
//!   best-fit normal
//! - [`planarize_external`]: hand-off to an external constraint solver
//! - [`circularize()`]: declared, not yet implemented
//! - [`MeshBoolean`]: extension point for boolean engines

pub mod flatness;
pub mod observer;
pub mod planarize;
pub mod external;
pub mod circularize;
pub mod booleans;

// Re-export commonly used items
pub use flatness::*;
pub use observer::*;
pub use planarize::*;
pub use external::*;
pub use circularize::*;
pub use booleans::*;
