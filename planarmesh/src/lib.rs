//! # planarmesh
//!
//! Iterative planarization of polygon meshes for Rust.
//!
//! This is the umbrella crate that provides convenient access to all planarmesh
//! functionality. You can use this crate to get everything in one place, or use
//! the individual crates for more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: points, best-fit planes, the polygon mesh and the `MeshAccessor` trait
//! - **Algorithms**: planarization, flatness metrics, observers and solver contracts
//!
//! ## Quick Start
//!
//! ```rust
//! use planarmesh::prelude::*;
//! use std::collections::HashSet;
//!
//! let mut mesh = PolygonMesh::from_vertices_and_faces(
//!     vec![
//!         Point3d::new(0.0, 0.0, 0.0),
//!         Point3d::new(1.0, 0.0, 0.5),
//!         Point3d::new(1.0, 1.0, 0.0),
//!         Point3d::new(0.0, 1.0, 0.5),
//!     ],
//!     vec![vec![0, 1, 2, 3]],
//! )?;
//!
//! let config = PlanarizeConfig::new().with_max_iterations(10);
//! planarize(&mut mesh, &HashSet::new(), &config, None)?;
//!
//! assert!(compute_flatness(&mesh)?[&0] < 1e-9);
//! # Ok::<(), planarmesh::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables core and algorithms
//! - `algorithms`: Planarization and flatness algorithms

// Re-export core functionality
pub use planarmesh_core::*;

// Re-export sub-crates
#[cfg(feature = "algorithms")]
pub use planarmesh_algorithms as algorithms;

/// Convenient imports for common use cases
pub mod prelude {
    pub use planarmesh_core::*;

    #[cfg(feature = "algorithms")]
    pub use planarmesh_algorithms::*;
}
